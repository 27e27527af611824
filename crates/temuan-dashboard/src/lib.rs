//! Findings (temuan) monitoring dashboard
//!
//! Loads the findings sheet once from its Google Sheets gviz export, then
//! derives everything shown on the dashboard from the in-memory record list:
//! yearly loss/recovery and status rollups, the status distribution, and the
//! sorted, filtered, and paginated detail table. The full list can be
//! exported as CSV.

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod export;
pub mod record;
pub mod render;
pub mod rollup;
pub mod sheets;
pub mod view;

pub use dashboard::{Dashboard, LoadStatus};
pub use record::{Field, FilterField, Record, Status};
pub use view::{PageView, SortDirection, SortSpec, ViewState};
