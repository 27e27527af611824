//! Centralized constants for the findings dashboard
//!
//! Deployment-specific values (sheet URL, page size, export file name) can be
//! overridden from dashboard.toml; these are the defaults.

// =============================================================================
// Data Source
// =============================================================================

/// Google Sheets gviz JSON export of the findings sheet
pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1aE3TntGir3kpgyt-0skYItqobexzgS8mYxI2cQCcuQ4/gviz/tq?tqx=out:json";

/// Opening delimiter of the gviz response envelope
pub const ENVELOPE_OPEN: &str = "google.visualization.Query.setResponse(";

/// Closing delimiter of the gviz response envelope (trailing `;` is optional)
pub const ENVELOPE_CLOSE: char = ')';

/// Number of columns a findings row is expected to carry
pub const COLUMN_COUNT: usize = 11;

// =============================================================================
// Aggregation
// =============================================================================

/// Bucket label for records whose period has no 4-digit year
pub const OTHER_YEAR_LABEL: &str = "Other";

/// Canonical status values, in display order, exactly as written in the sheet
pub const STATUS_NOT_ADDRESSED: &str = "Belum Tindak Lanjut";
pub const STATUS_IN_PROGRESS: &str = "Proses";
pub const STATUS_ADDRESSED: &str = "Ditindaklanjuti";
pub const STATUS_COMPLETED: &str = "Selesai";

// =============================================================================
// View
// =============================================================================

/// Rows per page in the detail table
pub const DEFAULT_PAGE_SIZE: usize = 10;

// =============================================================================
// File Names
// =============================================================================

/// Default config file path
pub const CONFIG_FILENAME: &str = "dashboard.toml";

/// Default export file name
pub const EXPORT_FILENAME: &str = "temuan.csv";
