//! Dashboard state: the loaded record snapshot plus the detail table's view
//!
//! The presentation layer calls `sort_by`, `set_filter`, `set_page`, and
//! `export_csv`, and reads rollups and the visible page back. Every derived
//! view is recomputed from the current snapshot on each call.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{info, warn};

use crate::config::Config;
use crate::export;
use crate::record::{Field, FilterField, Record};
use crate::rollup::{self, FinancialRollup, StatusDistribution, StatusRollup};
use crate::sheets::{self, SourceError};
use crate::view::{self, PageView, ViewState};

/// Outcome of the (single) load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    NotLoaded,
    Loaded,
    /// The load failed; the record list is empty
    Failed(String),
}

pub struct Dashboard {
    records: Vec<Record>,
    status: LoadStatus,
    loaded_at: Option<DateTime<Utc>>,
    view: ViewState,
    page_size: usize,
}

impl Dashboard {
    /// Empty dashboard, nothing loaded yet
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            status: LoadStatus::NotLoaded,
            loaded_at: None,
            view: ViewState::new(),
            page_size,
        }
    }

    /// Dashboard over an already loaded record list
    pub fn from_records(records: Vec<Record>, page_size: usize) -> Self {
        let mut dashboard = Self::new(page_size);
        dashboard.apply_load(Ok(records));
        dashboard
    }

    /// Fetch the sheet once; a failure leaves an empty dashboard with
    /// [`LoadStatus::Failed`].
    pub async fn load(config: &Config) -> Self {
        let client = reqwest::Client::new();
        let mut dashboard = Self::new(config.page_size);
        let result = sheets::fetch_records(&client, &config.sheet_url).await;
        dashboard.apply_load(result);
        dashboard
    }

    /// Replace the record list wholesale with the result of a load
    pub fn apply_load(&mut self, result: Result<Vec<Record>, SourceError>) {
        match result {
            Ok(records) => {
                info!(count = records.len(), "loaded findings");
                self.records = records;
                self.status = LoadStatus::Loaded;
            }
            Err(e) => {
                warn!(error = %e, "failed to load findings");
                self.records = Vec::new();
                self.status = LoadStatus::Failed(e.to_string());
            }
        }
        self.loaded_at = Some(Utc::now());
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    // =========================================================================
    // User actions
    // =========================================================================

    pub fn sort_by(&mut self, field: Field) {
        self.view = std::mem::take(&mut self.view).sort_by(field);
    }

    pub fn set_filter(&mut self, field: FilterField, value: Option<String>) {
        self.view = std::mem::take(&mut self.view).set_filter(field, value);
    }

    pub fn set_page(&mut self, page: usize) {
        self.view = std::mem::take(&mut self.view).set_page(page);
    }

    /// Export every loaded record, ignoring sort, filters, and page
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        export::write_csv(&self.records, path)
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    pub fn financial_rollup(&self) -> FinancialRollup {
        rollup::financial_rollup(&self.records)
    }

    pub fn status_rollup(&self) -> StatusRollup {
        rollup::status_rollup(&self.records)
    }

    pub fn status_distribution(&self) -> StatusDistribution {
        rollup::status_distribution(&self.records)
    }

    /// Filter choices, always taken from the full list
    pub fn unique_values(&self, field: FilterField) -> Vec<String> {
        view::unique_values(&self.records, field)
    }

    pub fn visible_page(&self) -> PageView<'_> {
        view::visible(&self.records, &self.view, self.page_size)
    }
}
