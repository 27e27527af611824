//! Configuration for the findings dashboard

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants;

// =============================================================================
// File-based Configuration (dashboard.toml)
// =============================================================================

/// Configuration loaded from dashboard.toml; every section is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Where the findings sheet is read from
#[derive(Debug, Default, Deserialize)]
pub struct SourceConfig {
    /// gviz JSON export URL of the sheet
    #[serde(default)]
    pub sheet_url: Option<String>,
}

/// Detail table settings
#[derive(Debug, Default, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub page_size: Option<usize>,
}

/// CSV export settings
#[derive(Debug, Default, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub filename: Option<String>,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content).with_context(|| {
            format!(
                "Failed to parse {}. Expected optional sections:\n\
                 [source] sheet_url = \"...\"\n\
                 [view] page_size = 10\n\
                 [export] filename = \"temuan.csv\"",
                path.display()
            )
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Effective settings after applying defaults and CLI overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// gviz JSON export URL
    pub sheet_url: String,
    /// Rows per detail page
    pub page_size: usize,
    /// Default path for the CSV export
    pub export_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_url: constants::DEFAULT_SHEET_URL.to_string(),
            page_size: constants::DEFAULT_PAGE_SIZE,
            export_path: PathBuf::from(constants::EXPORT_FILENAME),
        }
    }
}

impl Config {
    /// Create config from file config and optional sheet URL override
    pub fn from_file(file_config: &FileConfig, sheet_url: Option<String>) -> Result<Self> {
        let page_size = file_config
            .view
            .page_size
            .unwrap_or(constants::DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            anyhow::bail!("view.page_size must be at least 1");
        }

        let sheet_url = sheet_url
            .or_else(|| file_config.source.sheet_url.clone())
            .unwrap_or_else(|| constants::DEFAULT_SHEET_URL.to_string());
        if sheet_url.trim().is_empty() {
            anyhow::bail!("source.sheet_url must not be empty");
        }

        Ok(Self {
            sheet_url,
            page_size,
            export_path: PathBuf::from(
                file_config
                    .export
                    .filename
                    .as_deref()
                    .unwrap_or(constants::EXPORT_FILENAME),
            ),
        })
    }
}
