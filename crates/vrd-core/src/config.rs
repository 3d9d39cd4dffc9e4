//! Export configuration.
//!
//! One explicit value handed to `run_export`; there is no config file and
//! no process-wide state. The CLI builds this from flags and environment.

use anyhow::{Context, Result};
use std::path::PathBuf;
use time::macros::format_description;
use time::Date;

/// Default Vapi API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.vapi.ai";
/// Default output directory for downloaded recordings.
pub const DEFAULT_DOWNLOAD_DIR: &str = "recordings";
/// Default page size for call list requests (the API maximum).
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Everything one export run needs.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub base_url: String,
    /// Bearer token for the call list endpoint.
    pub api_key: String,
    /// Recordings land here as `<call_id>.<mp3|wav>`; created if missing.
    pub download_dir: PathBuf,
    /// Optional assistant filter, forwarded to the server as `assistantId`.
    pub assistant_id: Option<String>,
    /// Optional squad filter. The API has no squad parameter, so this is
    /// applied client-side after each page arrives.
    pub squad_id: Option<String>,
    /// Optional `YYYY-MM-DD` lower bound on call creation.
    pub created_after: Option<String>,
    pub page_size: usize,
}

impl ExportConfig {
    /// New config with defaults for everything but the API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            assistant_id: None,
            squad_id: None,
            created_after: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Value for the `createdAtGt` query parameter: the configured date
    /// expanded to midnight UTC, or `None` when no lower bound is set.
    /// Fails on a date that is not valid `YYYY-MM-DD`.
    pub fn created_at_gt(&self) -> Result<Option<String>> {
        let date = match &self.created_after {
            Some(d) => d,
            None => return Ok(None),
        };
        let fmt = format_description!("[year]-[month]-[day]");
        Date::parse(date, &fmt)
            .with_context(|| format!("invalid created-after date {date:?} (expected YYYY-MM-DD)"))?;
        Ok(Some(format!("{date}T00:00:00Z")))
    }
}
