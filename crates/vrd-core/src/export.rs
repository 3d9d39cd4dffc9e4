//! The export loop: paginate the call list, filter, materialize recordings.
//!
//! Pages are walked newest-first with a `createdAtLt` cursor. The cursor
//! is advanced for every record in a page *before* the squad filter runs;
//! filtered-out records still move the window, otherwise a page boundary
//! could go stale and repeat or skip records.

use anyhow::{Context, Result};
use std::fs;

use crate::call::CallRecord;
use crate::client::{PageQuery, VapiClient};
use crate::config::ExportConfig;
use crate::download::{self, Outcome};

/// Counters for one export run. Produced even when the listing phase
/// fails partway; `list_error` records why the run was cut short.
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Records that passed all filters.
    pub matched: u64,
    /// Recordings fetched and persisted this run.
    pub downloaded: u64,
    /// Matched records whose file was already on disk.
    pub already_present: u64,
    /// Matched records with no recording URL (silent skip, not counted
    /// as part of the export total).
    pub no_recording: u64,
    /// Matched records whose download failed.
    pub failed: u64,
    /// Set when a page fetch failed and the traversal was abandoned.
    pub list_error: Option<String>,
}

impl ExportSummary {
    /// Recordings accounted for on disk after this run.
    pub fn exported(&self) -> u64 {
        self.downloaded + self.already_present
    }
}

/// Pure squad predicate. No filter accepts everything; with a filter, a
/// record is accepted only when its effective squad id matches. A record
/// with no squad id is rejected, not an error.
pub fn squad_matches(call: &CallRecord, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(want) => call.squad_id() == Some(want),
    }
}

/// Runs the whole export: creates the download directory, walks every
/// page, and downloads one recording per matched record.
///
/// Record-level failures are logged and counted but never abort the
/// traversal. A page-level failure ends the run immediately (no retry)
/// and is reported on the returned summary.
pub fn run_export(cfg: &ExportConfig) -> Result<ExportSummary> {
    fs::create_dir_all(&cfg.download_dir).with_context(|| {
        format!(
            "failed to create download directory {}",
            cfg.download_dir.display()
        )
    })?;
    tracing::info!("saving recordings to {}", cfg.download_dir.display());

    let client = VapiClient::new(&cfg.base_url, &cfg.api_key);
    let created_at_gt = cfg.created_at_gt()?;

    let mut summary = ExportSummary::default();
    let mut cursor: Option<String> = None;

    loop {
        let query = PageQuery {
            limit: cfg.page_size,
            created_at_gt: created_at_gt.clone(),
            created_at_lt: cursor.clone(),
            assistant_id: cfg.assistant_id.clone(),
        };

        let calls = match client.list_calls(&query) {
            Ok(calls) => calls,
            Err(e) => {
                tracing::error!("fetching call list failed: {e}");
                summary.list_error = Some(e.to_string());
                break;
            }
        };

        if calls.is_empty() {
            tracing::info!("no more calls");
            break;
        }

        let page_len = calls.len();
        tracing::info!(batch = page_len, "checking batch of calls");

        for call in &calls {
            // Cursor moves for every record seen, matched or not.
            cursor = Some(call.created_at.clone());

            if !squad_matches(call, cfg.squad_id.as_deref()) {
                continue;
            }
            summary.matched += 1;

            match download::fetch_recording(call, &cfg.download_dir) {
                Ok(Outcome::Downloaded) => {
                    summary.downloaded += 1;
                    tracing::info!(id = %call.id, "downloaded recording");
                }
                Ok(Outcome::AlreadyExists) => {
                    summary.already_present += 1;
                    tracing::debug!(id = %call.id, "recording already on disk, skipped");
                }
                Ok(Outcome::NoRecording) => {
                    summary.no_recording += 1;
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(id = %call.id, "failed to download recording: {e}");
                }
            }
        }

        tracing::info!(
            matched = summary.matched,
            downloaded = summary.downloaded,
            "batch done"
        );

        if page_len < cfg.page_size {
            break;
        }
    }

    Ok(summary)
}
