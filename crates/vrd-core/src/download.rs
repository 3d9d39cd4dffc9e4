//! Recording materializer: one idempotent download per call record.
//!
//! Streams the recording GET into a `.part` temp file and renames it onto
//! the final path on success, so an existing final file always means a
//! completed download. Failed transfers remove their temp file.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::call::CallRecord;

/// Temporary file suffix used before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// What happened to one record. The two skip branches are deliberate
/// policy, distinct from failure, so the summary can count them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Recording fetched and persisted.
    Downloaded,
    /// Target file already on disk; nothing fetched.
    AlreadyExists,
    /// The record carries no recording URL; nothing to do.
    NoRecording,
}

/// Failure fetching or persisting one recording. Never fatal to the run.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("recording request failed: {0}")]
    Curl(#[from] curl::Error),
    #[error("recording request returned HTTP {0}")]
    Http(u32),
    #[error("failed to write recording: {0}")]
    Io(#[from] std::io::Error),
}

/// File extension for a recording URL: anything mentioning "mp3" is saved
/// as `.mp3`, everything else as `.wav`. A naming heuristic, not a
/// content-type check.
pub fn audio_extension(url: &str) -> &'static str {
    if url.contains("mp3") {
        "mp3"
    } else {
        "wav"
    }
}

/// Path for the temp file: appends `.part` to the final path.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Downloads the recording for `call` into `dir`, if it has one and the
/// target file is not already present. The target is
/// `<dir>/<call_id>.<mp3|wav>`, so re-runs are idempotent.
pub fn fetch_recording(call: &CallRecord, dir: &Path) -> Result<Outcome, DownloadError> {
    let url = match call.recording_url() {
        Some(u) => u,
        None => return Ok(Outcome::NoRecording),
    };

    let target = dir.join(format!("{}.{}", call.id, audio_extension(url)));
    if target.exists() {
        return Ok(Outcome::AlreadyExists);
    }

    let tmp = temp_path(&target);
    match fetch_to_file(url, &tmp).and_then(|()| Ok(fs::rename(&tmp, &target)?)) {
        Ok(()) => Ok(Outcome::Downloaded),
        Err(e) => {
            // Never leave a half-written temp file behind.
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

/// Single unauthenticated GET streamed into `path`.
fn fetch_to_file(url: &str, path: &Path) -> Result<(), DownloadError> {
    let mut file = File::create(path)?;
    let mut write_err: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(600))?;

    let perform_result = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort the transfer
            }
        })?;
        transfer.perform()
    };

    // A disk error surfaces through curl as an aborted transfer; report
    // the underlying io::Error instead.
    if let Some(e) = write_err {
        return Err(DownloadError::Io(e));
    }
    perform_result?;

    let code = easy.response_code()?;
    if code < 200 || code >= 300 {
        return Err(DownloadError::Http(code));
    }

    file.sync_all()?;
    Ok(())
}
