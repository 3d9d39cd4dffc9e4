//! CLI for the VRD call-recording export tool.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use vrd_core::config::{ExportConfig, DEFAULT_BASE_URL, DEFAULT_DOWNLOAD_DIR, DEFAULT_PAGE_SIZE};
use vrd_core::export::{run_export, ExportSummary};

/// Environment variable consulted when --api-key is not passed.
const API_KEY_ENV: &str = "VAPI_API_KEY";

/// Export Vapi call recordings to a local directory.
#[derive(Debug, Parser)]
#[command(name = "vrd")]
#[command(about = "VRD: export Vapi call recordings to a local directory", long_about = None)]
pub struct Cli {
    /// Vapi API key; falls back to the VAPI_API_KEY environment variable.
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Base URL of the Vapi API.
    #[arg(long, default_value = DEFAULT_BASE_URL, value_name = "URL")]
    pub base_url: String,

    /// Directory recordings are written to (created if missing).
    #[arg(short, long, default_value = DEFAULT_DOWNLOAD_DIR, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Only export calls handled by this assistant (filtered by the server).
    #[arg(long, value_name = "ID")]
    pub assistant_id: Option<String>,

    /// Only export calls handled by this squad. The API has no squad
    /// filter, so this is applied client-side after each page.
    #[arg(long, value_name = "ID")]
    pub squad_id: Option<String>,

    /// Only export calls created on or after this date (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub created_after: Option<String>,

    /// Page size for call list requests.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_name = "N")]
    pub page_size: usize,
}

impl Cli {
    fn into_config(self) -> Result<ExportConfig> {
        let api_key = match self.api_key {
            Some(key) => key,
            None => std::env::var(API_KEY_ENV)
                .with_context(|| format!("no API key: pass --api-key or set {API_KEY_ENV}"))?,
        };
        Ok(ExportConfig {
            base_url: self.base_url,
            api_key,
            download_dir: self.output_dir,
            assistant_id: self.assistant_id,
            squad_id: self.squad_id,
            created_after: self.created_after,
            page_size: self.page_size,
        })
    }
}

pub fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let cfg = cli.into_config()?;
    tracing::debug!(
        "export config: base_url={} dir={} page_size={}",
        cfg.base_url,
        cfg.download_dir.display(),
        cfg.page_size
    );

    let summary = run_export(&cfg)?;
    print_summary(&summary);

    // The summary is printed either way, but a listing failure still
    // makes the run exit non-zero.
    if let Some(err) = &summary.list_error {
        bail!("call listing failed: {err}");
    }
    Ok(())
}

fn print_summary(summary: &ExportSummary) {
    println!("--- Export complete ---");
    println!("Matched calls:      {}", summary.matched);
    println!("Downloaded:         {}", summary.downloaded);
    println!("Already on disk:    {}", summary.already_present);
    println!("No recording:       {}", summary.no_recording);
    println!("Failed:             {}", summary.failed);
    println!("Recordings on disk: {}", summary.exported());
    if summary.list_error.is_some() {
        println!("(run ended early: call listing failed)");
    }
}
