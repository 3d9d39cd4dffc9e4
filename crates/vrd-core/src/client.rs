//! Authenticated client for the Vapi call list endpoint.
//!
//! Uses the curl crate (libcurl) with a blocking easy handle per request.
//! A list failure is fatal to the export run, so errors stay typed here
//! (`ListError`) instead of collapsing into anyhow at the source.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::call::CallRecord;

/// Parameters for one page request against `GET /call`.
#[derive(Debug, Clone, Default)]
pub struct PageQuery {
    /// `limit`: requested page size.
    pub limit: usize,
    /// `createdAtGt`: ISO-8601 lower bound, from the configured start date.
    pub created_at_gt: Option<String>,
    /// `createdAtLt`: upper-bound cursor; unset on the first request only.
    pub created_at_lt: Option<String>,
    /// `assistantId`: server-side assistant filter.
    pub assistant_id: Option<String>,
}

/// Failure fetching or decoding one page of the call list.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("invalid list URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("call list request failed: {0}")]
    Curl(#[from] curl::Error),
    #[error("call list request returned HTTP {0}")]
    Http(u32),
    #[error("failed to decode call list: {0}")]
    Body(#[from] serde_json::Error),
}

/// Client for the Vapi API list endpoint.
#[derive(Debug, Clone)]
pub struct VapiClient {
    base_url: String,
    api_key: String,
}

impl VapiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Fetches one page of call records, newest first.
    ///
    /// Blocking; follows redirects; bearer-token auth. The whole body is
    /// collected in memory (pages are JSON, not audio) and decoded.
    pub fn list_calls(&self, query: &PageQuery) -> Result<Vec<CallRecord>, ListError> {
        let url = build_list_url(&self.base_url, query)?;

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.follow_location(true)?;
        easy.connect_timeout(Duration::from_secs(15))?;
        easy.timeout(Duration::from_secs(60))?;

        let mut headers = curl::easy::List::new();
        headers.append(&format!("Authorization: Bearer {}", self.api_key))?;
        headers.append("Content-Type: application/json")?;
        easy.http_headers(headers)?;

        let mut body: Vec<u8> = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if code < 200 || code >= 300 {
            return Err(ListError::Http(code));
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Builds the `GET /call` URL with only the configured query parameters.
fn build_list_url(base_url: &str, query: &PageQuery) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("{}/call", base_url.trim_end_matches('/')))?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("limit", &query.limit.to_string());
        if let Some(gt) = &query.created_at_gt {
            pairs.append_pair("createdAtGt", gt);
        }
        if let Some(lt) = &query.created_at_lt {
            pairs.append_pair("createdAtLt", lt);
        }
        if let Some(assistant) = &query.assistant_id {
            pairs.append_pair("assistantId", assistant);
        }
    }
    Ok(url)
}
