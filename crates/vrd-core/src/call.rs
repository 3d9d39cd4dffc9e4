//! Minimal structures for Vapi call-record JSON.
//!
//! Only the fields the export loop needs are modeled; everything else in
//! the API response is ignored. `squadId` and the recording URL both have
//! two possible homes in the payload, so access goes through methods that
//! encode the precedence.

use serde::Deserialize;

/// One call as returned by `GET /call`.
#[derive(Debug, Clone, Deserialize)]
pub struct CallRecord {
    pub id: String,
    /// ISO-8601 creation timestamp. Treated as an opaque ordered string;
    /// it doubles as the pagination cursor.
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(default, rename = "assistantId")]
    pub assistant_id: Option<String>,
    #[serde(default, rename = "squadId")]
    pub squad_id: Option<String>,
    #[serde(default)]
    pub squad: Option<Squad>,
    #[serde(default)]
    pub artifact: Option<Artifact>,
}

/// Nested squad object; some payloads carry the squad id here instead of
/// the top-level `squadId` field.
#[derive(Debug, Clone, Deserialize)]
pub struct Squad {
    #[serde(default)]
    pub id: Option<String>,
}

/// Call artifact with the recording reference.
#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
    #[serde(default, rename = "recordingUrl")]
    pub recording_url: Option<String>,
    #[serde(default)]
    pub recording: Option<Recording>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Recording {
    #[serde(default)]
    pub url: Option<String>,
}

impl CallRecord {
    /// Effective squad id: the direct `squadId` field wins, falling back
    /// to `squad.id`.
    pub fn squad_id(&self) -> Option<&str> {
        self.squad_id
            .as_deref()
            .or_else(|| self.squad.as_ref().and_then(|s| s.id.as_deref()))
    }

    /// Recording URL: `artifact.recordingUrl` wins, falling back to
    /// `artifact.recording.url`. `None` means the call has no recording.
    pub fn recording_url(&self) -> Option<&str> {
        let artifact = self.artifact.as_ref()?;
        artifact
            .recording_url
            .as_deref()
            .or_else(|| artifact.recording.as_ref().and_then(|r| r.url.as_deref()))
    }
}
