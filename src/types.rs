// Type definitions shared across the client

use serde::{Deserialize, Serialize};

/// Image chosen by the user. Replaces any prior selection; kept in memory
/// only for the preview and the upload payload, never persisted.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub bytes: Vec<u8>,
    pub name: String,
    pub mime: String,
}

/// Language selector as read from the UI at submission time, trimmed of
/// surrounding whitespace. The raw code is preserved (not normalized to a
/// known set) so voice matching still works for codes the localizer does
/// not recognize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response payload from the detection service. Untrusted input: any field
/// may be missing and the client must still render something sensible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    #[serde(default)]
    pub disease: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    /// Echo of the language the service localized for.
    #[serde(default)]
    pub language: Option<String>,
    /// Whether the service rendered an audio clip for this result. Absent in
    /// minimal responses, in which case the clip is assumed to exist.
    #[serde(default = "default_audio_available")]
    pub audio_available: bool,
}

fn default_audio_available() -> bool {
    true
}
