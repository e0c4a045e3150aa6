// UI state store: the display state every handler mutates through setters
// instead of touching the view directly.

use serde::{Deserialize, Serialize};

/// Progress of the current submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DetectionStatus {
    /// No submission yet, or the UI was reset
    #[default]
    Idle,
    /// Upload in flight
    Detecting,
    /// Result received and rendered
    Done,
    /// Submission failed
    Error,
}

impl DetectionStatus {
    /// Text shown in the status line.
    pub fn label(&self) -> &'static str {
        match self {
            DetectionStatus::Idle => "",
            DetectionStatus::Detecting => "Detecting...",
            DetectionStatus::Done => "Done ✔",
            DetectionStatus::Error => "Error ❌",
        }
    }
}

/// Serializable projection of [`UiState`] handed to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSnapshot {
    pub file_name: Option<String>,
    pub preview_src: Option<String>,
    pub preview_visible: bool,
    pub status: DetectionStatus,
    pub status_label: String,
    pub result_text: Option<String>,
}

/// Display state for the main window.
///
/// Handlers never reach into the view; they call these setters and the
/// frontend renders snapshots, which keeps every handler testable without a
/// running webview.
#[derive(Debug, Default)]
pub struct UiState {
    file_name: Option<String>,
    preview_src: Option<String>,
    preview_visible: bool,
    status: DetectionStatus,
    result_text: Option<String>,
}

impl UiState {
    pub fn set_file_name(&mut self, name: &str) {
        self.file_name = Some(name.to_string());
    }

    /// Publish a preview image and reveal the preview container.
    pub fn set_preview(&mut self, data_url: String) {
        self.preview_src = Some(data_url);
        self.preview_visible = true;
    }

    pub fn set_status(&mut self, status: DetectionStatus) {
        self.status = status;
    }

    pub fn set_result(&mut self, text: String) {
        self.result_text = Some(text);
    }

    pub fn snapshot(&self) -> UiSnapshot {
        UiSnapshot {
            file_name: self.file_name.clone(),
            preview_src: self.preview_src.clone(),
            preview_visible: self.preview_visible,
            status: self.status,
            status_label: self.status.label().to_string(),
            result_text: self.result_text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let ui = UiState::default();
        let snap = ui.snapshot();
        assert_eq!(snap.status, DetectionStatus::Idle);
        assert!(snap.file_name.is_none());
        assert!(snap.preview_src.is_none());
        assert!(!snap.preview_visible);
        assert!(snap.result_text.is_none());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(DetectionStatus::Idle.label(), "");
        assert_eq!(DetectionStatus::Detecting.label(), "Detecting...");
        assert_eq!(DetectionStatus::Done.label(), "Done ✔");
        assert_eq!(DetectionStatus::Error.label(), "Error ❌");
    }

    #[test]
    fn test_submission_reenters_detecting_from_terminal_states() {
        let mut ui = UiState::default();
        ui.set_status(DetectionStatus::Detecting);
        ui.set_status(DetectionStatus::Done);
        // A fresh submission restarts the cycle regardless of the prior
        // terminal state
        ui.set_status(DetectionStatus::Detecting);
        assert_eq!(ui.snapshot().status, DetectionStatus::Detecting);
        ui.set_status(DetectionStatus::Error);
        ui.set_status(DetectionStatus::Detecting);
        assert_eq!(ui.snapshot().status, DetectionStatus::Detecting);
    }

    #[test]
    fn test_preview_setter_reveals_container() {
        let mut ui = UiState::default();
        ui.set_file_name("leaf.jpg");
        ui.set_preview("data:image/jpeg;base64,AAAA".to_string());
        let snap = ui.snapshot();
        assert_eq!(snap.file_name.as_deref(), Some("leaf.jpg"));
        assert_eq!(snap.preview_src.as_deref(), Some("data:image/jpeg;base64,AAAA"));
        assert!(snap.preview_visible);
    }

    #[test]
    fn test_snapshot_serializes_with_lowercase_status() {
        let mut ui = UiState::default();
        ui.set_status(DetectionStatus::Detecting);
        let json = serde_json::to_string(&ui.snapshot()).unwrap();
        assert!(json.contains("\"status\":\"detecting\""));
        assert!(json.contains("Detecting..."));
    }
}
