// Tauri commands for speech synthesis

use crate::types::LanguageCode;
use crate::voice::VoiceInfo;
use crate::AppState;
use serde::Deserialize;
use tauri::State;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakRequest {
    pub text: String,
    #[serde(default)]
    pub lang_code: Option<String>,
}

/// Speak `text` in the first voice matching the requested language. Errors
/// when speech synthesis is unavailable on this system, which the frontend
/// surfaces as an alert.
#[tauri::command]
pub async fn speak_text(
    request: SpeakRequest,
    state: State<'_, AppState>,
) -> Result<(), String> {
    let lang = LanguageCode::new(request.lang_code.as_deref().unwrap_or("en"));
    state
        .speech
        .speak(&request.text, &lang)
        .map_err(|e| e.to_string())
}

/// Cancel any queued or playing utterance.
#[tauri::command]
pub async fn stop_speaking(state: State<'_, AppState>) -> Result<(), String> {
    state.speech.stop();
    Ok(())
}

/// Voices currently known to the engine; empty until the catalog loads.
#[tauri::command]
pub async fn list_voices(state: State<'_, AppState>) -> Result<Vec<VoiceInfo>, String> {
    Ok(state.speech.list_voices())
}

/// Ask the engine to enumerate its voices again.
#[tauri::command]
pub async fn refresh_voices(state: State<'_, AppState>) -> Result<(), String> {
    state.speech.refresh_voices();
    Ok(())
}
