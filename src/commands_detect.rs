// Tauri commands for detection submission

use crate::localizer::localize;
use crate::state::{DetectionStatus, UiSnapshot};
use crate::types::LanguageCode;
use crate::AppState;
use tauri::{Emitter, State};

fn emit_status(app: &tauri::AppHandle, status: DetectionStatus) {
    let _ = app.emit(
        "detection-status",
        serde_json::json!({
            "status": status,
            "label": status.label(),
        }),
    );
}

async fn set_status(app: &tauri::AppHandle, state: &AppState, status: DetectionStatus) {
    {
        let mut ui = state.ui.lock().await;
        ui.set_status(status);
    }
    emit_status(app, status);
}

/// Submit the current selection to the detection service.
///
/// Without a selection this is an error (surfaced as an alert) and nothing
/// is sent. Otherwise the status runs Detecting → Done/Error; on success the
/// localized result is rendered, spoken, and the service's audio rendition
/// is fetched and played. A submission that was overtaken by a newer one is
/// discarded without touching the display state.
#[tauri::command]
pub async fn submit_image(
    language: String,
    app: tauri::AppHandle,
    state: State<'_, AppState>,
) -> Result<UiSnapshot, String> {
    let image = {
        let selected = state.selected.lock().await;
        match selected.clone() {
            Some(image) => image,
            None => return Err("Please select an image first.".to_string()),
        }
    };

    let lang = LanguageCode::new(&language);
    tracing::info!("submitting {} for language '{}'", image.name, lang);

    set_status(&app, state.inner(), DetectionStatus::Detecting).await;
    // A stale clip from the previous result should not keep playing under a
    // fresh detection
    state.audio.stop();
    let token = state.detector.begin_submission();

    match state.detector.detect(&image, &lang).await {
        Ok(report) => {
            if !state.detector.is_current(token) {
                tracing::info!("discarding response for superseded submission");
                return Ok(state.ui.lock().await.snapshot());
            }

            if let Some(echoed) = &report.language {
                tracing::debug!("service localized for '{}'", echoed);
            }

            let message = localize(&report, &lang);
            {
                let mut ui = state.ui.lock().await;
                ui.set_result(message.clone());
                ui.set_status(DetectionStatus::Done);
            }
            emit_status(&app, DetectionStatus::Done);

            // Client-side rendition of the result. Missing synthesis
            // capability is only a warning here; the text result stands.
            if let Err(e) = state.speech.speak(&message, &lang) {
                tracing::warn!("cannot speak result: {}", e);
            }

            // Server-side rendition, an independent audio stream.
            if report.audio_available {
                match state.detector.fetch_result_audio().await {
                    Ok(bytes) => state.audio.play(bytes),
                    Err(e) => tracing::warn!("result audio unavailable: {}", e),
                }
            }

            Ok(state.ui.lock().await.snapshot())
        }
        Err(e) => {
            tracing::error!("[submit_image] {}", e);
            if state.detector.is_current(token) {
                set_status(&app, state.inner(), DetectionStatus::Error).await;
            }
            Ok(state.ui.lock().await.snapshot())
        }
    }
}

/// Current display state, for frontend (re)synchronization.
#[tauri::command]
pub async fn get_ui_state(state: State<'_, AppState>) -> Result<UiSnapshot, String> {
    Ok(state.ui.lock().await.snapshot())
}

/// Verify the detection service is reachable; returns its banner.
#[tauri::command]
pub async fn check_endpoint(state: State<'_, AppState>) -> Result<String, String> {
    state.detector.check_endpoint().await.map_err(|e| {
        tracing::error!("[check_endpoint] {}", e);
        e.to_string()
    })
}
