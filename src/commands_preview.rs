// Tauri commands for image selection and preview

use crate::preview;
use crate::state::UiSnapshot;
use crate::AppState;
use std::path::Path;
use tauri::{Emitter, State};
use tauri_plugin_dialog::DialogExt;

/// Open the platform file picker for an image. Resolves to the chosen path,
/// or `None` when the user cancels (a no-op, not an error).
#[tauri::command]
pub async fn pick_image(app: tauri::AppHandle) -> Result<Option<String>, String> {
    let picked = tokio::task::spawn_blocking(move || {
        app.dialog()
            .file()
            .add_filter("Images", &["png", "jpg", "jpeg", "webp", "gif", "bmp"])
            .blocking_pick_file()
    })
    .await
    .map_err(|e| format!("File picker task failed: {}", e))?;

    match picked {
        Some(file) => {
            let path = file
                .into_path()
                .map_err(|e| format!("Unsupported picker selection: {}", e))?;
            Ok(Some(path.to_string_lossy().to_string()))
        }
        None => Ok(None),
    }
}

/// Load the picked file: remember it as the current selection, set the
/// file-name label and publish a preview data URL. A read failure leaves
/// the previous selection and display state untouched.
#[tauri::command]
pub async fn select_image(
    path: String,
    app: tauri::AppHandle,
    state: State<'_, AppState>,
) -> Result<UiSnapshot, String> {
    let image = preview::load_image(Path::new(&path)).await.map_err(|e| {
        tracing::error!("[select_image] {}", e);
        e.to_string()
    })?;

    let data_url = preview::data_url(&image);
    tracing::info!("selected {} ({} bytes)", image.name, image.bytes.len());

    let snapshot = {
        let mut ui = state.ui.lock().await;
        ui.set_file_name(&image.name);
        ui.set_preview(data_url);
        ui.snapshot()
    };

    *state.selected.lock().await = Some(image);

    let _ = app.emit("preview-updated", &snapshot);
    Ok(snapshot)
}
