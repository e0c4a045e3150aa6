// Application settings commands

use crate::config::{self, AppConfig};
use crate::AppState;
use tauri::State;

#[tauri::command]
pub fn get_settings(state: State<'_, AppState>) -> Result<AppConfig, String> {
    Ok(state.config.read().expect("config lock poisoned").clone())
}

/// Persist the settings and apply them to the running app; the endpoint
/// base URL takes effect on the next submission.
#[tauri::command]
pub fn save_settings(settings: AppConfig, state: State<'_, AppState>) -> Result<(), String> {
    config::save_config(&settings)?;
    *state.config.write().expect("config lock poisoned") = settings;
    Ok(())
}
