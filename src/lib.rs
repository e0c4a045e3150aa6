// LeafScan Tauri application

mod audio_player;
mod commands_detect;
mod commands_preview;
mod commands_settings;
mod commands_voice;
mod config;
mod detection;
mod localizer;
mod preview;
mod state;
mod types;
mod voice;

use audio_player::AudioPlayer;
use config::AppConfig;
use detection::DetectionService;
use state::UiState;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use types::SelectedImage;
use voice::SpeechService;

/// Application state wrapper.
pub struct AppState {
    pub config: Arc<RwLock<AppConfig>>,
    pub ui: Mutex<UiState>,
    pub selected: Mutex<Option<SelectedImage>>,
    pub detector: DetectionService,
    pub speech: SpeechService,
    pub audio: AudioPlayer,
}

impl AppState {
    fn new() -> Self {
        let config = Arc::new(RwLock::new(config::load_config()));
        let detector = DetectionService::new(config.clone());

        let speech = SpeechService::new();
        if !speech.available() {
            tracing::warn!(
                "speech synthesis capability is absent; results will be text and server audio only"
            );
        }

        let audio = AudioPlayer::new();

        Self {
            config,
            ui: Mutex::new(UiState::default()),
            selected: Mutex::new(None),
            detector,
            speech,
            audio,
        }
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            use tauri::Manager;
            app.manage(AppState::new());
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands_preview::pick_image,
            commands_preview::select_image,
            commands_detect::submit_image,
            commands_detect::get_ui_state,
            commands_detect::check_endpoint,
            commands_voice::speak_text,
            commands_voice::stop_speaking,
            commands_voice::list_voices,
            commands_voice::refresh_voices,
            commands_settings::get_settings,
            commands_settings::save_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
