// Playback thread for the audio clips the detection service renders.
// The output stream handle is not Send, so a dedicated thread owns it and
// accepts clips over a channel; a new clip replaces whatever is playing.

use anyhow::{Context, Result};
use std::io::Cursor;
use std::sync::mpsc;

enum PlayerCommand {
    Play(Vec<u8>),
    Stop,
}

/// Handle to the playback thread.
#[derive(Clone)]
pub struct AudioPlayer {
    tx: mpsc::Sender<PlayerCommand>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::Builder::new()
            .name("audio-player".to_string())
            .spawn(move || {
                if let Err(e) = run_player(rx) {
                    // No output device (or it vanished): clips are dropped
                    // silently from here on, which is the desired degradation
                    tracing::warn!("audio playback disabled: {:#}", e);
                }
            })
            .expect("failed to spawn audio player thread");

        Self { tx }
    }

    /// Decode and play a clip, replacing any clip currently playing.
    pub fn play(&self, bytes: Vec<u8>) {
        let _ = self.tx.send(PlayerCommand::Play(bytes));
    }

    pub fn stop(&self) {
        let _ = self.tx.send(PlayerCommand::Stop);
    }
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

fn run_player(rx: mpsc::Receiver<PlayerCommand>) -> Result<()> {
    let (_stream, handle) =
        rodio::OutputStream::try_default().context("no audio output device")?;
    let mut current: Option<rodio::Sink> = None;

    while let Ok(command) = rx.recv() {
        match command {
            PlayerCommand::Play(bytes) => {
                if let Some(sink) = current.take() {
                    sink.stop();
                }
                let source = match rodio::Decoder::new(Cursor::new(bytes)) {
                    Ok(source) => source,
                    Err(e) => {
                        tracing::warn!("could not decode audio clip: {}", e);
                        continue;
                    }
                };
                match rodio::Sink::try_new(&handle) {
                    Ok(sink) => {
                        sink.append(source);
                        current = Some(sink);
                    }
                    Err(e) => tracing::warn!("could not open playback sink: {}", e),
                }
            }
            PlayerCommand::Stop => {
                if let Some(sink) = current.take() {
                    sink.stop();
                }
            }
        }
    }

    Ok(())
}
