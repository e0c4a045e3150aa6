// Speech worker: the platform TTS engine is owned by a dedicated thread
// (engine handles are not generally Send) and driven through a command
// channel.

use super::catalog::VoiceInfo;
use anyhow::{Context, Result};
use std::sync::mpsc;
use tokio::sync::oneshot;
use tts::Tts;

/// One request to synthesize speech. Volume, rate and pitch are fixed at
/// their nominal values for every utterance.
#[derive(Debug, Clone)]
pub struct UtteranceRequest {
    pub text: String,
    pub language: String,
    pub voice_id: Option<String>,
}

/// Seam over the platform engine so resolution and the cancel-before-speak
/// rule are testable without audio hardware.
pub trait SpeechBackend {
    fn voices(&mut self) -> Result<Vec<VoiceInfo>>;
    /// Cancel whatever is queued or currently audible.
    fn cancel(&mut self) -> Result<()>;
    fn speak(&mut self, request: &UtteranceRequest) -> Result<()>;
}

/// Backend over the system engine via the `tts` crate.
pub struct NativeBackend {
    tts: Tts,
}

impl NativeBackend {
    pub fn new() -> Result<Self> {
        let tts = Tts::default().context("failed to initialize the speech engine")?;
        Ok(Self { tts })
    }
}

impl SpeechBackend for NativeBackend {
    fn voices(&mut self) -> Result<Vec<VoiceInfo>> {
        let voices = self.tts.voices().context("failed to enumerate voices")?;
        Ok(voices
            .iter()
            .map(|v| VoiceInfo {
                id: v.id(),
                name: v.name(),
                language: v.language().to_string(),
            })
            .collect())
    }

    fn cancel(&mut self) -> Result<()> {
        if self.tts.supported_features().stop {
            self.tts.stop().context("failed to cancel speech")?;
        }
        Ok(())
    }

    fn speak(&mut self, request: &UtteranceRequest) -> Result<()> {
        if let Some(id) = &request.voice_id {
            let voice = self
                .tts
                .voices()
                .context("failed to enumerate voices")?
                .into_iter()
                .find(|v| &v.id() == id);
            if let Some(voice) = voice {
                self.tts
                    .set_voice(&voice)
                    .context("failed to select voice")?;
            }
        }
        // No matching voice: the engine keeps its default voice for the tag.

        let features = self.tts.supported_features();
        if features.volume {
            let volume = self.tts.max_volume();
            self.tts
                .set_volume(volume)
                .context("failed to set volume")?;
        }
        if features.rate {
            let rate = self.tts.normal_rate();
            self.tts.set_rate(rate).context("failed to set rate")?;
        }
        if features.pitch {
            let pitch = self.tts.normal_pitch();
            self.tts.set_pitch(pitch).context("failed to set pitch")?;
        }

        // interrupt=true clears anything still queued by the engine
        self.tts
            .speak(request.text.as_str(), true)
            .context("failed to speak")?;
        Ok(())
    }
}

pub enum WorkerCommand {
    ListVoices(oneshot::Sender<Result<Vec<VoiceInfo>, String>>),
    Speak(UtteranceRequest),
    Stop,
}

/// Spawn the worker thread. Returns the command sender, or the engine's
/// initialization error when speech synthesis is unavailable on this
/// system.
pub fn spawn_worker<F>(make_backend: F) -> Result<mpsc::Sender<WorkerCommand>, String>
where
    F: FnOnce() -> Result<Box<dyn SpeechBackend>> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let (ready_tx, ready_rx) = mpsc::channel();

    std::thread::Builder::new()
        .name("speech-worker".to_string())
        .spawn(move || {
            let mut backend = match make_backend() {
                Ok(backend) => {
                    let _ = ready_tx.send(Ok(()));
                    backend
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(format!("{:#}", e)));
                    return;
                }
            };
            worker_loop(backend.as_mut(), rx);
        })
        .map_err(|e| format!("failed to spawn speech worker: {}", e))?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(tx),
        Ok(Err(reason)) => Err(reason),
        Err(_) => Err("speech worker exited during startup".to_string()),
    }
}

fn worker_loop(backend: &mut dyn SpeechBackend, rx: mpsc::Receiver<WorkerCommand>) {
    while let Ok(command) = rx.recv() {
        match command {
            WorkerCommand::ListVoices(reply) => {
                let _ = reply.send(backend.voices().map_err(|e| format!("{:#}", e)));
            }
            WorkerCommand::Speak(request) => {
                tracing::debug!(
                    "speaking {} chars for language '{}'",
                    request.text.len(),
                    request.language
                );
                // One audible utterance at a time: always cancel first
                if let Err(e) = backend.cancel() {
                    tracing::warn!("could not cancel previous utterance: {:#}", e);
                }
                if let Err(e) = backend.speak(&request) {
                    tracing::error!("utterance failed: {:#}", e);
                }
            }
            WorkerCommand::Stop => {
                if let Err(e) = backend.cancel() {
                    tracing::warn!("could not cancel utterance: {:#}", e);
                }
            }
        }
    }
}
