// Client-side speech synthesis: voice catalog, resolution and playback.

mod catalog;
mod tts;

pub use catalog::{match_voice, VoiceInfo};
pub use self::tts::{NativeBackend, SpeechBackend, UtteranceRequest};

use crate::types::LanguageCode;
use catalog::{catalog_channel, CatalogHandle, CatalogPublisher};
use self::tts::WorkerCommand;
use std::sync::mpsc;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech synthesis is not available on this system: {0}")]
    Unavailable(String),
}

struct Inner {
    worker: Option<mpsc::Sender<WorkerCommand>>,
    unavailable: Option<String>,
    catalog: CatalogHandle,
    publisher: CatalogPublisher,
}

/// Facade over the speech worker and the voice catalog.
///
/// `speak` validates synchronously (missing capability is an error the
/// boundary can surface); the catalog wait, voice resolution and the
/// utterance itself are fire-and-forget with logged outcomes.
#[derive(Clone)]
pub struct SpeechService {
    inner: Arc<Inner>,
}

impl SpeechService {
    /// Service over the platform engine. When the engine cannot be
    /// initialized the service stays constructible and every `speak`
    /// reports the capability as unavailable.
    pub fn new() -> Self {
        Self::with_backend_factory(|| {
            NativeBackend::new().map(|b| Box::new(b) as Box<dyn SpeechBackend>)
        })
    }

    pub fn with_backend_factory<F>(make_backend: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<Box<dyn SpeechBackend>> + Send + 'static,
    {
        let (publisher, catalog) = catalog_channel();

        match tts::spawn_worker(make_backend) {
            Ok(worker) => {
                let service = Self {
                    inner: Arc::new(Inner {
                        worker: Some(worker),
                        unavailable: None,
                        catalog,
                        publisher,
                    }),
                };
                service.refresh_voices();
                service
            }
            Err(reason) => {
                tracing::warn!("speech synthesis unavailable: {}", reason);
                Self {
                    inner: Arc::new(Inner {
                        worker: None,
                        unavailable: Some(reason),
                        catalog,
                        publisher,
                    }),
                }
            }
        }
    }

    pub fn available(&self) -> bool {
        self.inner.worker.is_some()
    }

    /// Trigger (re-)enumeration of the platform voices. Every completed
    /// enumeration replaces the published snapshot; a failed one publishes
    /// an empty catalog so waiting utterances proceed on the default voice.
    pub fn refresh_voices(&self) {
        let Some(worker) = self.inner.worker.clone() else {
            return;
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        if worker.send(WorkerCommand::ListVoices(reply_tx)).is_err() {
            tracing::error!("speech worker is gone; cannot refresh voices");
            return;
        }

        let inner = self.inner.clone();
        tauri::async_runtime::spawn(async move {
            match reply_rx.await {
                Ok(Ok(voices)) => {
                    tracing::info!("voice catalog loaded: {} voices", voices.len());
                    inner.publisher.publish(voices);
                }
                Ok(Err(e)) => {
                    tracing::warn!("voice enumeration failed: {}", e);
                    inner.publisher.publish(Vec::new());
                }
                Err(_) => {
                    tracing::error!("speech worker dropped the voice listing");
                    // Publish an empty catalog so pending utterances are not
                    // stuck waiting forever
                    inner.publisher.publish(Vec::new());
                }
            }
        });
    }

    /// Current snapshot for the frontend; empty until the catalog loads.
    pub fn list_voices(&self) -> Vec<VoiceInfo> {
        self.inner
            .catalog
            .current()
            .map(|v| v.as_ref().clone())
            .unwrap_or_default()
    }

    /// Speak `text` in the first voice matching `lang`.
    ///
    /// Waits cooperatively for the catalog when it has not loaded yet, then
    /// resolves the voice and hands the utterance to the worker, which
    /// cancels anything still audible first. Whitespace-only text is a
    /// no-op.
    pub fn speak(&self, text: &str, lang: &LanguageCode) -> Result<(), SpeechError> {
        let worker = self.inner.worker.clone().ok_or_else(|| {
            SpeechError::Unavailable(
                self.inner
                    .unavailable
                    .clone()
                    .unwrap_or_else(|| "no speech engine".to_string()),
            )
        })?;

        if text.trim().is_empty() {
            return Ok(());
        }

        let catalog = self.inner.catalog.clone();
        let text = text.to_string();
        let lang = lang.clone();
        tauri::async_runtime::spawn(async move {
            let voices = catalog.loaded().await;
            let voice_id = match_voice(&voices, lang.as_str()).map(|v| v.id.clone());
            if voice_id.is_none() {
                tracing::debug!("no voice matches '{}', using engine default", lang);
            }

            let request = UtteranceRequest {
                text,
                language: lang.as_str().to_string(),
                voice_id,
            };
            if worker.send(WorkerCommand::Speak(request)).is_err() {
                tracing::error!("speech worker is gone; dropping utterance");
            }
        });

        Ok(())
    }

    /// Cancel any queued or playing utterance.
    pub fn stop(&self) {
        if let Some(worker) = &self.inner.worker {
            let _ = worker.send(WorkerCommand::Stop);
        }
    }
}

impl Default for SpeechService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Cancel,
        Speak { text: String, voice_id: Option<String> },
    }

    struct RecordingBackend {
        voices: Vec<VoiceInfo>,
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl SpeechBackend for RecordingBackend {
        fn voices(&mut self) -> anyhow::Result<Vec<VoiceInfo>> {
            Ok(self.voices.clone())
        }

        fn cancel(&mut self) -> anyhow::Result<()> {
            self.events.lock().unwrap().push(Event::Cancel);
            Ok(())
        }

        fn speak(&mut self, request: &UtteranceRequest) -> anyhow::Result<()> {
            self.events.lock().unwrap().push(Event::Speak {
                text: request.text.clone(),
                voice_id: request.voice_id.clone(),
            });
            Ok(())
        }
    }

    fn voice(id: &str, language: &str) -> VoiceInfo {
        VoiceInfo {
            id: id.to_string(),
            name: id.to_string(),
            language: language.to_string(),
        }
    }

    fn recording_service(
        voices: Vec<VoiceInfo>,
    ) -> (SpeechService, Arc<Mutex<Vec<Event>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_for_backend = events.clone();
        let service = SpeechService::with_backend_factory(move || {
            Ok(Box::new(RecordingBackend {
                voices,
                events: events_for_backend,
            }) as Box<dyn SpeechBackend>)
        });
        (service, events)
    }

    fn wait_for_events(events: &Arc<Mutex<Vec<Event>>>, count: usize) -> Vec<Event> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            {
                let seen = events.lock().unwrap();
                if seen.len() >= count {
                    return seen.clone();
                }
            }
            if Instant::now() > deadline {
                return events.lock().unwrap().clone();
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[tokio::test]
    async fn test_speak_resolves_matching_voice() {
        let (service, events) =
            recording_service(vec![voice("us", "en-US"), voice("in", "hi-IN")]);

        service
            .speak("रोग का पता चला", &LanguageCode::new("hi"))
            .unwrap();

        let seen = wait_for_events(&events, 2);
        assert_eq!(
            seen.last().unwrap(),
            &Event::Speak {
                text: "रोग का पता चला".to_string(),
                voice_id: Some("in".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_unmatched_language_uses_engine_default() {
        let (service, events) = recording_service(vec![voice("us", "en-US")]);

        service.speak("hello", &LanguageCode::new("te")).unwrap();

        let seen = wait_for_events(&events, 2);
        match seen.last().unwrap() {
            Event::Speak { voice_id, .. } => assert!(voice_id.is_none()),
            other => panic!("expected a speak event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_second_utterance_supersedes_first() {
        let (service, events) = recording_service(vec![voice("us", "en-US")]);

        service.speak("first", &LanguageCode::new("en")).unwrap();
        service.speak("second", &LanguageCode::new("en")).unwrap();

        let seen = wait_for_events(&events, 4);
        let speaks: Vec<_> = seen
            .iter()
            .filter(|e| matches!(e, Event::Speak { .. }))
            .collect();
        assert_eq!(speaks.len(), 2);

        // Every utterance is preceded by a cancel, so at most one is ever
        // audible
        for (i, event) in seen.iter().enumerate() {
            if matches!(event, Event::Speak { .. }) {
                assert_eq!(seen[i - 1], Event::Cancel, "speak without prior cancel");
            }
        }
    }

    #[tokio::test]
    async fn test_whitespace_text_is_a_noop() {
        let (service, events) = recording_service(vec![voice("us", "en-US")]);

        service.speak("   \n", &LanguageCode::new("en")).unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        let seen = events.lock().unwrap();
        assert!(!seen.iter().any(|e| matches!(e, Event::Speak { .. })));
    }

    #[tokio::test]
    async fn test_unavailable_engine_is_an_error_not_a_panic() {
        let service =
            SpeechService::with_backend_factory(|| Err(anyhow!("no engine present")));

        assert!(!service.available());
        let err = service
            .speak("anything", &LanguageCode::new("en"))
            .unwrap_err();
        assert!(err.to_string().contains("not available"));
        assert!(service.list_voices().is_empty());
    }
}
