// Voice catalog: snapshot of the synthesis voices the platform engine
// exposes. The engine may report voices late, so the snapshot is published
// through a watch channel that resolvers wait on.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// One synthesis voice as reported by the platform engine.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceInfo {
    pub id: String,
    pub name: String,
    pub language: String,
}

/// First voice whose language tag contains `lang`, case-insensitively.
///
/// Deliberately a substring test, not an exact match: requesting "en"
/// accepts "en-US" or "en-GB", whichever the engine enumerates first.
pub fn match_voice<'a>(voices: &'a [VoiceInfo], lang: &str) -> Option<&'a VoiceInfo> {
    let needle = lang.to_lowercase();
    voices
        .iter()
        .find(|v| v.language.to_lowercase().contains(&needle))
}

/// Publishing side of the catalog. Every publish is an authoritative
/// replacement of the previous snapshot.
pub struct CatalogPublisher {
    tx: watch::Sender<Option<Arc<Vec<VoiceInfo>>>>,
}

impl CatalogPublisher {
    pub fn publish(&self, voices: Vec<VoiceInfo>) {
        let _ = self.tx.send(Some(Arc::new(voices)));
    }
}

/// Read side: the most recent snapshot, or `None` before the first
/// enumeration finishes.
#[derive(Clone)]
pub struct CatalogHandle {
    rx: watch::Receiver<Option<Arc<Vec<VoiceInfo>>>>,
}

impl CatalogHandle {
    pub fn current(&self) -> Option<Arc<Vec<VoiceInfo>>> {
        self.rx.borrow().clone()
    }

    /// Wait until the catalog has loaded. Resolves immediately when a
    /// snapshot is already present; otherwise suspends until the first
    /// publish. Never blocks the calling thread.
    pub async fn loaded(&self) -> Arc<Vec<VoiceInfo>> {
        let mut rx = self.rx.clone();
        loop {
            if let Some(voices) = rx.borrow_and_update().clone() {
                return voices;
            }
            if rx.changed().await.is_err() {
                // Publisher is gone; nothing will ever load
                return Arc::new(Vec::new());
            }
        }
    }
}

pub fn catalog_channel() -> (CatalogPublisher, CatalogHandle) {
    let (tx, rx) = watch::channel(None);
    (CatalogPublisher { tx }, CatalogHandle { rx })
}
