// Client for the remote disease-detection service

use crate::config::AppConfig;
use crate::types::{DetectionReport, LanguageCode, SelectedImage};
use reqwest::multipart;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("failed to reach detection service: {0}")]
    Request(#[from] reqwest::Error),
    #[error("detection service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// HTTP client for the detection endpoint.
///
/// Also tracks a submission generation so responses that were overtaken by a
/// newer submission can be recognized and discarded instead of overwriting
/// fresher display state.
pub struct DetectionService {
    client: Client,
    config: Arc<RwLock<AppConfig>>,
    generation: AtomicU64,
}

impl DetectionService {
    /// Detection can involve model inference on the server; no request
    /// timeout is applied.
    pub fn new(config: Arc<RwLock<AppConfig>>) -> Self {
        Self {
            client: Client::new(),
            config,
            generation: AtomicU64::new(0),
        }
    }

    fn base_url(&self) -> String {
        let config = self.config.read().expect("config lock poisoned");
        config.endpoint.base_url.trim_end_matches('/').to_string()
    }

    /// Start a new submission, superseding any in-flight one.
    pub fn begin_submission(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `token` still identifies the newest submission.
    pub fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }

    /// Upload the image and language selection, returning the parsed report.
    pub async fn detect(
        &self,
        image: &SelectedImage,
        language: &LanguageCode,
    ) -> Result<DetectionReport, DetectError> {
        let part = multipart::Part::bytes(image.bytes.clone())
            .file_name(image.name.clone())
            .mime_str(&image.mime)?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("language", language.as_str().to_string());

        let response = self
            .client
            .post(format!("{}/detect", self.base_url()))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DetectError::Status { status, body });
        }

        Ok(response.json::<DetectionReport>().await?)
    }

    fn audio_url_at(&self, ts_millis: i64) -> String {
        format!("{}/audio?ts={}", self.base_url(), ts_millis)
    }

    /// Fetch the audio rendition of the latest result. The timestamp query
    /// parameter only exists to defeat caching.
    pub async fn fetch_result_audio(&self) -> Result<Vec<u8>, DetectError> {
        let url = self.audio_url_at(chrono::Utc::now().timestamp_millis());
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DetectError::Status { status, body });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Check that the detection service is reachable; returns its banner.
    pub async fn check_endpoint(&self) -> Result<String, DetectError> {
        let response = self
            .client
            .get(format!("{}/", self.base_url()))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DetectError::Status { status, body });
        }

        Ok(response.text().await.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_at(base_url: &str) -> DetectionService {
        let mut config = AppConfig::default();
        config.endpoint.base_url = base_url.to_string();
        DetectionService::new(Arc::new(RwLock::new(config)))
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let service = service_at("http://127.0.0.1:8000/");
        assert_eq!(service.base_url(), "http://127.0.0.1:8000");
        assert_eq!(
            service.audio_url_at(42),
            "http://127.0.0.1:8000/audio?ts=42"
        );
    }

    #[test]
    fn test_audio_url_carries_cache_buster() {
        let service = service_at("http://localhost:8000");
        let first = service.audio_url_at(1_700_000_000_000);
        let second = service.audio_url_at(1_700_000_000_001);
        assert!(first.contains("/audio?ts="));
        assert_ne!(first, second);
    }

    #[test]
    fn test_generation_supersedes_older_submissions() {
        let service = service_at("http://localhost:8000");
        let first = service.begin_submission();
        assert!(service.is_current(first));

        let second = service.begin_submission();
        assert!(!service.is_current(first), "old token must go stale");
        assert!(service.is_current(second));
    }

    #[test]
    fn test_generation_starts_fresh() {
        let service = service_at("http://localhost:8000");
        // No submission yet: no token is current
        assert!(!service.is_current(1));
    }
}
