//! Remote transcription API client.
//!
//! The API accepts `multipart/form-data` with a `media` part (the chunk
//! bytes, filename preserved) and a `lang` field, and answers with a JSON
//! transcription. The trait seam exists so the pipeline can be exercised
//! without a live endpoint.

use crate::error::TranscribeError;
use crate::model::TranscriptSegment;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// One chunk's transcription as returned by the API.
///
/// Validation fails closed: a body missing any required field is rejected.
/// Extra fields (server-side timings, stats) are tolerated.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTranscription {
    pub text: String,
    pub lang: String,
    pub segments: Vec<TranscriptSegment>,
}

/// A speech-to-text service that transcribes one media chunk at a time.
#[async_trait]
pub trait SpeechApi: Send + Sync {
    async fn transcribe_chunk(
        &self,
        media: Vec<u8>,
        filename: &str,
        lang: &str,
    ) -> Result<ApiTranscription, TranscribeError>;
}

/// HTTP implementation posting to a configured endpoint.
pub struct HttpSpeechApi {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSpeechApi {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TranscribeError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(TranscribeError::ApiTransport)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl SpeechApi for HttpSpeechApi {
    async fn transcribe_chunk(
        &self,
        media: Vec<u8>,
        filename: &str,
        lang: &str,
    ) -> Result<ApiTranscription, TranscribeError> {
        debug!(endpoint = %self.endpoint, filename, bytes = media.len(), "posting chunk");

        let part = reqwest::multipart::Part::bytes(media).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .part("media", part)
            .text("lang", lang.to_string());

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(TranscribeError::ApiTransport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscribeError::ApiStatus { status });
        }

        let body = response
            .bytes()
            .await
            .map_err(TranscribeError::ApiTransport)?;
        serde_json::from_slice(&body).map_err(TranscribeError::InvalidResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_with_extra_fields_is_accepted() {
        let body = r#"{
            "text": "こんにちは",
            "lang": "ja",
            "segments": [{"start": 0.0, "end": 2.5, "text": "こんにちは"}],
            "file": "/tmp/trans/abc",
            "original": "000.wav",
            "duration": 1.9
        }"#;
        let parsed: ApiTranscription = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.text, "こんにちは");
        assert_eq!(parsed.segments.len(), 1);
    }

    #[test]
    fn test_response_missing_required_field_is_rejected() {
        let body = r#"{"lang": "ja", "segments": []}"#;
        assert!(serde_json::from_str::<ApiTranscription>(body).is_err());
    }

    #[test]
    fn test_response_with_wrong_segment_shape_is_rejected() {
        let body = r#"{"text": "x", "lang": "ja", "segments": [{"start": 0.0}]}"#;
        assert!(serde_json::from_str::<ApiTranscription>(body).is_err());
    }
}
