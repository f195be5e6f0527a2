//! Speech-to-text stage (OpenAI Whisper)

use async_trait::async_trait;

use crate::audio::AudioPayload;
use crate::error::Stage;
use crate::pipeline::Transcriber;
use crate::{Error, Result};

/// Default OpenAI API root
const OPENAI_API_BASE: &str = "https://api.openai.com";

/// Whisper model used for every transcription
const WHISPER_MODEL: &str = "whisper-1";

/// Fixed target-language hint; the assistant speaks Brazilian Portuguese
const LANGUAGE_HINT: &str = "pt";

/// Response from the Whisper transcription endpoint
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Transcribes captured speech via OpenAI Whisper
pub struct TranscriptionClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TranscriptionClient {
    /// Create a transcription client
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the API key is empty
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, OPENAI_API_BASE.to_string())
    }

    /// Create a client against a custom API root
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the API key is empty
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingCredential("transcription"));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl Transcriber for TranscriptionClient {
    async fn transcribe(&self, audio: &AudioPayload) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio.bytes().to_vec())
                    .file_name(audio.file_name())
                    .mime_str(audio.mime())?,
            )
            .text("model", WHISPER_MODEL)
            .text("language", LANGUAGE_HINT);

        let response = self
            .client
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "transcription API error");
            return Err(Error::Upstream {
                stage: Stage::Transcription,
                status: status.as_u16(),
                detail: body,
            });
        }

        let result: WhisperResponse = response.json().await?;
        tracing::debug!(transcript = %result.text, "transcription complete");

        Ok(result.text)
    }
}
