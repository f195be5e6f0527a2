//! Speech-synthesis stage (ElevenLabs)

use async_trait::async_trait;

use crate::audio::AudioPayload;
use crate::config::{self, Voice, VoiceSettings};
use crate::error::Stage;
use crate::pipeline::SpeechSynthesizer;
use crate::{Error, Result};

/// Default ElevenLabs API root
const ELEVENLABS_API_BASE: &str = "https://api.elevenlabs.io";

/// Synthesizes spoken audio from reply text via ElevenLabs
pub struct SpeechSynthesisClient {
    client: reqwest::Client,
    api_key: String,
    voice: Voice,
    settings: VoiceSettings,
    base_url: String,
}

impl SpeechSynthesisClient {
    /// Create a synthesis client using the default voice
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the API key is empty
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, ELEVENLABS_API_BASE.to_string())
    }

    /// Create a client against a custom API root
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the API key is empty
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingCredential("synthesis"));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice: config::default_voice(),
            settings: VoiceSettings::default(),
            base_url,
        })
    }

    /// Select a different voice from the catalog
    #[must_use]
    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = voice;
        self
    }
}

#[async_trait]
impl SpeechSynthesizer for SpeechSynthesisClient {
    async fn synthesize(&self, text: &str) -> Result<AudioPayload> {
        #[derive(serde::Serialize)]
        struct SynthesisRequest<'a> {
            text: &'a str,
            model_id: &'a str,
            voice_settings: VoiceSettings,
        }

        let request = SynthesisRequest {
            text,
            model_id: config::SYNTHESIS_MODEL,
            voice_settings: self.settings,
        };

        tracing::debug!(voice = self.voice.name, text_bytes = text.len(), "synthesizing speech");

        let response = self
            .client
            .post(format!(
                "{}/v1/text-to-speech/{}",
                self.base_url, self.voice.id
            ))
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "synthesis API error");
            return Err(Error::Upstream {
                stage: Stage::Synthesis,
                status: status.as_u16(),
                detail: body,
            });
        }

        let audio = response.bytes().await?;
        tracing::debug!(audio_bytes = audio.len(), "speech synthesized");

        Ok(AudioPayload::mp3(audio.to_vec()))
    }
}
