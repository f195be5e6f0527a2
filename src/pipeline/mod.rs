//! Voice-response pipeline
//!
//! Turns one captured audio clip into a talking-avatar video reply in
//! four strictly sequential stages, each backed by an external service:
//! transcription, reply generation, speech synthesis, and avatar
//! rendering. The first stage failure aborts the whole run.

mod avatar;
mod dialogue;
mod synthesis;
mod transcription;

pub use avatar::{AvatarRenderClient, RenderPolicy, RenderStatus};
pub use dialogue::DialogueClient;
pub use synthesis::SpeechSynthesisClient;
pub use transcription::TranscriptionClient;

use async_trait::async_trait;

use crate::audio::AudioPayload;
use crate::config::Credentials;
use crate::history::ConversationHistory;
use crate::{Error, Result};

/// Speech-to-text stage
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a captured clip to text
    async fn transcribe(&self, audio: &AudioPayload) -> Result<String>;
}

/// Reply-generation stage
#[async_trait]
pub trait DialogueModel: Send + Sync {
    /// Generate the assistant's reply to `user_text`, given prior turns
    async fn reply(&self, user_text: &str, history: &ConversationHistory) -> Result<String>;
}

/// Speech-synthesis stage
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize spoken audio for `text`
    async fn synthesize(&self, text: &str) -> Result<AudioPayload>;
}

/// Avatar-render stage
#[async_trait]
pub trait AvatarRenderer: Send + Sync {
    /// Render a talking-head video speaking `audio`, returning its URL
    async fn render(&self, audio: &AudioPayload) -> Result<String>;
}

/// Terminal artifact of one successful pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    /// What the user said
    pub transcription: String,
    /// What the assistant answered
    pub reply: String,
    /// Playable URL of the rendered talking-head video
    pub video_url: String,
}

/// Sequential orchestrator for voice exchanges
///
/// Owns the conversation history accumulator; history is appended only
/// after a fully successful run, so a failed exchange never leaves a
/// half-completed pair of turns behind. At most one exchange may be in
/// flight at a time (`run` takes `&mut self`).
pub struct VoicePipeline {
    transcriber: Box<dyn Transcriber>,
    dialogue: Box<dyn DialogueModel>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    renderer: Box<dyn AvatarRenderer>,
    history: ConversationHistory,
}

impl std::fmt::Debug for VoicePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoicePipeline")
            .field("history_turns", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl VoicePipeline {
    /// Assemble a pipeline from explicit stage implementations
    #[must_use]
    pub fn new(
        transcriber: Box<dyn Transcriber>,
        dialogue: Box<dyn DialogueModel>,
        synthesizer: Box<dyn SpeechSynthesizer>,
        renderer: Box<dyn AvatarRenderer>,
    ) -> Self {
        Self {
            transcriber,
            dialogue,
            synthesizer,
            renderer,
            history: ConversationHistory::new(),
        }
    }

    /// Build the production pipeline from provider credentials
    ///
    /// All three providers are checked up front so a caller gets one
    /// consolidated error instead of failing deep into a run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] listing every missing provider; no
    /// client is constructed and no network I/O is attempted.
    pub fn from_credentials(credentials: &Credentials) -> Result<Self> {
        let missing = credentials.missing_providers();
        if !missing.is_empty() {
            return Err(Error::Config { missing });
        }

        let openai = credentials.openai.clone().unwrap_or_default();
        let elevenlabs = credentials.elevenlabs.clone().unwrap_or_default();
        let did = credentials.did.clone().unwrap_or_default();

        Ok(Self::new(
            Box::new(TranscriptionClient::new(openai.clone())?),
            Box::new(DialogueClient::new(openai)?),
            Box::new(SpeechSynthesisClient::new(elevenlabs)?),
            Box::new(AvatarRenderClient::new(did)?),
        ))
    }

    /// Run one full voice exchange
    ///
    /// Stages execute in strict sequence; each stage's output is the next
    /// stage's input. The first failure aborts the run, discarding any
    /// intermediate artifacts and leaving the history untouched. On
    /// success the transcription and reply are appended to the history,
    /// in that order.
    ///
    /// # Errors
    ///
    /// Returns the failing stage's error unchanged; see [`Error::stage`]
    /// for attribution.
    pub async fn run(&mut self, audio: AudioPayload) -> Result<PipelineResult> {
        tracing::info!(audio_bytes = audio.len(), "starting voice exchange");

        let transcription = self.transcriber.transcribe(&audio).await?;
        tracing::info!(transcript = %transcription, "transcription complete");

        let reply = self.dialogue.reply(&transcription, &self.history).await?;
        tracing::info!(reply = %reply, "reply generated");

        let speech = self.synthesizer.synthesize(&reply).await?;
        tracing::info!(audio_bytes = speech.len(), "speech synthesized");

        let video_url = self.renderer.render(&speech).await?;
        tracing::info!(video_url = %video_url, "avatar video ready");

        self.history.record_exchange(&transcription, &reply);

        Ok(PipelineResult {
            transcription,
            reply,
            video_url,
        })
    }

    /// Turns accumulated across successful exchanges
    #[must_use]
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }
}
