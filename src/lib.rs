//! Liz gateway - talking-avatar voice assistant pipeline
//!
//! This library turns one captured audio clip into a talking-avatar
//! video reply through four strictly sequential, network-backed stages:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  Capture surface                      │
//! │        (microphone UI, out of scope here)             │
//! └──────────────────────┬───────────────────────────────┘
//!                        │ AudioPayload
//! ┌──────────────────────▼───────────────────────────────┐
//! │                  VoicePipeline                        │
//! │  Transcription → Dialogue → Synthesis → Avatar render │
//! └──────────────────────┬───────────────────────────────┘
//!                        │ PipelineResult
//! ┌──────────────────────▼───────────────────────────────┐
//! │              Chat / history surface                   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Each stage calls an external service; the avatar-render stage is the
//! only one with server-side asynchronous completion and is polled with
//! a bounded retry policy. A run either fully succeeds or produces no
//! artifact at all.

pub mod audio;
pub mod config;
pub mod error;
pub mod history;
pub mod pipeline;

pub use audio::AudioPayload;
pub use config::{AvatarOptions, Credentials, SYNTHESIS_MODEL, VOICES, Voice, VoiceSettings, default_voice};
pub use error::{Error, Result, Stage};
pub use history::{ConversationHistory, ConversationTurn, Role};
pub use pipeline::{
    AvatarRenderClient, AvatarRenderer, DialogueClient, DialogueModel, PipelineResult,
    RenderPolicy, RenderStatus, SpeechSynthesisClient, SpeechSynthesizer, TranscriptionClient,
    Transcriber, VoicePipeline,
};
