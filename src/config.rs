//! Credentials and fixed voice/avatar configuration

use serde::Serialize;

/// Opaque per-provider secrets for the upstream services
///
/// Loaded once by the configuration surface and passed by value into the
/// pipeline; no pipeline code mutates, persists, or validates them beyond
/// non-empty presence.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// `OpenAI` API key (Whisper transcription and chat replies)
    pub openai: Option<String>,

    /// `ElevenLabs` API key (speech synthesis)
    pub elevenlabs: Option<String>,

    /// `D-ID` API key (avatar rendering)
    pub did: Option<String>,
}

impl Credentials {
    /// Load credentials from environment variables
    ///
    /// Empty values are treated as absent.
    #[must_use]
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        Self {
            openai: read("OPENAI_API_KEY"),
            elevenlabs: read("ELEVENLABS_API_KEY"),
            did: read("DID_API_KEY"),
        }
    }

    /// Per-provider presence, in pipeline order
    #[must_use]
    pub fn provider_status(&self) -> [(&'static str, bool); 3] {
        [
            ("OpenAI", is_present(self.openai.as_deref())),
            ("ElevenLabs", is_present(self.elevenlabs.as_deref())),
            ("D-ID", is_present(self.did.as_deref())),
        ]
    }

    /// Display names of providers without a configured secret
    #[must_use]
    pub fn missing_providers(&self) -> Vec<String> {
        self.provider_status()
            .into_iter()
            .filter(|(_, present)| !present)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// True when every provider has a non-empty secret
    #[must_use]
    pub fn all_present(&self) -> bool {
        self.missing_providers().is_empty()
    }

    /// One-line human-readable key status summary
    #[must_use]
    pub fn status_message(&self) -> String {
        let missing = self.missing_providers();
        if missing.is_empty() {
            "all provider keys configured".to_string()
        } else {
            format!("missing keys: {}", missing.join(", "))
        }
    }
}

fn is_present(secret: Option<&str>) -> bool {
    secret.is_some_and(|s| !s.is_empty())
}

/// A selectable synthesis voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    /// Provider-side voice identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Short description of the voice's character
    pub description: &'static str,
}

/// Voices tuned for Brazilian Portuguese output
pub const VOICES: &[Voice] = &[
    Voice {
        id: "EXAVITQu4vr4xnSDxMaL",
        name: "Sarah",
        description: "natural female voice, ideal for Brazilian Portuguese",
    },
    Voice {
        id: "9BWtsMINqrJLrRacOk9x",
        name: "Aria",
        description: "expressive female voice",
    },
    Voice {
        id: "XB0fDUnXU5powFXDhCwa",
        name: "Charlotte",
        description: "soft female voice",
    },
];

/// The default voice (Sarah)
#[must_use]
pub fn default_voice() -> Voice {
    VOICES[0]
}

/// Synthesis model applied to every request
pub const SYNTHESIS_MODEL: &str = "eleven_multilingual_v2";

/// Fixed voice-style parameters applied uniformly to every synthesis call
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    /// Delivery consistency (0.0 varied .. 1.0 stable)
    pub stability: f32,
    /// How closely output tracks the reference voice
    pub similarity_boost: f32,
    /// Style exaggeration intensity
    pub style: f32,
    /// Boost speaker clarity at a small latency cost
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.6,
            similarity_boost: 0.8,
            style: 0.3,
            use_speaker_boost: true,
        }
    }
}

/// Options for one avatar render job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarOptions {
    /// Still image the avatar is animated from
    pub source_url: String,
    /// Smooth interpolation between driver frames
    pub fluent: bool,
    /// Stitch the rendered face back onto the full still image
    pub stitch: bool,
    /// Container format of the rendered video
    pub result_format: &'static str,
    /// Align the driver to the source face
    pub align_driver: bool,
    /// Automatically match the driver to the audio
    pub auto_match: bool,
}

impl Default for AvatarOptions {
    fn default() -> Self {
        Self {
            source_url:
                "https://create-images-results.d-id.com/DefaultPresenters/Noelle_f/image.jpeg"
                    .to_string(),
            fluent: true,
            stitch: true,
            result_format: "mp4",
            align_driver: true,
            auto_match: true,
        }
    }
}
