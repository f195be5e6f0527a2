//! Error types for the Liz gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Speech-to-text transcription
    Transcription,
    /// Reply generation
    Dialogue,
    /// Speech synthesis
    Synthesis,
    /// Avatar render job submission
    RenderSubmit,
    /// Avatar render job polling
    RenderPoll,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Transcription => "transcription",
            Self::Dialogue => "dialogue",
            Self::Synthesis => "synthesis",
            Self::RenderSubmit => "render-submit",
            Self::RenderPoll => "render-poll",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in the voice pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// One or more provider credentials are missing
    #[error("missing credentials for: {}", .missing.join(", "))]
    Config {
        /// Display names of providers without a configured secret
        missing: Vec<String>,
    },

    /// A stage client was constructed with an empty credential
    #[error("{0} credential not configured")]
    MissingCredential(&'static str),

    /// A contacted service returned a non-success status
    #[error("{stage} failed with status {status}: {detail}")]
    Upstream {
        /// Stage whose request was rejected
        stage: Stage,
        /// HTTP status code returned by the service
        status: u16,
        /// Response body text, kept for diagnostics
        detail: String,
    },

    /// A service response parsed but lacked a required field
    #[error("invalid {stage} response: {detail}")]
    InvalidResponse {
        /// Stage whose response was malformed
        stage: Stage,
        /// What was missing or wrong
        detail: String,
    },

    /// The render service reported the job itself failed
    #[error("avatar render failed: {detail}")]
    RenderFailed {
        /// Failure description from the render service
        detail: String,
    },

    /// Render polling exhausted its attempt ceiling
    #[error("avatar render still pending after {attempts} status checks")]
    RenderTimeout {
        /// Number of polls performed before giving up
        attempts: u32,
    },

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stage this failure is attributed to, when stage-specific
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Upstream { stage, .. } | Self::InvalidResponse { stage, .. } => Some(*stage),
            Self::RenderFailed { .. } | Self::RenderTimeout { .. } => Some(Stage::RenderPoll),
            _ => None,
        }
    }

    /// Short guidance telling the user what to fix or do next
    #[must_use]
    pub fn user_hint(&self) -> &'static str {
        match self {
            Self::Config { .. } | Self::MissingCredential(_) => {
                "configure the missing API keys and try again"
            }
            Self::Upstream { stage, .. } | Self::InvalidResponse { stage, .. } => match stage {
                Stage::Transcription => "audio transcription failed; check your OpenAI key",
                Stage::Dialogue => "reply generation failed; check your OpenAI key",
                Stage::Synthesis => "speech synthesis failed; check your ElevenLabs key",
                Stage::RenderSubmit | Stage::RenderPoll => {
                    "avatar animation failed; check your D-ID key"
                }
            },
            Self::RenderFailed { .. } => "avatar animation failed; check your D-ID key",
            Self::RenderTimeout { .. } => "avatar render took too long; try again",
            Self::Http(_) | Self::Serialization(_) | Self::Io(_) => {
                "processing failed; try again"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_config_lists_providers() {
        let err = Error::Config {
            missing: vec!["OpenAI".to_string(), "D-ID".to_string()],
        };
        assert_eq!(err.to_string(), "missing credentials for: OpenAI, D-ID");
    }

    #[test]
    fn display_missing_credential() {
        let err = Error::MissingCredential("transcription");
        assert_eq!(err.to_string(), "transcription credential not configured");
    }

    #[test]
    fn display_upstream_names_stage_and_status() {
        let err = Error::Upstream {
            stage: Stage::Synthesis,
            status: 401,
            detail: "invalid api key".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "synthesis failed with status 401: invalid api key"
        );
    }

    #[test]
    fn display_render_timeout() {
        let err = Error::RenderTimeout { attempts: 30 };
        assert_eq!(
            err.to_string(),
            "avatar render still pending after 30 status checks"
        );
    }

    #[test]
    fn stage_tags_upstream_failures() {
        let err = Error::Upstream {
            stage: Stage::Dialogue,
            status: 500,
            detail: String::new(),
        };
        assert_eq!(err.stage(), Some(Stage::Dialogue));
    }

    #[test]
    fn stage_tags_render_outcomes_as_poll() {
        let failed = Error::RenderFailed {
            detail: "driver error".to_string(),
        };
        let timed_out = Error::RenderTimeout { attempts: 5 };

        assert_eq!(failed.stage(), Some(Stage::RenderPoll));
        assert_eq!(timed_out.stage(), Some(Stage::RenderPoll));
    }

    #[test]
    fn stage_absent_for_config_errors() {
        let err = Error::Config { missing: vec![] };
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn hint_points_at_the_right_credential() {
        let synthesis = Error::Upstream {
            stage: Stage::Synthesis,
            status: 401,
            detail: String::new(),
        };
        assert!(synthesis.user_hint().contains("ElevenLabs"));

        let render = Error::RenderFailed {
            detail: String::new(),
        };
        assert!(render.user_hint().contains("D-ID"));
    }
}
