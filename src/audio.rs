//! Audio payloads passed between pipeline stages

/// An immutable audio clip plus its declared encoding
///
/// Produced once (by capture or by the synthesis stage) and then moved
/// stage to stage; the bytes are never inspected or transcoded locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    bytes: Vec<u8>,
    mime: &'static str,
    file_name: &'static str,
}

impl AudioPayload {
    /// Captured speech audio (WebM/Opus, the capture surface's format)
    #[must_use]
    pub fn webm(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: "audio/webm",
            file_name: "audio.webm",
        }
    }

    /// Synthesized speech audio (MP3, what the synthesis service returns)
    #[must_use]
    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: "audio/mpeg",
            file_name: "audio.mp3",
        }
    }

    /// WAV audio, for clips recorded outside the browser capture path
    #[must_use]
    pub fn wav(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: "audio/wav",
            file_name: "audio.wav",
        }
    }

    /// Classify a clip by file extension, defaulting to WebM capture audio
    #[must_use]
    pub fn from_extension(extension: Option<&str>, bytes: Vec<u8>) -> Self {
        match extension {
            Some(ext) if ext.eq_ignore_ascii_case("wav") => Self::wav(bytes),
            Some(ext) if ext.eq_ignore_ascii_case("mp3") => Self::mp3(bytes),
            _ => Self::webm(bytes),
        }
    }

    /// Raw encoded audio bytes
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared MIME type
    #[must_use]
    pub fn mime(&self) -> &'static str {
        self.mime
    }

    /// File name used when uploading the clip
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    /// Size of the encoded clip in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the clip holds no audio data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
