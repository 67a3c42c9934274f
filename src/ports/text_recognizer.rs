//! Text Recognizer Port - Interface for OCR engines.
//!
//! Only the recognized text is consumed; the engine is external. The
//! contract uses the first parsed text block of the result.

use async_trait::async_trait;
use std::path::Path;

/// Options passed through to the OCR engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionOptions {
    /// Language hint, e.g. `spa`.
    pub language: String,
    /// Engine version selector.
    pub engine: u8,
}

impl RecognitionOptions {
    pub fn new(language: impl Into<String>, engine: u8) -> Self {
        Self {
            language: language.into(),
            engine,
        }
    }
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self::new("spa", 2)
    }
}

/// Port for recognizing text in an image file.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Returns the first parsed text block found in the image.
    async fn recognize(
        &self,
        image: &Path,
        options: &RecognitionOptions,
    ) -> Result<String, RecognitionError>;
}

/// OCR errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecognitionError {
    /// Image could not be read from disk.
    #[error("image unreadable: {0}")]
    Io(String),

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Engine reported a processing error.
    #[error("engine error: {0}")]
    Engine(String),

    /// Engine returned no parsed result.
    #[error("no text recognized")]
    NoText,

    /// Failed to parse engine response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_expiry_labels() {
        let options = RecognitionOptions::default();
        assert_eq!(options.language, "spa");
        assert_eq!(options.engine, 2);
    }
}
