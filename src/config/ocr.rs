//! OCR configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::ports::RecognitionOptions;

use super::error::ValidationError;
use super::is_http_url;

/// OCR.space configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OcrSettings {
    /// OCR.space API key
    pub api_key: Secret<String>,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Language hint passed to the engine
    #[serde(default = "default_language")]
    pub language: String,

    /// OCR.space engine selector
    #[serde(default = "default_engine")]
    pub engine: u8,
}

impl OcrSettings {
    pub fn recognition_options(&self) -> RecognitionOptions {
        RecognitionOptions::new(self.language.clone(), self.engine)
    }

    /// Validate OCR configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("ocr.api_key"));
        }
        if !is_http_url(&self.endpoint) {
            return Err(ValidationError::InvalidUrl("ocr.endpoint"));
        }
        if self.language.trim().is_empty() {
            return Err(ValidationError::MissingRequired("ocr.language"));
        }
        if !(1..=3).contains(&self.engine) {
            return Err(ValidationError::InvalidOcrEngine(self.engine));
        }
        Ok(())
    }
}

fn default_endpoint() -> String {
    "https://api.ocr.space/parse/image".to_string()
}

fn default_language() -> String {
    "spa".to_string()
}

fn default_engine() -> u8 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> OcrSettings {
        OcrSettings {
            api_key: Secret::new("K123".to_string()),
            endpoint: default_endpoint(),
            language: default_language(),
            engine: default_engine(),
        }
    }

    #[test]
    fn defaults_validate_and_map_to_options() {
        let s = settings();
        assert!(s.validate().is_ok());
        assert_eq!(s.recognition_options(), RecognitionOptions::new("spa", 2));
    }

    #[test]
    fn unknown_engine_is_rejected() {
        let mut s = settings();
        s.engine = 9;
        assert_eq!(s.validate(), Err(ValidationError::InvalidOcrEngine(9)));
    }
}
