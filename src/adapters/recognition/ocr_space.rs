//! OCR.space - Implementation of TextRecognizer over the parse/image API.
//!
//! The image is uploaded as a multipart `file` part together with the
//! `apikey`, `language` and `OCREngine` fields. Only the first entry of
//! `ParsedResults` is used.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::ports::{RecognitionError, RecognitionOptions, TextRecognizer};

/// Configuration for the OCR.space client.
#[derive(Debug, Clone)]
pub struct OcrSpaceConfig {
    api_key: Secret<String>,
    /// Endpoint (default: https://api.ocr.space/parse/image).
    pub endpoint: String,
    pub timeout: Duration,
}

impl OcrSpaceConfig {
    pub fn new(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            endpoint: "https://api.ocr.space/parse/image".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OCR.space text recognizer.
pub struct OcrSpaceRecognizer {
    config: OcrSpaceConfig,
    client: Client,
}

impl OcrSpaceRecognizer {
    pub fn new(config: OcrSpaceConfig) -> Result<Self, RecognitionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RecognitionError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl TextRecognizer for OcrSpaceRecognizer {
    async fn recognize(
        &self,
        image: &Path,
        options: &RecognitionOptions,
    ) -> Result<String, RecognitionError> {
        let bytes = tokio::fs::read(image)
            .await
            .map_err(|e| RecognitionError::Io(format!("{}: {}", image.display(), e)))?;

        let file_name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.jpg".to_string());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/jpeg")
            .map_err(|e| RecognitionError::Io(e.to_string()))?;

        let form = Form::new()
            .text("apikey", self.config.api_key.expose_secret().clone())
            .text("language", options.language.clone())
            .text("OCREngine", options.engine.to_string())
            .part("file", part);

        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RecognitionError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    RecognitionError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecognitionError::Engine(format!(
                "status {}: {}",
                status, body
            )));
        }

        let body: ParseResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::Parse(format!("Failed to parse OCR response: {}", e)))?;

        body.into_text()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParseResponse {
    #[serde(default)]
    parsed_results: Vec<ParsedResult>,
    #[serde(default)]
    is_errored_on_processing: bool,
    #[serde(default)]
    error_message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: String,
}

impl ParseResponse {
    fn into_text(self) -> Result<String, RecognitionError> {
        if self.is_errored_on_processing {
            return Err(RecognitionError::Engine(describe_error(self.error_message)));
        }
        self.parsed_results
            .into_iter()
            .next()
            .map(|r| r.parsed_text)
            .ok_or(RecognitionError::NoText)
    }
}

/// `ErrorMessage` is a string or an array of strings depending on the failure.
fn describe_error(message: Option<serde_json::Value>) -> String {
    match message {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        _ => "processing failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<String, RecognitionError> {
        serde_json::from_str::<ParseResponse>(json).unwrap().into_text()
    }

    #[test]
    fn first_parsed_text_is_used() {
        let text = parse(
            r#"{"ParsedResults":[{"ParsedText":"CAD 05/2026\r\n","ErrorMessage":""},
                                 {"ParsedText":"ignored"}],
                "OCRExitCode":1,"IsErroredOnProcessing":false}"#,
        )
        .unwrap();
        assert_eq!(text, "CAD 05/2026\r\n");
    }

    #[test]
    fn errored_response_reports_messages() {
        let err = parse(
            r#"{"OCRExitCode":99,"IsErroredOnProcessing":true,
                "ErrorMessage":["Unable to recognize the file type","E216"]}"#,
        )
        .unwrap_err();
        match err {
            RecognitionError::Engine(message) => {
                assert_eq!(message, "Unable to recognize the file type; E216")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn empty_results_are_no_text() {
        let err = parse(r#"{"ParsedResults":[],"IsErroredOnProcessing":false}"#).unwrap_err();
        assert!(matches!(err, RecognitionError::NoText));
    }

    #[tokio::test]
    async fn unreadable_file_is_io_error() {
        let recognizer =
            OcrSpaceRecognizer::new(OcrSpaceConfig::new(Secret::new("key".to_string()))).unwrap();
        let err = recognizer
            .recognize(Path::new("/nonexistent/expiry.jpg"), &RecognitionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RecognitionError::Io(_)));
    }
}
