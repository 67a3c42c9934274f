//! Mock OCR engine and barcode decoder.
//!
//! Both record the image paths they were handed and whether the file
//! still existed at that moment, so tests can check temp file lifetimes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    BarcodeDecoder, BarcodeError, RecognitionError, RecognitionOptions, TextRecognizer,
};

/// An image path observed by a mock recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenImage {
    pub path: PathBuf,
    pub existed: bool,
}

impl SeenImage {
    fn observe(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            existed: path.exists(),
        }
    }
}

/// Mock OCR engine. Returns [`RecognitionError::NoText`] once the queue is empty.
#[derive(Debug, Clone, Default)]
pub struct MockTextRecognizer {
    responses: Arc<Mutex<VecDeque<Result<String, RecognitionError>>>>,
    seen: Arc<Mutex<Vec<SeenImage>>>,
    options: Arc<Mutex<Vec<RecognitionOptions>>>,
    delay: Duration,
}

impl MockTextRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    pub fn with_error(self, error: RecognitionError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn seen(&self) -> Vec<SeenImage> {
        self.seen.lock().unwrap().clone()
    }

    /// Options passed on each call.
    pub fn options(&self) -> Vec<RecognitionOptions> {
        self.options.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextRecognizer for MockTextRecognizer {
    async fn recognize(
        &self,
        image: &Path,
        options: &RecognitionOptions,
    ) -> Result<String, RecognitionError> {
        self.seen.lock().unwrap().push(SeenImage::observe(image));
        self.options.lock().unwrap().push(options.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RecognitionError::NoText))
    }
}

/// Mock barcode decoder. Returns [`BarcodeError::NoBarcode`] once the queue is empty.
#[derive(Debug, Clone, Default)]
pub struct MockBarcodeDecoder {
    responses: Arc<Mutex<VecDeque<Result<String, BarcodeError>>>>,
    seen: Arc<Mutex<Vec<SeenImage>>>,
    delay: Duration,
}

impl MockBarcodeDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(self, payload: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(payload.into()));
        self
    }

    pub fn with_error(self, error: BarcodeError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn seen(&self) -> Vec<SeenImage> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl BarcodeDecoder for MockBarcodeDecoder {
    async fn decode(&self, image: &Path) -> Result<String, BarcodeError> {
        self.seen.lock().unwrap().push(SeenImage::observe(image));

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(BarcodeError::NoBarcode))
    }
}
