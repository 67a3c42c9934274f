//! Barcode Decoder Port - Interface for barcode decoding engines.

use async_trait::async_trait;
use std::path::Path;

/// Port for decoding a barcode from an image file.
#[async_trait]
pub trait BarcodeDecoder: Send + Sync {
    /// Returns the decoded payload, e.g. an EAN-13 string.
    async fn decode(&self, image: &Path) -> Result<String, BarcodeError>;
}

/// Barcode decoding errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BarcodeError {
    /// No barcode was found in the image.
    #[error("no barcode found")]
    NoBarcode,

    /// The engine could not be run or crashed.
    #[error("decoder error: {0}")]
    Engine(String),

    /// Decoding timed out.
    #[error("decoding timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}
