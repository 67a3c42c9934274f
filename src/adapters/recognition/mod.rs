//! Image recognition adapters: OCR and barcode decoding.

mod ocr_space;
mod zbar;

pub use ocr_space::{OcrSpaceConfig, OcrSpaceRecognizer};
pub use zbar::ZbarDecoder;
