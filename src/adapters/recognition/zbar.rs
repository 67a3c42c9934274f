//! zbarimg - Implementation of BarcodeDecoder by running the zbar CLI.
//!
//! `zbarimg --quiet --raw <file>` prints one decoded payload per line and
//! exits with status 4 when the image holds no barcode.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::ports::{BarcodeDecoder, BarcodeError};

/// Exit status zbarimg uses for "no symbols found".
const NO_SYMBOLS_STATUS: i32 = 4;

/// Barcode decoder backed by the `zbarimg` binary.
#[derive(Debug, Clone)]
pub struct ZbarDecoder {
    command: String,
}

impl Default for ZbarDecoder {
    fn default() -> Self {
        Self::new("zbarimg")
    }
}

impl ZbarDecoder {
    /// Uses `command` as the zbarimg executable.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl BarcodeDecoder for ZbarDecoder {
    async fn decode(&self, image: &Path) -> Result<String, BarcodeError> {
        let output = Command::new(&self.command)
            .arg("--quiet")
            .arg("--raw")
            .arg(image)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| BarcodeError::Engine(format!("Failed to run {}: {}", self.command, e)))?;

        match output.status.code() {
            Some(0) => first_payload(&String::from_utf8_lossy(&output.stdout)),
            Some(NO_SYMBOLS_STATUS) => Err(BarcodeError::NoBarcode),
            _ => Err(BarcodeError::Engine(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
        }
    }
}

fn first_payload(stdout: &str) -> Result<String, BarcodeError> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or(BarcodeError::NoBarcode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_non_empty_line_wins() {
        assert_eq!(
            first_payload("\n8000500310427\n4006381333931\n").unwrap(),
            "8000500310427"
        );
    }

    #[test]
    fn empty_output_is_no_barcode() {
        assert!(matches!(first_payload("  \n"), Err(BarcodeError::NoBarcode)));
    }

    #[tokio::test]
    async fn missing_binary_is_engine_error() {
        let decoder = ZbarDecoder::new("definitely-not-zbarimg-9f3a");
        let err = decoder.decode(Path::new("/tmp/none.jpg")).await.unwrap_err();
        assert!(matches!(err, BarcodeError::Engine(_)));
    }
}
