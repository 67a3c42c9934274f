//! Barcode decoder configuration

use serde::Deserialize;

use super::error::ValidationError;

/// zbarimg configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BarcodeSettings {
    /// Executable name or path
    #[serde(default = "default_command")]
    pub command: String,
}

impl BarcodeSettings {
    /// Validate decoder configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.command.trim().is_empty() {
            return Err(ValidationError::MissingRequired("barcode.command"));
        }
        Ok(())
    }
}

impl Default for BarcodeSettings {
    fn default() -> Self {
        Self {
            command: default_command(),
        }
    }
}

fn default_command() -> String {
    "zbarimg".to_string()
}
