//! Product catalog configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::is_http_url;

/// Open Food Facts configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent sent to the catalog
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ProductsSettings {
    /// Validate catalog configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidUrl("products.base_url"));
        }
        Ok(())
    }
}

impl Default for ProductsSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://world.openfoodfacts.org".to_string()
}

fn default_user_agent() -> String {
    concat!("expiry-reminder/", env!("CARGO_PKG_VERSION")).to_string()
}
