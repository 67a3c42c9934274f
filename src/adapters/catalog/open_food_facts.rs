//! Open Food Facts - Implementation of ProductCatalog over the public v0 API.
//!
//! `GET {base_url}/api/v0/product/{barcode}.json` answers with
//! `status: 1` and a `product` object when the barcode is known, and
//! `status: 0` otherwise. A known product without a name is reported as
//! not found, since the flow needs a name for the reminder title.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::product::Product;
use crate::ports::{CatalogError, ProductCatalog};

/// Configuration for the Open Food Facts client.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsConfig {
    /// Base URL (default: https://world.openfoodfacts.org).
    pub base_url: String,
    /// User-Agent sent with every request; the API asks clients to identify themselves.
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for OpenFoodFactsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://world.openfoodfacts.org".to_string(),
            user_agent: concat!("expiry-reminder/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl OpenFoodFactsConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Open Food Facts product catalog.
pub struct OpenFoodFactsCatalog {
    config: OpenFoodFactsConfig,
    client: Client,
}

impl OpenFoodFactsCatalog {
    pub fn new(config: OpenFoodFactsConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| CatalogError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn product_url(&self, barcode: &str) -> String {
        format!(
            "{}/api/v0/product/{}.json",
            self.config.base_url.trim_end_matches('/'),
            barcode
        )
    }
}

#[async_trait]
impl ProductCatalog for OpenFoodFactsCatalog {
    async fn lookup(&self, barcode: &str) -> Result<Option<Product>, CatalogError> {
        // Barcodes are numeric; anything else cannot be in the catalog and
        // must not be spliced into the URL path.
        if barcode.is_empty() || !barcode.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(None);
        }

        let response = self
            .client
            .get(self.product_url(barcode))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CatalogError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    CatalogError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("Failed to parse product response: {}", e)))?;

        Ok(body.into_product())
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    product: Option<OffProduct>,
}

#[derive(Debug, Deserialize)]
struct OffProduct {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    brands: Option<String>,
    #[serde(default)]
    quantity: Option<String>,
}

impl LookupResponse {
    fn into_product(self) -> Option<Product> {
        if self.status != 1 {
            return None;
        }
        let product = self.product?;
        let name = product.product_name?;
        Product::named(name)
            .ok()
            .map(|p| p.with_brand(product.brands).with_quantity(product.quantity))
    }
}
