//! ProductResolver - barcode to product metadata.
//!
//! Wraps the catalog port with a deadline and folds its answers into a
//! three-way outcome. Transport failures are reported separately from
//! misses so they can be logged differently, but callers treat both as
//! "no product".

use std::sync::Arc;
use std::time::Duration;

use crate::domain::product::Product;
use crate::ports::{CatalogError, ProductCatalog};

/// Outcome of a barcode lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductLookup {
    Found(Product),
    NotFound,
    /// The catalog could not be asked. Carries the reason for logging.
    Failed(String),
}

/// Resolves barcodes against the product catalog.
pub struct ProductResolver {
    catalog: Arc<dyn ProductCatalog>,
    timeout: Duration,
}

impl ProductResolver {
    pub fn new(catalog: Arc<dyn ProductCatalog>, timeout: Duration) -> Self {
        Self { catalog, timeout }
    }

    /// Looks up `barcode`. Never fails; see [`ProductLookup`].
    pub async fn resolve(&self, barcode: &str) -> ProductLookup {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return ProductLookup::NotFound;
        }

        let answer = match tokio::time::timeout(self.timeout, self.catalog.lookup(barcode)).await {
            Ok(answer) => answer,
            Err(_) => Err(CatalogError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }),
        };

        match answer {
            Ok(Some(product)) => {
                tracing::debug!(barcode, product = %product.name(), "Product resolved");
                ProductLookup::Found(product)
            }
            Ok(None) => {
                tracing::info!(barcode, "Barcode not in catalog");
                ProductLookup::NotFound
            }
            Err(e) => {
                tracing::warn!(barcode, error = %e, "Product catalog lookup failed");
                ProductLookup::Failed(e.to_string())
            }
        }
    }
}
