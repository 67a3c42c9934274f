//! Product Catalog Port - Read-only product metadata lookup by barcode.

use async_trait::async_trait;

use crate::domain::product::Product;

/// Port for looking up product metadata.
///
/// `Ok(None)` is a valid "not found" answer; `Err` means the catalog could
/// not be asked.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn lookup(&self, barcode: &str) -> Result<Option<Product>, CatalogError>;
}

/// Product catalog errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Catalog answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Failed to parse catalog response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}
