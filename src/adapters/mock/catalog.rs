//! Mock product catalog.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::product::Product;
use crate::ports::{CatalogError, ProductCatalog};

/// Serves products from a fixed barcode table.
#[derive(Debug, Clone, Default)]
pub struct MockProductCatalog {
    products: Arc<Mutex<HashMap<String, Product>>>,
    error: Option<CatalogError>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl MockProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(self, barcode: impl Into<String>, product: Product) -> Self {
        self.products.lock().unwrap().insert(barcode.into(), product);
        self
    }

    /// Every lookup fails with `error`.
    pub fn failing(mut self, error: CatalogError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Shared counter of lookups performed.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductCatalog for MockProductCatalog {
    async fn lookup(&self, barcode: &str) -> Result<Option<Product>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self.products.lock().unwrap().get(barcode).cloned())
    }
}
