//! Product value object.
//!
//! A product is either filled in one go by the catalog lookup (barcode
//! path) or built from the user's typed name (manual path). Only the name
//! is required.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// A perishable product being registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    name: String,
    brand: Option<String>,
    quantity: Option<String>,
}

impl Product {
    /// Creates a product with just a name, as typed by the user.
    ///
    /// The name is trimmed; an empty result is rejected.
    pub fn named(name: impl AsRef<str>) -> Result<Self, ValidationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            name: name.to_string(),
            brand: None,
            quantity: None,
        })
    }

    /// Sets the brand; blank values are treated as absent.
    pub fn with_brand(mut self, brand: Option<String>) -> Self {
        self.brand = non_blank(brand);
        self
    }

    /// Sets the quantity; blank values are treated as absent.
    pub fn with_quantity(mut self, quantity: Option<String>) -> Self {
        self.quantity = non_blank(quantity);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn quantity(&self) -> Option<&str> {
        self.quantity.as_deref()
    }

    /// One-line description shown to the user after a barcode match.
    ///
    /// `Nutella (Ferrero), quantity: 400 g` with absent parts left out.
    pub fn summary(&self) -> String {
        let mut out = self.name.clone();
        if let Some(brand) = &self.brand {
            out.push_str(&format!(" ({})", brand));
        }
        if let Some(quantity) = &self.quantity {
            out.push_str(&format!(", quantity: {}", quantity));
        }
        out
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_trims_whitespace() {
        let product = Product::named("  Yogurt ").unwrap();
        assert_eq!(product.name(), "Yogurt");
    }

    #[test]
    fn named_rejects_blank_name() {
        assert_eq!(
            Product::named("   "),
            Err(ValidationError::empty_field("name"))
        );
    }

    #[test]
    fn summary_includes_brand_and_quantity() {
        let product = Product::named("Nutella")
            .unwrap()
            .with_brand(Some("Ferrero".to_string()))
            .with_quantity(Some("400 g".to_string()));
        assert_eq!(product.summary(), "Nutella (Ferrero), quantity: 400 g");
    }

    #[test]
    fn summary_omits_missing_parts() {
        let product = Product::named("Milk")
            .unwrap()
            .with_brand(Some("  ".to_string()))
            .with_quantity(Some("1 L".to_string()));
        assert_eq!(product.brand(), None);
        assert_eq!(product.summary(), "Milk, quantity: 1 L");
    }
}
