//! Catalog item snapshot types
//!
//! The assistant never mutates catalog items; it holds a transient read
//! snapshot per query, supplied by a [`crate::traits::CatalogProvider`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A single catalog item as seen by the query executor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    /// Stable item identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Canonical category
    pub category: String,
    /// Brand, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Price in the item currency; items without a price sort last
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// ISO currency code
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Stock availability, if the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    /// Free-form canonical attributes (color, size, capacity...)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub attributes: BTreeSet<String>,
}

fn default_currency() -> String {
    "BRL".to_string()
}

impl CatalogItem {
    /// Minimal constructor used by tests and static catalogs
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            brand: None,
            price: None,
            currency: default_currency(),
            in_stock: None,
            attributes: BTreeSet::new(),
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = Some(in_stock);
        self
    }

    pub fn with_attribute(mut self, attr: impl Into<String>) -> Self {
        self.attributes.insert(attr.into());
        self
    }
}
