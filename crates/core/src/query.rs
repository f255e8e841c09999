//! Structured query signal
//!
//! One [`QuerySignal`] is built fresh per turn by the query builder and
//! consumed immediately by the catalog executor. It is never persisted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Result ordering preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// In-stock items first, then ascending price (missing price last)
    #[default]
    Relevance,
    PriceAscending,
    PriceDescending,
}

/// Structured search signal extracted from one message (plus session focus)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuerySignal {
    /// Canonical product term
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    /// Canonical category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Brand filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Model hint ("iphone 15", "s24", "205")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Inclusive lower price bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,
    /// Inclusive upper price bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    /// Sort preference
    #[serde(default)]
    pub sort: SortOrder,
    /// Free-form canonical attribute filters, deduplicated
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub attributes: BTreeSet<String>,
    /// Only set when explicitly requested upstream; never inferred from
    /// price talk alone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock_only: Option<bool>,
    /// Offset for "Nth cheapest" style queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl QuerySignal {
    /// True when the signal carries no filter at all
    pub fn is_empty(&self) -> bool {
        self.product.is_none()
            && self.category.is_none()
            && self.brand.is_none()
            && self.model.is_none()
            && self.price_min.is_none()
            && self.price_max.is_none()
            && self.attributes.is_empty()
            && self.in_stock_only.is_none()
    }

    /// True when the signal has a price/sort component
    pub fn has_price_signal(&self) -> bool {
        self.price_min.is_some() || self.price_max.is_some() || self.sort != SortOrder::Relevance
    }

    /// Normalize bounds so `price_min <= price_max` when both are present
    pub fn normalize_bounds(&mut self) {
        if let (Some(min), Some(max)) = (self.price_min, self.price_max) {
            if min > max {
                self.price_min = Some(max);
                self.price_max = Some(min);
            }
        }
    }
}
