//! Query builder
//!
//! Merges the classified intent, the extracted price/model signals and
//! the session focus into one [`QuerySignal`]. Merge order: canonical
//! resolution, then price signals, then model/attribute hints.

use shop_agent_core::QuerySignal;
use shop_agent_nlu::{extract_model_hints, extract_price_signals, ClassifiedIntent};

use crate::session::SessionState;

/// Builds one query signal per product-search turn
#[derive(Debug, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the query and update the session focus
    ///
    /// A price-only follow-up ("tem mais barato?") inherits the session's
    /// focus product/category instead of starting an unconstrained
    /// search. It must not imply in-stock filtering: that flag is only
    /// ever copied from an explicit upstream request.
    pub fn build(
        &self,
        classified: &ClassifiedIntent,
        raw_text: &str,
        session: &mut SessionState,
        in_stock_only: Option<bool>,
    ) -> QuerySignal {
        let mut query = QuerySignal::default();

        if let Some(resolution) = &classified.resolution {
            query.product = resolution.product.clone();
            query.category = resolution.category.clone();
        }

        if classified.price_only_followup {
            query.product = session.focus.clone();
            query.category = session.category.clone();
            tracing::debug!(
                focus = ?query.product,
                category = ?query.category,
                "Price-only follow-up inherits session focus"
            );
        }

        let price = extract_price_signals(raw_text);
        query.price_min = price.min;
        query.price_max = price.max;
        if let Some(sort) = price.sort {
            query.sort = sort;
        }
        query.offset = price.offset;
        query.normalize_bounds();

        let hints = extract_model_hints(raw_text, &price);
        query.model = hints.model;
        query.attributes = hints.attributes;

        query.in_stock_only = in_stock_only;

        // Focus only moves when a new product/category was detected, so
        // elliptical follow-ups keep working turn after turn.
        if let Some(resolution) = &classified.resolution {
            if resolution.product.is_some() {
                session.focus = resolution.product.clone();
                session.last_query = resolution.matched_term.clone();
            }
            if resolution.category.is_some() {
                session.category = resolution.category.clone();
            }
        }

        query
    }
}
