//! Catalog access and query execution
//!
//! Providers expose a read-only snapshot of the marketplace catalog; the
//! executor filters, scores and sorts a snapshot against a structured
//! [`shop_agent_core::QuerySignal`]. Nothing here mutates catalog items.

pub mod cache;
pub mod executor;
pub mod provider;

pub use cache::CachedCatalog;
pub use executor::{execute, RESULT_CAP};
pub use provider::{JsonCatalog, StaticCatalog};

use thiserror::Error;

/// Catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}
