//! Catalog provider implementations
//!
//! The pipeline only depends on the [`CatalogProvider`] read contract;
//! these are the two built-in backends (static snapshot and JSON file).

use std::path::PathBuf;

use async_trait::async_trait;

use shop_agent_core::{CatalogItem, CatalogProvider, Error, Result};

use crate::CatalogError;

/// Fixed in-memory catalog, used by tests and single-tenant deployments
pub struct StaticCatalog {
    items: Vec<CatalogItem>,
}

impl StaticCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn load(&self) -> Result<Vec<CatalogItem>> {
        Ok(self.items.clone())
    }
}

/// JSON file catalog
///
/// The file holds a JSON array of items. Malformed entries are skipped
/// with a warning instead of failing the whole load, so one bad record
/// never takes the assistant offline.
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_items(&self) -> std::result::Result<Vec<CatalogItem>, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&raw)?;

        let mut items = Vec::with_capacity(values.len());
        let mut skipped = 0usize;
        for value in values {
            match serde_json::from_value::<CatalogItem>(value) {
                Ok(item) => items.push(item),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(error = %e, "Skipping malformed catalog entry");
                }
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, loaded = items.len(), "Catalog loaded with skips");
        }
        Ok(items)
    }
}

#[async_trait]
impl CatalogProvider for JsonCatalog {
    async fn load(&self) -> Result<Vec<CatalogItem>> {
        self.read_items()
            .await
            .map_err(|e| Error::CatalogUnavailable(format!("{}: {e}", self.path.display())))
    }
}
