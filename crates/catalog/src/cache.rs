//! TTL snapshot cache
//!
//! Wraps any provider with a time-to-live cache. While a refresh is in
//! flight, concurrent readers keep getting the stale snapshot; a failed
//! refresh keeps the last good snapshot instead of propagating the error.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Mutex;

use shop_agent_core::{CatalogItem, CatalogProvider, Result};

struct Snapshot {
    items: Arc<Vec<CatalogItem>>,
    loaded_at: Instant,
}

/// Caching wrapper around a [`CatalogProvider`]
pub struct CachedCatalog<P> {
    inner: P,
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot>>,
    /// Held across the reload await, so only one caller pays for it
    refresh: Mutex<()>,
}

impl<P: CatalogProvider> CachedCatalog<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            snapshot: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    fn fresh(&self) -> Option<Arc<Vec<CatalogItem>>> {
        self.snapshot
            .read()
            .as_ref()
            .filter(|s| s.loaded_at.elapsed() < self.ttl)
            .map(|s| s.items.clone())
    }

    fn any(&self) -> Option<Arc<Vec<CatalogItem>>> {
        self.snapshot.read().as_ref().map(|s| s.items.clone())
    }

    async fn refresh(&self) -> Result<Arc<Vec<CatalogItem>>> {
        let _guard = self.refresh.lock().await;

        // Another caller may have refreshed while we waited for the guard
        if let Some(items) = self.fresh() {
            return Ok(items);
        }

        match self.inner.load().await {
            Ok(items) => {
                let items = Arc::new(items);
                *self.snapshot.write() = Some(Snapshot {
                    items: items.clone(),
                    loaded_at: Instant::now(),
                });
                tracing::debug!(count = items.len(), "Catalog snapshot refreshed");
                Ok(items)
            }
            Err(e) => {
                // Serve the stale snapshot if we have one
                if let Some(stale) = self.any() {
                    tracing::warn!(error = %e, "Catalog refresh failed, serving stale snapshot");
                    Ok(stale)
                } else {
                    Err(e)
                }
            }
        }
    }
}

#[async_trait]
impl<P: CatalogProvider> CatalogProvider for CachedCatalog<P> {
    async fn load(&self) -> Result<Vec<CatalogItem>> {
        if let Some(items) = self.fresh() {
            return Ok(items.as_ref().clone());
        }
        Ok(self.refresh().await?.as_ref().clone())
    }
}
