//! Collaborator traits
//!
//! The core pipeline depends on external collaborators only through these
//! seams: a read-only catalog provider and an optional naturalization
//! service that rewrites a deterministic draft in a requested tone.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::error::Result;

/// Read-only catalog snapshot provider
///
/// May be backed by a database, a static file, or a remote service. The
/// pipeline only ever reads; a caching wrapper may serve a stale snapshot
/// while refreshing.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Load the current catalog snapshot
    async fn load(&self) -> Result<Vec<CatalogItem>>;
}

/// Structured metadata handed to the naturalization collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaturalizeRequest {
    /// Detected intent name
    pub intent: String,
    /// Deterministic draft reply
    pub draft: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Result count, when a catalog query ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Cross-sell suggestions attached to the reply
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cross: Vec<String>,
    /// Pending clarification question
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask: Option<String>,
}

/// Optional tone-adaptation collaborator
///
/// Implementations must be best-effort: the caller bounds every call with
/// a timeout and falls back to the draft on any failure.
#[async_trait]
pub trait Naturalizer: Send + Sync {
    /// Rewrite the draft in the given tone ("neutro", "animado", "empatico")
    async fn naturalize(&self, request: &NaturalizeRequest, tone: &str) -> Result<String>;
}
