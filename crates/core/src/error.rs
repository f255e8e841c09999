//! Shared error types

use thiserror::Error;

/// Core errors
#[derive(Error, Debug)]
pub enum Error {
    /// The catalog provider failed or timed out
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Naturalization collaborator failure (best-effort, usually swallowed)
    #[error("Naturalization failed: {0}")]
    Naturalization(String),
}

pub type Result<T> = std::result::Result<T, Error>;
