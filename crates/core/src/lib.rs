//! Core types for the conversational shopping assistant
//!
//! This crate provides the foundational types used across all other crates:
//! - Catalog item snapshot types
//! - Structured query signals produced per turn
//! - Intent and dialogue decision types
//! - Collaborator traits (catalog provider, naturalization)
//! - Error types

pub mod catalog;
pub mod dialogue;
pub mod error;
pub mod intent;
pub mod query;
pub mod traits;

pub use catalog::CatalogItem;
pub use dialogue::{DialogueDecision, ResponseType};
pub use error::{Error, Result};
pub use intent::Intent;
pub use query::{QuerySignal, SortOrder};
pub use traits::{CatalogProvider, NaturalizeRequest, Naturalizer};
