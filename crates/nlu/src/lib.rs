//! Query understanding for the shopping assistant
//!
//! This crate turns a raw PT/ES message into structured signals:
//! - `normalize`: accent/punctuation-free canonical text and tokens
//! - `canon`: canonical dictionary and longest-phrase-first resolution
//! - `intent`: ordered regex families routing to a conversation intent
//! - `signals`: price bounds, sort preference, model and attribute hints

pub mod canon;
pub mod intent;
pub mod normalize;
pub mod signals;

pub use canon::{CanonHandle, CanonicalDictionary, Resolution};
pub use intent::{ClassifiedIntent, IntentClassifier};
pub use normalize::{normalize, singularize, tokenize};
pub use signals::{extract_model_hints, extract_price_signals, ModelHints, PriceSignals};

use thiserror::Error;

/// NLU errors
#[derive(Error, Debug)]
pub enum NluError {
    #[error("Invalid dictionary entry: {0}")]
    InvalidEntry(String),

    #[error("Dictionary validation failed: {0}")]
    Validation(String),
}
