//! Conversation intents

use serde::{Deserialize, Serialize};

/// Top-level intent of a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Greetings and pleasantries ("oi", "tudo bem?")
    SmallTalk,
    /// The user asked what the assistant can do
    Help,
    /// The user asked for the current time/date
    TimeQuery,
    /// The user asked who/what the assistant is
    WhoAmI,
    /// Product search, including price-only follow-ups
    ProductSearch,
    /// Nothing matched; handled by a generic fallback
    Unknown,
}

impl Intent {
    /// Stable name used in debug payloads and logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::SmallTalk => "small_talk",
            Self::Help => "help",
            Self::TimeQuery => "time_query",
            Self::WhoAmI => "who_am_i",
            Self::ProductSearch => "product_search",
            Self::Unknown => "unknown",
        }
    }
}
