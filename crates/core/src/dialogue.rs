//! Dialogue policy output

use serde::{Deserialize, Serialize};

/// High-level response family, used for template selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Results,
    NotFound,
    Clarification,
    Greeting,
}

impl ResponseType {
    /// Template family name for rotation bookkeeping
    pub fn family(&self) -> &'static str {
        match self {
            Self::Results => "results",
            Self::NotFound => "not_found",
            Self::Clarification => "clarification",
            Self::Greeting => "greeting",
        }
    }
}

/// What the assistant decided to do with a result set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueDecision {
    /// Response family
    pub response_type: ResponseType,
    /// Clarifying question to append, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask_clarification: Option<String>,
    /// Cross-sell suggestions, deduplicated, capped at 3
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cross_sell: Vec<String>,
}

impl DialogueDecision {
    pub fn new(response_type: ResponseType) -> Self {
        Self {
            response_type,
            ask_clarification: None,
            cross_sell: Vec::new(),
        }
    }
}
