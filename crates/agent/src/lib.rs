//! Conversational pipeline for the shopping assistant
//!
//! Wires query understanding, catalog execution, dialogue policy and
//! response assembly around per-session state:
//!
//! raw message -> intent + signals -> query builder (session focus) ->
//! catalog executor -> dialogue policy -> response assembler -> reply

pub mod agent;
pub mod assembler;
pub mod naturalize;
pub mod policy;
pub mod query_builder;
pub mod session;
pub mod templates;

pub use agent::{AgentReply, ShopAgent, ShopAgentConfig, TurnDebug};
pub use assembler::ResponseAssembler;
pub use naturalize::HttpNaturalizer;
pub use policy::{CrossSellTable, DialoguePolicy};
pub use query_builder::QueryBuilder;
pub use session::{InMemorySessionStore, Sentiment, SessionState, SessionStore};
pub use templates::TemplateBank;

use thiserror::Error;

/// Agent errors
///
/// Catalog and naturalization failures degrade inside the turn instead
/// of surfacing here, so callers only ever see request-shape problems.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Empty message")]
    EmptyMessage,
}
