//! Turn orchestrator
//!
//! One `handle` call per user message: check out the session, classify,
//! run the catalog query if the intent asks for one, decide the response
//! shape, assemble the draft and (best-effort) naturalize it. The turn
//! works on a clone of the session state and commits it only at the end,
//! so a cancelled request never leaves a half-updated session.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use shop_agent_catalog::execute;
use shop_agent_core::{
    CatalogItem, CatalogProvider, DialogueDecision, Intent, NaturalizeRequest, Naturalizer,
    QuerySignal, ResponseType,
};
use shop_agent_nlu::{CanonHandle, ClassifiedIntent, IntentClassifier};

use crate::assembler::{ResponseAssembler, LISTING_CAP};
use crate::policy::DialoguePolicy;
use crate::query_builder::QueryBuilder;
use crate::session::{Sentiment, SessionState, SessionStore};
use crate::AgentError;

/// Agent tuning knobs
#[derive(Debug, Clone)]
pub struct ShopAgentConfig {
    /// Hard bound on the naturalization round-trip
    pub naturalize_timeout: Duration,
}

impl Default for ShopAgentConfig {
    fn default() -> Self {
        Self {
            naturalize_timeout: Duration::from_secs(3),
        }
    }
}

/// Per-turn diagnostics, surfaced in the API debug payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnDebug {
    pub intent: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QuerySignal>,
    pub result_count: usize,
    pub tone: &'static str,
    /// Whether the external rewrite was actually used
    pub naturalized: bool,
}

/// One finished turn
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReply {
    pub text: String,
    /// Items shown to the user, capped at the listing size
    pub items: Vec<CatalogItem>,
    pub response_type: ResponseType,
    pub debug: TurnDebug,
}

/// The conversational pipeline
pub struct ShopAgent {
    catalog: Arc<dyn CatalogProvider>,
    sessions: Arc<dyn SessionStore>,
    canon: CanonHandle,
    classifier: IntentClassifier,
    query_builder: QueryBuilder,
    policy: DialoguePolicy,
    assembler: ResponseAssembler,
    naturalizer: Option<Arc<dyn Naturalizer>>,
    config: ShopAgentConfig,
}

impl ShopAgent {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        sessions: Arc<dyn SessionStore>,
        canon: CanonHandle,
        policy: DialoguePolicy,
        assembler: ResponseAssembler,
        naturalizer: Option<Arc<dyn Naturalizer>>,
        config: ShopAgentConfig,
    ) -> Self {
        Self {
            catalog,
            sessions,
            canon,
            classifier: IntentClassifier::new(),
            query_builder: QueryBuilder::new(),
            policy,
            assembler,
            naturalizer,
            config,
        }
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    pub fn canon(&self) -> &CanonHandle {
        &self.canon
    }

    /// Handle one user message
    ///
    /// `in_stock_only` is only ever set from an explicit caller request;
    /// the pipeline never infers it from the message.
    pub async fn handle(
        &self,
        session_id: &str,
        message: &str,
        in_stock_only: Option<bool>,
    ) -> Result<AgentReply, AgentError> {
        // Reject before touching the session, so junk requests leave no trace
        if message.trim().is_empty() {
            return Err(AgentError::EmptyMessage);
        }

        let entry = self.sessions.get_or_create(session_id);
        let mut committed = entry.state.lock().await;

        // Work on a clone; commit at the end of the turn
        let mut state = committed.clone();
        if state.message_count == 0 {
            state.visit_count += 1;
        }
        state.message_count += 1;
        state.sentiment = Sentiment::detect(message);

        let dictionary = self.canon.current();
        let classified = self.classifier.classify(message, &dictionary);
        tracing::info!(
            session_id = %session_id,
            intent = classified.intent.name(),
            rule = ?classified.matched_rule,
            "Turn classified"
        );

        let (draft, items, decision, query) = match classified.intent {
            Intent::ProductSearch => {
                self.search_turn(&classified, message, &mut state, in_stock_only)
                    .await
            }
            other => {
                let family = match other {
                    Intent::SmallTalk => "greeting",
                    Intent::Help => "help",
                    Intent::TimeQuery => "time_query",
                    Intent::WhoAmI => "who_am_i",
                    _ => "unknown",
                };
                let draft = self.assembler.render_simple(family, &mut state);
                (
                    draft,
                    Vec::new(),
                    DialogueDecision::new(ResponseType::Greeting),
                    None,
                )
            }
        };

        let tone = state.sentiment.tone();
        let (text, naturalized) = self
            .naturalize(&classified, &decision, &query, draft, items.len(), tone)
            .await;

        let debug = TurnDebug {
            intent: classified.intent.name(),
            matched_rule: classified.matched_rule,
            query,
            result_count: items.len(),
            tone,
            naturalized,
        };

        *committed = state;
        entry.touch();

        Ok(AgentReply {
            text,
            items: items.into_iter().take(LISTING_CAP).collect(),
            response_type: decision.response_type,
            debug,
        })
    }

    async fn search_turn(
        &self,
        classified: &ClassifiedIntent,
        message: &str,
        state: &mut SessionState,
        in_stock_only: Option<bool>,
    ) -> (String, Vec<CatalogItem>, DialogueDecision, Option<QuerySignal>) {
        let query = self
            .query_builder
            .build(classified, message, state, in_stock_only);

        // A catalog outage degrades to the not-found path instead of
        // failing the turn; the user gets a retryable answer.
        let snapshot = match self.catalog.load().await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(error = %e, "Catalog unavailable, degrading to empty results");
                Vec::new()
            }
        };

        let items = execute(&snapshot, &query);
        let decision = self.policy.decide(items.len(), &query, message);
        let draft = self.assembler.assemble(&decision, &items, &query, state);
        (draft, items, decision, Some(query))
    }

    /// Best-effort rewrite of the draft; any failure keeps the draft
    async fn naturalize(
        &self,
        classified: &ClassifiedIntent,
        decision: &DialogueDecision,
        query: &Option<QuerySignal>,
        draft: String,
        result_count: usize,
        tone: &str,
    ) -> (String, bool) {
        let Some(naturalizer) = &self.naturalizer else {
            return (draft, false);
        };

        let request = NaturalizeRequest {
            intent: classified.intent.name().to_string(),
            draft: draft.clone(),
            product: query.as_ref().and_then(|q| q.product.clone()),
            category: query.as_ref().and_then(|q| q.category.clone()),
            model: query.as_ref().and_then(|q| q.model.clone()),
            count: query.as_ref().map(|_| result_count),
            cross: decision.cross_sell.clone(),
            ask: decision.ask_clarification.clone(),
        };

        let rewrite = tokio::time::timeout(
            self.config.naturalize_timeout,
            naturalizer.naturalize(&request, tone),
        )
        .await;

        match rewrite {
            Ok(Ok(text)) => (text, true),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Naturalization failed, using draft");
                (draft, false)
            }
            Err(_) => {
                tracing::warn!("Naturalization timed out, using draft");
                (draft, false)
            }
        }
    }
}
