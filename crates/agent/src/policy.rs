//! Dialogue policy
//!
//! Given the result count and the query shape, decides between showing
//! results, reporting not-found (optionally with a clarifying question),
//! and which cross-sell suggestions to attach.

use std::collections::HashMap;

use shop_agent_core::{DialogueDecision, QuerySignal, ResponseType};

/// Maximum cross-sell suggestions per reply
const CROSS_SELL_CAP: usize = 3;

/// Messages this short with nothing resolved are treated as too generic
/// to search, and earn a clarifying question instead
const SHORT_MESSAGE_TOKENS: usize = 2;

/// category -> related suggestion strings
#[derive(Debug, Clone)]
pub struct CrossSellTable {
    related: HashMap<String, Vec<String>>,
    fallback: Vec<String>,
}

impl CrossSellTable {
    pub fn new(related: HashMap<String, Vec<String>>, fallback: Vec<String>) -> Self {
        Self { related, fallback }
    }

    /// Built-in marketplace table
    pub fn default_table() -> Self {
        let mut related = HashMap::new();
        related.insert(
            "eletronicos".to_string(),
            vec![
                "capinhas".to_string(),
                "carregadores".to_string(),
                "fones de ouvido".to_string(),
                "películas".to_string(),
            ],
        );
        related.insert(
            "acessorios".to_string(),
            vec![
                "capinhas".to_string(),
                "suportes veiculares".to_string(),
                "cabos".to_string(),
            ],
        );
        related.insert(
            "beleza".to_string(),
            vec![
                "kits de presente".to_string(),
                "hidratantes".to_string(),
                "maquiagem".to_string(),
            ],
        );
        related.insert(
            "calcados".to_string(),
            vec![
                "meias".to_string(),
                "palmilhas".to_string(),
                "roupas esportivas".to_string(),
            ],
        );
        related.insert(
            "moda".to_string(),
            vec![
                "cintos".to_string(),
                "bonés".to_string(),
                "óculos de sol".to_string(),
            ],
        );
        related.insert(
            "eletrodomesticos".to_string(),
            vec![
                "filtros de água".to_string(),
                "utensílios de cozinha".to_string(),
            ],
        );

        Self::new(
            related,
            vec!["acessórios".to_string(), "produtos relacionados".to_string()],
        )
    }

    /// Suggestions for a category, deduplicated and capped
    pub fn suggestions(&self, category: Option<&str>) -> Vec<String> {
        let pool = category
            .and_then(|c| self.related.get(c))
            .unwrap_or(&self.fallback);

        let mut out: Vec<String> = Vec::with_capacity(CROSS_SELL_CAP);
        for suggestion in pool {
            if !out.contains(suggestion) {
                out.push(suggestion.clone());
            }
            if out.len() == CROSS_SELL_CAP {
                break;
            }
        }
        out
    }
}

impl Default for CrossSellTable {
    fn default() -> Self {
        Self::default_table()
    }
}

/// Dialogue policy
#[derive(Debug, Clone, Default)]
pub struct DialoguePolicy {
    cross_sell: CrossSellTable,
}

impl DialoguePolicy {
    pub fn new(cross_sell: CrossSellTable) -> Self {
        Self { cross_sell }
    }

    /// Decide the response shape for a finished catalog query
    pub fn decide(&self, result_count: usize, query: &QuerySignal, raw_text: &str) -> DialogueDecision {
        if result_count == 0 {
            // Zero results is always not-found; a clarifying question is
            // attached on top, never a different response type.
            let mut decision = DialogueDecision::new(ResponseType::NotFound);
            decision.ask_clarification = self.clarification_for(query, raw_text);
            return decision;
        }

        let mut decision = DialogueDecision::new(ResponseType::Results);
        decision.cross_sell = self.cross_sell.suggestions(query.category.as_deref());
        decision
    }

    /// A clarifying question for ambiguous empty-result queries:
    /// category-only searches and messages too short to resolve anything
    fn clarification_for(&self, query: &QuerySignal, raw_text: &str) -> Option<String> {
        if query.product.is_none() {
            if let Some(category) = &query.category {
                return Some(format!(
                    "Qual produto de {category} você procura? Posso filtrar por preço também."
                ));
            }
            let token_count = raw_text.split_whitespace().count();
            if token_count <= SHORT_MESSAGE_TOKENS {
                return Some(
                    "Pode me dizer o nome do produto? Ex.: celular, perfume, tênis...".to_string(),
                );
            }
        }
        None
    }
}
