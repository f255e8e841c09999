//! Intent classification
//!
//! Stateless, single pass per message: fixed regex families first
//! (small talk, help, time, who-am-i), then canonical product/category
//! resolution, then the price-intent detector. A price signal without a
//! resolved product is flagged as a price-only follow-up so the query
//! builder can inherit the session focus.

use once_cell::sync::Lazy;
use regex::Regex;

use shop_agent_core::Intent;

use crate::canon::{CanonicalDictionary, Resolution};
use crate::normalize::fold;
use crate::signals::extract_price_signals;

/// Classification result for one message
#[derive(Debug, Clone)]
pub struct ClassifiedIntent {
    /// Routed intent
    pub intent: Intent,
    /// Canonical resolution, present for product searches
    pub resolution: Option<Resolution>,
    /// True when the message carries price/sort talk but no new
    /// product/category; the query builder seeds from session focus
    pub price_only_followup: bool,
    /// The rule family that fired, for debug payloads
    pub matched_rule: Option<&'static str>,
}

impl ClassifiedIntent {
    fn fixed(intent: Intent, rule: &'static str) -> Self {
        Self {
            intent,
            resolution: None,
            price_only_followup: false,
            matched_rule: Some(rule),
        }
    }
}

/// One named regex family routing to a fixed intent
struct IntentRule {
    name: &'static str,
    intent: Intent,
    pattern: &'static Lazy<Regex>,
}

static RE_SMALL_TALK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(oi+|ola+|eai|e ai|opa|hey|hola+|buenas)\b|\b(bom dia|boa tarde|boa noite|buenos dias|buenas tardes|buenas noches|tudo bem|como vai|como estas|que tal)\b",
    )
    .unwrap()
});

static RE_HELP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(ajuda|me ajuda|socorro|help|ayuda|ayudame)\b|\b(o que (voce|vc) (faz|sabe fazer)|como (voce |vc )?funciona|que puedes hacer|como funciona)\b",
    )
    .unwrap()
});

static RE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(que horas sao|qu?e hora es|que dia e hoje|que fecha es|horas? agora)\b",
    )
    .unwrap()
});

static RE_WHO_AM_I: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(quem (e|es) (voce|vc)|quien eres|o que (e|es) (voce|vc)|(voce|vc) e um rob[oa]|eres un robot|eres humano)\b",
    )
    .unwrap()
});

/// Ordered fixed-intent rule table; first match wins
static RULES: &[IntentRule] = &[
    IntentRule {
        name: "help",
        intent: Intent::Help,
        pattern: &RE_HELP,
    },
    IntentRule {
        name: "time_query",
        intent: Intent::TimeQuery,
        pattern: &RE_TIME,
    },
    IntentRule {
        name: "who_am_i",
        intent: Intent::WhoAmI,
        pattern: &RE_WHO_AM_I,
    },
    IntentRule {
        name: "small_talk",
        intent: Intent::SmallTalk,
        pattern: &RE_SMALL_TALK,
    },
];

/// Intent classifier
///
/// Holds no state of its own; the dictionary snapshot is passed per call
/// so an admin reload takes effect on the next message.
#[derive(Debug, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify one raw message
    pub fn classify(&self, text: &str, dictionary: &CanonicalDictionary) -> ClassifiedIntent {
        let folded = fold(text);
        if folded.trim().is_empty() {
            return ClassifiedIntent::fixed(Intent::Unknown, "empty");
        }

        for rule in RULES {
            if rule.pattern.is_match(&folded) {
                tracing::debug!(rule = rule.name, "Fixed intent rule matched");
                return ClassifiedIntent::fixed(rule.intent, rule.name);
            }
        }

        let resolution = dictionary.resolve(text);
        if !resolution.is_empty() {
            return ClassifiedIntent {
                intent: Intent::ProductSearch,
                resolution: Some(resolution),
                price_only_followup: false,
                matched_rule: Some("canon"),
            };
        }

        // No product resolved: price talk alone still routes to search,
        // interpreted against the session focus.
        if extract_price_signals(text).is_present() {
            return ClassifiedIntent {
                intent: Intent::ProductSearch,
                resolution: None,
                price_only_followup: true,
                matched_rule: Some("price_followup"),
            };
        }

        ClassifiedIntent::fixed(Intent::Unknown, "fallback")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::default_dictionary;

    fn classify(text: &str) -> ClassifiedIntent {
        IntentClassifier::new().classify(text, &default_dictionary())
    }

    #[test]
    fn test_small_talk() {
        for msg in ["oi", "Olá!", "bom dia", "hola", "tudo bem?"] {
            let c = classify(msg);
            assert_eq!(c.intent, Intent::SmallTalk, "message: {msg}");
        }
    }

    #[test]
    fn test_help() {
        assert_eq!(classify("me ajuda por favor").intent, Intent::Help);
        assert_eq!(classify("o que voce faz?").intent, Intent::Help);
        assert_eq!(classify("que puedes hacer").intent, Intent::Help);
    }

    #[test]
    fn test_time_query() {
        assert_eq!(classify("que horas são?").intent, Intent::TimeQuery);
        assert_eq!(classify("que hora es").intent, Intent::TimeQuery);
    }

    #[test]
    fn test_who_am_i() {
        assert_eq!(classify("quem é você?").intent, Intent::WhoAmI);
        assert_eq!(classify("quien eres").intent, Intent::WhoAmI);
    }

    #[test]
    fn test_product_search() {
        let c = classify("quero um celular barato");
        assert_eq!(c.intent, Intent::ProductSearch);
        assert!(!c.price_only_followup);
        assert_eq!(
            c.resolution.unwrap().product.as_deref(),
            Some("celular")
        );
    }

    #[test]
    fn test_price_only_followup() {
        let c = classify("tem mais barato?");
        assert_eq!(c.intent, Intent::ProductSearch);
        assert!(c.price_only_followup);
        assert!(c.resolution.is_none());

        let c = classify("até 500 reais");
        assert_eq!(c.intent, Intent::ProductSearch);
        assert!(c.price_only_followup);
    }

    #[test]
    fn test_unknown() {
        let c = classify("xyzzy plugh");
        assert_eq!(c.intent, Intent::Unknown);
        assert_eq!(classify("").intent, Intent::Unknown);
    }
}
