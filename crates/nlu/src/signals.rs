//! Price, sort, model and attribute signal extraction
//!
//! Each signal family is an ordered list of named rules with its own
//! compiled pattern, applied in priority order. A malformed amount never
//! aborts extraction; the rule simply sets no bound.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use shop_agent_core::SortOrder;

use crate::normalize::fold;

/// Price-related signals pulled from one message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSignals {
    /// Inclusive lower bound
    pub min: Option<f64>,
    /// Inclusive upper bound
    pub max: Option<f64>,
    /// Sort preference, when the message carries one
    pub sort: Option<SortOrder>,
    /// "Nth cheapest/most expensive" offset (segundo -> 1)
    pub offset: Option<usize>,
}

impl PriceSignals {
    /// True when any price/sort component is present
    pub fn is_present(&self) -> bool {
        self.min.is_some() || self.max.is_some() || self.sort.is_some()
    }
}

/// Model and attribute hints pulled from one message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelHints {
    /// Brand-model phrase ("iphone 15 pro") or bare numeric model token
    pub model: Option<String>,
    /// Canonical attribute tokens (colors, sizes, capacities)
    pub attributes: BTreeSet<String>,
}

// Amount sub-pattern: optional currency prefix, digits with optional
// thousands dots and comma decimals.
const AMOUNT: &str = r"(?:r\$|rs\.?|\$)?\s*([0-9][0-9.,]*)";

static RE_NTH_CHEAPEST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(segundo|terceiro|quarto|quinto)\s+(?:mais|mas)\s+barato").unwrap()
});
static RE_CHEAPEST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:mais|mas)\s+barato|em\s+conta|economic[oa]").unwrap()
});
static RE_PRICIEST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:mais|mas)\s+car[oa]|premium|top\s+de\s+linha|de\s+luxo").unwrap()
});
static RE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"entre\s*{AMOUNT}\s*(?:e|y|a|ate|hasta)\s*{AMOUNT}")).unwrap()
});
static RE_MAX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?:ate|hasta|no\s+maximo|como\s+maximo|por\s+menos\s+de|menos\s+de|abaixo\s+de|maximo\s+de)\s*{AMOUNT}"
    ))
    .unwrap()
});
static RE_MIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?:a\s+partir\s+de|desde|acima\s+de|mais\s+de|minimo\s+de)\s*{AMOUNT}"
    ))
    .unwrap()
});

/// Extract price bounds, sort preference and offset from raw text
///
/// Rules are applied in priority order: Nth-cheapest phrasing, cheapest
/// superlative, priciest superlative, explicit range, upper bound, lower
/// bound. Bounds are order-normalized so `min <= max`.
pub fn extract_price_signals(text: &str) -> PriceSignals {
    let folded = fold(text);
    let mut signals = PriceSignals::default();

    if let Some(caps) = RE_NTH_CHEAPEST.captures(&folded) {
        signals.sort = Some(SortOrder::PriceAscending);
        signals.offset = match &caps[1] {
            "segundo" => Some(1),
            "terceiro" => Some(2),
            "quarto" => Some(3),
            "quinto" => Some(4),
            _ => None,
        };
    } else if RE_CHEAPEST.is_match(&folded) {
        signals.sort = Some(SortOrder::PriceAscending);
    } else if RE_PRICIEST.is_match(&folded) {
        signals.sort = Some(SortOrder::PriceDescending);
    }

    if let Some(caps) = RE_RANGE.captures(&folded) {
        let a = parse_amount(&caps[1]);
        let b = parse_amount(&caps[2]);
        if let (Some(a), Some(b)) = (a, b) {
            signals.min = Some(a.min(b));
            signals.max = Some(a.max(b));
        }
    }
    if signals.max.is_none() {
        if let Some(caps) = RE_MAX.captures(&folded) {
            signals.max = parse_amount(&caps[1]);
        }
    }
    if signals.min.is_none() {
        if let Some(caps) = RE_MIN.captures(&folded) {
            signals.min = parse_amount(&caps[1]);
        }
    }

    if let (Some(min), Some(max)) = (signals.min, signals.max) {
        if min > max {
            signals.min = Some(max);
            signals.max = Some(min);
        }
    }

    signals
}

/// Parse a monetary amount with thousands dots and comma decimals
///
/// Returns `None` for malformed input instead of erroring, so a bad
/// amount never aborts the whole extraction.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_matches(|c| c == '.' || c == ',');
    if cleaned.is_empty() {
        return None;
    }

    static RE_THOUSANDS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\d{1,3}(\.\d{3})+$").unwrap());

    let normalized = if cleaned.contains(',') {
        // 1.234,56 -> 1234.56
        cleaned.replace('.', "").replace(',', ".")
    } else if RE_THOUSANDS.is_match(cleaned) {
        // 3.000 -> 3000
        cleaned.replace('.', "")
    } else {
        cleaned.to_string()
    };

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => None,
    }
}

static RE_BRAND_MODEL: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "iphone",
            Regex::new(r"iphone\s*(\d{1,2})(?:\s*(pro\s*max|pro|plus|mini))?").unwrap(),
        ),
        ("galaxy", Regex::new(r"galaxy\s*([sma]\s*\d{1,2})").unwrap()),
        ("redmi", Regex::new(r"redmi(\s*note)?\s*(\d{1,2})").unwrap()),
        ("moto", Regex::new(r"moto\s*([geo]\s*\d{1,2})").unwrap()),
    ]
});

static RE_BARE_MODEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{2,4})\b").unwrap());

static RE_CAPACITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{2,4})\s*(gb|tb)\b").unwrap());

static RE_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:tamanho|talle|numero)\s*(pp|p|m|g|gg|\d{2})\b").unwrap());

/// Attribute color vocabulary (PT + ES surface forms -> canonical PT)
const COLORS: &[(&str, &str)] = &[
    ("preto", "preto"),
    ("preta", "preto"),
    ("negro", "preto"),
    ("branco", "branco"),
    ("branca", "branco"),
    ("blanco", "branco"),
    ("azul", "azul"),
    ("vermelho", "vermelho"),
    ("vermelha", "vermelho"),
    ("rojo", "vermelho"),
    ("rosa", "rosa"),
    ("verde", "verde"),
    ("amarelo", "amarelo"),
    ("amarillo", "amarelo"),
    ("dourado", "dourado"),
    ("dorado", "dourado"),
    ("prata", "prata"),
    ("prateado", "prata"),
    ("plateado", "prata"),
    ("cinza", "cinza"),
    ("gris", "cinza"),
];

/// Extract model tokens and free-form attributes
///
/// `price` is the already-extracted price signal for the same message;
/// bare numbers that were consumed as price bounds are not re-used as
/// model tokens ("ate 3000" is a bound, not a model).
pub fn extract_model_hints(text: &str, price: &PriceSignals) -> ModelHints {
    let folded = fold(text);
    let mut hints = ModelHints::default();

    for (_, regex) in RE_BRAND_MODEL.iter() {
        if let Some(m) = regex.find(&folded) {
            hints.model = Some(collapse_spaces(m.as_str()));
            break;
        }
    }

    // Capacity before bare models, so "128gb" is an attribute, not a model
    for caps in RE_CAPACITY.captures_iter(&folded) {
        hints.attributes.insert(format!("{}{}", &caps[1], &caps[2]));
    }

    if hints.model.is_none() {
        let consumed: Vec<f64> = price.min.iter().chain(price.max.iter()).copied().collect();
        for caps in RE_BARE_MODEL.captures_iter(&folded) {
            let token = &caps[1];
            if let Ok(value) = token.parse::<f64>() {
                if consumed.contains(&value) {
                    continue;
                }
            }
            hints.model = Some(token.to_string());
            break;
        }
    }

    for caps in RE_SIZE.captures_iter(&folded) {
        hints.attributes.insert(format!("tamanho {}", &caps[1]));
    }

    for word in folded.split(|c: char| !c.is_alphanumeric()) {
        if let Some((_, canonical)) = COLORS.iter().find(|(surface, _)| *surface == word) {
            hints.attributes.insert((*canonical).to_string());
        }
    }

    hints
}

fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
