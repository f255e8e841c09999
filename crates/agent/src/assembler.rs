//! Response assembly
//!
//! Turns a dialogue decision plus a result set into the deterministic
//! draft reply: template selection through the session rotation,
//! placeholder substitution, and locale-formatted result listings.

use chrono::Local;

use shop_agent_core::{CatalogItem, DialogueDecision, QuerySignal, ResponseType};

use crate::session::SessionState;
use crate::templates::TemplateBank;

/// Items shown in the reply text (the API payload carries the same cap)
pub const LISTING_CAP: usize = 10;

/// Assembles the final draft reply
#[derive(Debug, Clone, Default)]
pub struct ResponseAssembler {
    templates: TemplateBank,
}

impl ResponseAssembler {
    pub fn new(templates: TemplateBank) -> Self {
        Self { templates }
    }

    /// Render a fixed-intent reply (greeting, help, time, who-am-i, unknown)
    pub fn render_simple(&self, family: &str, session: &mut SessionState) -> String {
        let template = self.pick(family, session);
        template.replace("{time}", &Local::now().format("%H:%M").to_string())
    }

    /// Render the reply for a finished catalog turn
    pub fn assemble(
        &self,
        decision: &DialogueDecision,
        items: &[CatalogItem],
        query: &QuerySignal,
        session: &mut SessionState,
    ) -> String {
        let subject = query
            .product
            .as_deref()
            .or(query.category.as_deref())
            .unwrap_or("produtos");

        let mut reply = match decision.response_type {
            ResponseType::Results => {
                let mut text = self
                    .pick("results", session)
                    .replace("{product}", subject)
                    .replace("{count}", &items.len().to_string());
                text.push('\n');
                text.push_str(&self.format_listing(items));
                text
            }
            ResponseType::NotFound | ResponseType::Clarification => self
                .pick("not_found", session)
                .replace("{product}", subject),
            ResponseType::Greeting => self.pick("greeting", session),
        };

        if let Some(ask) = &decision.ask_clarification {
            let question = self.pick("clarification", session).replace("{ask}", ask);
            reply.push_str("\n\n");
            reply.push_str(&question);
        }

        if !decision.cross_sell.is_empty() {
            let cross = self
                .pick("cross_sell", session)
                .replace("{cross}", &decision.cross_sell.join(", "));
            reply.push_str("\n\n");
            reply.push_str(&cross);
        }

        reply
    }

    /// Format up to [`LISTING_CAP`] items, one per line
    pub fn format_listing(&self, items: &[CatalogItem]) -> String {
        items
            .iter()
            .take(LISTING_CAP)
            .enumerate()
            .map(|(i, item)| {
                let mut line = format!("{}. {}", i + 1, item.title);
                if let Some(brand) = &item.brand {
                    line.push_str(&format!(" ({brand})"));
                }
                match item.price {
                    Some(price) => line.push_str(&format!(" — {}", format_brl(price))),
                    None => line.push_str(" — preço sob consulta"),
                }
                match item.in_stock {
                    Some(true) => line.push_str(" ✅"),
                    Some(false) => line.push_str(" ⛔ sem estoque"),
                    None => {}
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn pick(&self, family: &str, session: &mut SessionState) -> String {
        let variants = self.templates.variants(family);
        if variants.is_empty() {
            tracing::warn!(family, "No templates for family");
            return String::new();
        }
        let index = session.next_template_variant(family, variants.len());
        variants[index].clone()
    }
}

/// Brazilian locale price formatting: `R$ 2.800,00`
pub fn format_brl(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let whole = cents / 100;
    let frac = (cents % 100).abs();

    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if whole < 0 { "-" } else { "" };
    format!("R$ {sign}{grouped},{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(2800.0), "R$ 2.800,00");
        assert_eq!(format_brl(99.9), "R$ 99,90");
        assert_eq!(format_brl(1234567.89), "R$ 1.234.567,89");
        assert_eq!(format_brl(0.5), "R$ 0,50");
    }

    #[test]
    fn test_listing_format() {
        let assembler = ResponseAssembler::default();
        let items = vec![
            CatalogItem::new("1", "iPhone 15", "celular")
                .with_brand("Apple")
                .with_price(2800.0)
                .with_stock(true),
            CatalogItem::new("2", "Perfume Malbec", "beleza").with_stock(false),
        ];
        let listing = assembler.format_listing(&items);
        assert!(listing.contains("1. iPhone 15 (Apple) — R$ 2.800,00 ✅"));
        assert!(listing.contains("2. Perfume Malbec — preço sob consulta ⛔ sem estoque"));
    }

    #[test]
    fn test_listing_caps_at_ten() {
        let assembler = ResponseAssembler::default();
        let items: Vec<CatalogItem> = (0..15)
            .map(|i| CatalogItem::new(i.to_string(), format!("Item {i}"), "moda"))
            .collect();
        assert_eq!(assembler.format_listing(&items).lines().count(), 10);
    }

    #[test]
    fn test_rotation_avoids_repeats() {
        let assembler = ResponseAssembler::default();
        let mut session = SessionState::default();

        let a = assembler.render_simple("greeting", &mut session);
        let b = assembler.render_simple("greeting", &mut session);
        let c = assembler.render_simple("greeting", &mut session);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_assemble_results_with_cross_sell() {
        let assembler = ResponseAssembler::default();
        let mut session = SessionState::default();

        let decision = DialogueDecision {
            response_type: ResponseType::Results,
            ask_clarification: None,
            cross_sell: vec!["capinhas".into(), "carregadores".into()],
        };
        let items = vec![CatalogItem::new("1", "Galaxy S24", "celular").with_price(2500.0)];
        let query = QuerySignal {
            product: Some("celular".into()),
            ..Default::default()
        };

        let reply = assembler.assemble(&decision, &items, &query, &mut session);
        assert!(reply.contains("celular"));
        assert!(reply.contains("Galaxy S24"));
        assert!(reply.contains("capinhas"));
    }

    #[test]
    fn test_assemble_clarification() {
        let assembler = ResponseAssembler::default();
        let mut session = SessionState::default();

        let decision = DialogueDecision {
            response_type: ResponseType::Clarification,
            ask_clarification: Some("Qual produto de beleza você procura?".into()),
            cross_sell: vec![],
        };
        let query = QuerySignal {
            category: Some("beleza".into()),
            ..Default::default()
        };

        let reply = assembler.assemble(&decision, &[], &query, &mut session);
        assert!(reply.contains("beleza"));
        assert!(reply.contains("Qual produto"));
    }
}
