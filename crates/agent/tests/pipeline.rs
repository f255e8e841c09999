//! End-to-end pipeline tests over a static catalog

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use shop_agent_agent::{
    AgentError, DialoguePolicy, InMemorySessionStore, ResponseAssembler, ShopAgent,
    ShopAgentConfig, TemplateBank,
};
use shop_agent_catalog::StaticCatalog;
use shop_agent_core::{
    CatalogItem, CatalogProvider, Error, ResponseType, Result, SortOrder,
};
use shop_agent_nlu::CanonHandle;

fn sample_catalog() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("1", "iPhone 15 128GB", "celular")
            .with_brand("Apple")
            .with_price(2800.0)
            .with_stock(true),
        CatalogItem::new("2", "iPhone 15 Pro 256GB", "celular")
            .with_brand("Apple")
            .with_price(5200.0)
            .with_stock(true),
        CatalogItem::new("3", "Galaxy S24", "celular")
            .with_brand("Samsung")
            .with_price(3100.0)
            .with_stock(true),
        CatalogItem::new("4", "Perfume Malbec Tradicional", "beleza")
            .with_brand("O Boticário")
            .with_price(190.0)
            .with_stock(true),
        CatalogItem::new("5", "Perfume Egeo Dolce", "beleza")
            .with_brand("O Boticário")
            .with_price(120.0)
            .with_stock(false),
        CatalogItem::new("6", "Tênis Corrida Leve", "calcados")
            .with_brand("Olympikus")
            .with_price(250.0)
            .with_stock(true),
    ]
}

fn agent_over(provider: impl CatalogProvider + 'static) -> ShopAgent {
    ShopAgent::new(
        Arc::new(provider),
        Arc::new(InMemorySessionStore::new()),
        CanonHandle::default(),
        DialoguePolicy::default(),
        ResponseAssembler::new(TemplateBank::default_pt()),
        None,
        ShopAgentConfig::default(),
    )
}

struct CountingProvider {
    calls: Arc<AtomicUsize>,
    items: Vec<CatalogItem>,
}

#[async_trait]
impl CatalogProvider for CountingProvider {
    async fn load(&self) -> Result<Vec<CatalogItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.clone())
    }
}

struct FailingProvider;

#[async_trait]
impl CatalogProvider for FailingProvider {
    async fn load(&self) -> Result<Vec<CatalogItem>> {
        Err(Error::CatalogUnavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn search_with_price_cap_filters_results() {
    let agent = agent_over(StaticCatalog::new(sample_catalog()));

    let reply = agent.handle("s1", "iphone 15 até 3000", None).await.unwrap();

    assert_eq!(reply.response_type, ResponseType::Results);
    assert_eq!(reply.items.len(), 1);
    assert_eq!(reply.items[0].id, "1");
    assert!(reply.text.contains("iPhone 15 128GB"));

    let query = reply.debug.query.unwrap();
    assert_eq!(query.product.as_deref(), Some("iphone"));
    assert_eq!(query.price_max, Some(3000.0));
}

#[tokio::test]
async fn greeting_never_touches_the_catalog() {
    let calls = Arc::new(AtomicUsize::new(0));
    let agent = agent_over(CountingProvider {
        calls: calls.clone(),
        items: sample_catalog(),
    });

    let reply = agent.handle("s1", "oi, tudo bem?", None).await.unwrap();

    assert_eq!(reply.debug.intent, "small_talk");
    assert!(reply.items.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!reply.text.is_empty());
}

#[tokio::test]
async fn price_followup_inherits_focus() {
    let agent = agent_over(StaticCatalog::new(sample_catalog()));

    let first = agent.handle("s1", "quero um perfume", None).await.unwrap();
    assert_eq!(first.items.len(), 2);

    let second = agent.handle("s1", "tem mais barato?", None).await.unwrap();
    let query = second.debug.query.unwrap();
    assert_eq!(query.product.as_deref(), Some("perfume"));
    assert_eq!(query.sort, SortOrder::PriceAscending);
    assert_eq!(query.in_stock_only, None);
    // Cheapest perfume first
    assert_eq!(second.items[0].id, "5");
}

#[tokio::test]
async fn focus_does_not_leak_across_sessions() {
    let agent = agent_over(StaticCatalog::new(sample_catalog()));

    agent.handle("s1", "quero um perfume", None).await.unwrap();
    let other = agent.handle("s2", "mais barato", None).await.unwrap();

    let query = other.debug.query.unwrap();
    assert_eq!(query.product, None);
}

#[tokio::test]
async fn empty_message_is_rejected_without_creating_a_session() {
    let agent = agent_over(StaticCatalog::new(sample_catalog()));

    let err = agent.handle("s1", "   ", None).await.unwrap_err();
    assert!(matches!(err, AgentError::EmptyMessage));
    assert_eq!(agent.sessions().count(), 0);
}

#[tokio::test]
async fn catalog_outage_degrades_to_not_found() {
    let agent = agent_over(FailingProvider);

    let reply = agent.handle("s1", "quero um celular", None).await.unwrap();
    assert!(reply.items.is_empty());
    assert_eq!(reply.response_type, ResponseType::NotFound);
    assert!(!reply.text.is_empty());
}

#[tokio::test]
async fn explicit_in_stock_filter_applies() {
    let agent = agent_over(StaticCatalog::new(sample_catalog()));

    let reply = agent.handle("s1", "perfume", Some(true)).await.unwrap();
    assert_eq!(reply.items.len(), 1);
    assert_eq!(reply.items[0].id, "4");
}

#[tokio::test]
async fn unknown_message_gets_fallback_reply() {
    let agent = agent_over(StaticCatalog::new(sample_catalog()));

    let reply = agent.handle("s1", "qwerty asdf", None).await.unwrap();
    assert_eq!(reply.debug.intent, "unknown");
    assert!(reply.items.is_empty());
    assert!(!reply.text.is_empty());
}

#[tokio::test]
async fn results_reply_carries_cross_sell() {
    let agent = agent_over(StaticCatalog::new(sample_catalog()));

    let reply = agent.handle("s1", "tenis de corrida", None).await.unwrap();
    assert_eq!(reply.response_type, ResponseType::Results);
    // calcados cross-sell table includes meias
    assert!(reply.text.contains("meias"));
}

#[tokio::test]
async fn consecutive_replies_rotate_phrasing() {
    let agent = agent_over(StaticCatalog::new(sample_catalog()));

    let a = agent.handle("s1", "oi", None).await.unwrap().text;
    let b = agent.handle("s1", "olá", None).await.unwrap().text;
    assert_ne!(a, b);
}

#[tokio::test]
async fn without_naturalizer_the_draft_is_served() {
    let agent = agent_over(StaticCatalog::new(sample_catalog()));

    let reply = agent.handle("s1", "quero um celular", None).await.unwrap();
    assert!(!reply.debug.naturalized);
}
