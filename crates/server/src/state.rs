//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use shop_agent_agent::{
    DialoguePolicy, HttpNaturalizer, InMemorySessionStore, ResponseAssembler, ShopAgent,
    ShopAgentConfig, TemplateBank,
};
use shop_agent_catalog::{CachedCatalog, JsonCatalog, StaticCatalog};
use shop_agent_config::{CanonStore, Settings};
use shop_agent_core::{CatalogItem, CatalogProvider, Naturalizer};
use shop_agent_nlu::CanonHandle;

/// Shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub agent: Arc<ShopAgent>,
    /// Present when the dictionary is file-backed; admin updates persist
    pub canon_store: Option<Arc<CanonStore>>,
}

impl AppState {
    /// Wire the full pipeline from settings
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let ttl = Duration::from_secs(settings.catalog.ttl_seconds);
        let catalog: Arc<dyn CatalogProvider> = match &settings.catalog.path {
            Some(path) => {
                tracing::info!(path = %path, "Using JSON catalog");
                Arc::new(CachedCatalog::new(JsonCatalog::new(path), ttl))
            }
            None => {
                tracing::warn!("No catalog path configured, using built-in sample");
                Arc::new(StaticCatalog::new(sample_catalog()))
            }
        };

        let (canon, canon_store) = match &settings.canon_path {
            Some(path) => {
                let store = CanonStore::new(path);
                let dictionary = store.load()?;
                (CanonHandle::new(dictionary), Some(Arc::new(store)))
            }
            None => (CanonHandle::default(), None),
        };

        let naturalizer: Option<Arc<dyn Naturalizer>> = if settings.naturalize.enabled {
            let endpoint = settings
                .naturalize
                .endpoint
                .clone()
                .ok_or_else(|| anyhow::anyhow!("naturalize.endpoint is required"))?;
            let timeout = Duration::from_millis(settings.naturalize.timeout_ms);
            Some(Arc::new(HttpNaturalizer::new(endpoint, timeout)?))
        } else {
            None
        };

        let agent = ShopAgent::new(
            catalog,
            Arc::new(InMemorySessionStore::new()),
            canon,
            DialoguePolicy::default(),
            ResponseAssembler::new(TemplateBank::default_pt()),
            naturalizer,
            ShopAgentConfig {
                naturalize_timeout: Duration::from_millis(settings.naturalize.timeout_ms),
            },
        );

        Ok(Self {
            settings: Arc::new(settings),
            agent: Arc::new(agent),
            canon_store,
        })
    }
}

/// Demo catalog for running without a data file
fn sample_catalog() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("sku-001", "iPhone 15 128GB", "celular")
            .with_brand("Apple")
            .with_price(2800.0)
            .with_stock(true)
            .with_attribute("128gb"),
        CatalogItem::new("sku-002", "iPhone 15 Pro 256GB", "celular")
            .with_brand("Apple")
            .with_price(5200.0)
            .with_stock(true)
            .with_attribute("256gb"),
        CatalogItem::new("sku-003", "Galaxy S24 256GB", "celular")
            .with_brand("Samsung")
            .with_price(3100.0)
            .with_stock(true)
            .with_attribute("256gb"),
        CatalogItem::new("sku-004", "Redmi Note 13", "celular")
            .with_brand("Xiaomi")
            .with_price(1200.0)
            .with_stock(false),
        CatalogItem::new("sku-005", "Fone de Ouvido Bluetooth", "acessorios")
            .with_brand("JBL")
            .with_price(220.0)
            .with_stock(true),
        CatalogItem::new("sku-006", "Capinha de Silicone Transparente", "acessorios")
            .with_price(45.0)
            .with_stock(true),
        CatalogItem::new("sku-007", "Carregador Turbo USB-C 30W", "acessorios")
            .with_price(90.0)
            .with_stock(true),
        CatalogItem::new("sku-008", "Perfume Malbec Tradicional 100ml", "beleza")
            .with_brand("O Boticário")
            .with_price(190.0)
            .with_stock(true),
        CatalogItem::new("sku-009", "Perfume Egeo Dolce 90ml", "beleza")
            .with_brand("O Boticário")
            .with_price(120.0)
            .with_stock(true),
        CatalogItem::new("sku-010", "Tênis Corrida Masculino", "calcados")
            .with_brand("Olympikus")
            .with_price(250.0)
            .with_stock(true),
        CatalogItem::new("sku-011", "Tênis Casual Feminino", "calcados")
            .with_brand("Moleca")
            .with_price(160.0)
            .with_stock(true),
        CatalogItem::new("sku-012", "Notebook 15 polegadas 8GB", "eletronicos")
            .with_brand("Lenovo")
            .with_price(2400.0)
            .with_stock(true),
    ]
}
