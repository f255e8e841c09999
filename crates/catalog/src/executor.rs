//! Catalog query executor
//!
//! Filters a snapshot conjunctively against a [`QuerySignal`], applies a
//! stable sort, then the optional offset and the result cap. Matching is
//! case- and accent-insensitive via the NLU normalizer.

use std::cmp::Ordering;

use shop_agent_core::{CatalogItem, QuerySignal, SortOrder};
use shop_agent_nlu::normalize;

/// Hard cap on returned items
pub const RESULT_CAP: usize = 20;

/// Run a structured query against a catalog snapshot
///
/// Items are never mutated; ties keep catalog input order.
pub fn execute(catalog: &[CatalogItem], query: &QuerySignal) -> Vec<CatalogItem> {
    let mut results: Vec<&CatalogItem> = catalog.iter().filter(|item| matches(item, query)).collect();

    match query.sort {
        SortOrder::Relevance => {
            // In-stock first, then ascending price, missing price last
            results.sort_by(|a, b| {
                let stock_a = a.in_stock.unwrap_or(false);
                let stock_b = b.in_stock.unwrap_or(false);
                stock_b
                    .cmp(&stock_a)
                    .then_with(|| cmp_price(a.price, b.price, f64::INFINITY))
            });
        }
        SortOrder::PriceAscending => {
            results.sort_by(|a, b| cmp_price(a.price, b.price, f64::INFINITY));
        }
        SortOrder::PriceDescending => {
            results.sort_by(|a, b| cmp_price(b.price, a.price, 0.0));
        }
    }

    let offset = query.offset.unwrap_or(0);
    results
        .into_iter()
        .skip(offset)
        .take(RESULT_CAP)
        .cloned()
        .collect()
}

fn cmp_price(a: Option<f64>, b: Option<f64>, missing: f64) -> Ordering {
    let a = a.unwrap_or(missing);
    let b = b.unwrap_or(missing);
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn matches(item: &CatalogItem, query: &QuerySignal) -> bool {
    let haystack = item_haystack(item);

    if let Some(product) = &query.product {
        if !haystack.contains(&normalize(product)) {
            return false;
        }
    } else if let Some(category) = &query.category {
        // Category applies only without a product filter; both together
        // over-constrain searches where the product's listed category
        // differs from the resolved one.
        if !normalize(&item.category).contains(&normalize(category)) {
            return false;
        }
    }

    if let Some(brand) = &query.brand {
        match &item.brand {
            Some(b) if normalize(b).contains(&normalize(brand)) => {}
            _ => return false,
        }
    }

    if let Some(model) = &query.model {
        let model = normalize(model);
        let in_title = normalize(&item.title).contains(&model);
        let in_attrs = item.attributes.iter().any(|a| normalize(a).contains(&model));
        if !in_title && !in_attrs {
            return false;
        }
    }

    if !query.attributes.is_empty() {
        let hit = query.attributes.iter().any(|wanted| {
            let wanted = normalize(wanted);
            item.attributes.iter().any(|a| normalize(a).contains(&wanted))
                || normalize(&item.title).contains(&wanted)
        });
        if !hit {
            return false;
        }
    }

    if let Some(min) = query.price_min {
        match item.price {
            Some(p) if p >= min => {}
            _ => return false,
        }
    }
    if let Some(max) = query.price_max {
        match item.price {
            Some(p) if p <= max => {}
            _ => return false,
        }
    }

    if query.in_stock_only == Some(true) && item.in_stock != Some(true) {
        return false;
    }

    true
}

/// Normalized searchable text for product matching: title, category,
/// brand and attributes
fn item_haystack(item: &CatalogItem) -> String {
    let mut parts = vec![item.title.clone(), item.category.clone()];
    if let Some(brand) = &item.brand {
        parts.push(brand.clone());
    }
    parts.extend(item.attributes.iter().cloned());
    normalize(&parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn sample_catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("1", "iPhone 15 128GB", "celular")
                .with_brand("Apple")
                .with_price(2800.0)
                .with_stock(true)
                .with_attribute("128gb"),
            CatalogItem::new("2", "iPhone 15 256GB", "celular")
                .with_brand("Apple")
                .with_price(3500.0)
                .with_stock(true),
            CatalogItem::new("3", "Galaxy S24", "celular")
                .with_brand("Samsung")
                .with_price(2500.0)
                .with_stock(false),
            CatalogItem::new("4", "Capinha iPhone", "acessorios")
                .with_price(50.0)
                .with_stock(true),
            CatalogItem::new("5", "Perfume 212 VIP", "beleza")
                .with_brand("Carolina Herrera")
                .with_price(450.0)
                .with_stock(true),
            CatalogItem::new("6", "Perfume Malbec", "beleza")
                .with_brand("O Boticário")
                .with_stock(true),
        ]
    }

    fn query(product: &str) -> QuerySignal {
        QuerySignal {
            product: Some(product.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_product_filter_accent_insensitive() {
        let results = execute(&sample_catalog(), &query("capinha"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "4");

        // Brand matching goes through the same normalization
        let q = QuerySignal {
            product: Some("perfume".into()),
            brand: Some("o boticario".into()),
            ..Default::default()
        };
        assert_eq!(execute(&sample_catalog(), &q).len(), 1);
    }

    #[test]
    fn test_price_bounds_inclusive() {
        let q = QuerySignal {
            product: Some("iphone".into()),
            model: Some("iphone 15".into()),
            price_max: Some(2800.0),
            ..Default::default()
        };
        let results = execute(&sample_catalog(), &q);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "1");
        for item in &results {
            assert!(item.price.unwrap() <= 2800.0);
        }
    }

    #[test]
    fn test_missing_price_fails_bounds() {
        let q = QuerySignal {
            product: Some("perfume".into()),
            price_max: Some(1000.0),
            ..Default::default()
        };
        // Malbec has no price and must not pass a bounded query
        let results = execute(&sample_catalog(), &q);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "5");
    }

    #[test]
    fn test_category_only_when_no_product() {
        let q = QuerySignal {
            category: Some("beleza".into()),
            ..Default::default()
        };
        assert_eq!(execute(&sample_catalog(), &q).len(), 2);

        // With a product present the category is ignored
        let q = QuerySignal {
            product: Some("capinha".into()),
            category: Some("beleza".into()),
            ..Default::default()
        };
        assert_eq!(execute(&sample_catalog(), &q).len(), 1);
    }

    #[test]
    fn test_relevance_stock_first() {
        let q = QuerySignal {
            category: Some("celular".into()),
            ..Default::default()
        };
        let results = execute(&sample_catalog(), &q);
        let first_out_of_stock = results
            .iter()
            .position(|i| i.in_stock != Some(true))
            .unwrap_or(results.len());
        for item in &results[..first_out_of_stock] {
            assert_eq!(item.in_stock, Some(true));
        }
        for item in &results[first_out_of_stock..] {
            assert_ne!(item.in_stock, Some(true));
        }
    }

    #[test]
    fn test_price_sorts() {
        let q = QuerySignal {
            category: Some("celular".into()),
            sort: SortOrder::PriceAscending,
            ..Default::default()
        };
        let results = execute(&sample_catalog(), &q);
        let prices: Vec<f64> = results.iter().filter_map(|i| i.price).collect();
        let mut sorted = prices.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(prices, sorted);

        let q = QuerySignal {
            category: Some("celular".into()),
            sort: SortOrder::PriceDescending,
            ..Default::default()
        };
        let results = execute(&sample_catalog(), &q);
        assert_eq!(results[0].id, "2");
    }

    #[test]
    fn test_offset() {
        let q = QuerySignal {
            category: Some("celular".into()),
            sort: SortOrder::PriceAscending,
            offset: Some(1),
            ..Default::default()
        };
        let results = execute(&sample_catalog(), &q);
        // Second cheapest phone first
        assert_eq!(results[0].id, "1");
    }

    #[test]
    fn test_result_cap() {
        let catalog: Vec<CatalogItem> = (0..50)
            .map(|i| {
                CatalogItem::new(i.to_string(), format!("Camiseta {i}"), "moda")
                    .with_price(20.0 + i as f64)
            })
            .collect();
        let q = QuerySignal {
            product: Some("camiseta".into()),
            ..Default::default()
        };
        assert_eq!(execute(&catalog, &q).len(), RESULT_CAP);
    }

    #[test]
    fn test_attribute_filter() {
        let q = QuerySignal {
            product: Some("iphone".into()),
            attributes: BTreeSet::from(["128gb".to_string()]),
            ..Default::default()
        };
        let results = execute(&sample_catalog(), &q);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "1");
    }

    #[test]
    fn test_in_stock_only() {
        let q = QuerySignal {
            category: Some("celular".into()),
            in_stock_only: Some(true),
            ..Default::default()
        };
        let results = execute(&sample_catalog(), &q);
        assert!(results.iter().all(|i| i.in_stock == Some(true)));
    }

    #[test]
    fn test_model_filter() {
        let q = QuerySignal {
            product: Some("celular".into()),
            model: Some("s24".into()),
            ..Default::default()
        };
        let results = execute(&sample_catalog(), &q);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "3");
    }
}
