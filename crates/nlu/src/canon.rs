//! Canonical dictionary and resolution
//!
//! Maps surface terms (plurals, synonyms, accents) to canonical product
//! and category terms. Resolution scans the normalized message for the
//! longest matching dictionary phrase first, so "fone de ouvido" wins
//! over "fone", then falls back to per-token lookup.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::normalize::{normalize, singularize};
use crate::NluError;

/// Canonical dictionary
///
/// Keys are stored normalized. `product_to_category` values are validated
/// against the set of canonical categories at construction; dangling
/// entries are dropped with a warning.
#[derive(Debug, Clone, Default)]
pub struct CanonicalDictionary {
    /// surface term -> canonical product
    product_canon: HashMap<String, String>,
    /// surface term -> canonical category
    category_canon: HashMap<String, String>,
    /// canonical product -> default canonical category
    product_to_category: HashMap<String, String>,
    /// Product phrases sorted by descending length, for longest-first scan
    product_phrases: Vec<String>,
    /// Category phrases sorted by descending length
    category_phrases: Vec<String>,
}

/// Outcome of resolving one message against the dictionary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Canonical product, if any surface term matched
    pub product: Option<String>,
    /// Canonical category (explicit phrase or the product's default)
    pub category: Option<String>,
    /// True when the category came from an explicit phrase in the message,
    /// not from the product's default mapping
    pub category_explicit: bool,
    /// The surface term that matched, for debugging
    pub matched_term: Option<String>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.product.is_none() && self.category.is_none()
    }
}

impl CanonicalDictionary {
    /// Build from raw mappings, normalizing keys and validating categories
    ///
    /// Entries with empty normalized keys or values are rejected. Product
    /// to-category entries pointing at an unknown canonical category are
    /// dropped (spec: no dangling categories).
    pub fn from_parts(
        products: HashMap<String, String>,
        categories: HashMap<String, String>,
        product_categories: HashMap<String, String>,
    ) -> Result<Self, NluError> {
        let mut dict = Self::default();

        for (surface, canonical) in categories {
            let key = normalize(&surface);
            let value = normalize(&canonical);
            if key.is_empty() || value.is_empty() {
                tracing::warn!(surface = %surface, "Skipping empty category entry");
                continue;
            }
            dict.category_canon.insert(key, value);
        }

        for (surface, canonical) in products {
            let key = normalize(&surface);
            let value = normalize(&canonical);
            if key.is_empty() || value.is_empty() {
                tracing::warn!(surface = %surface, "Skipping empty product entry");
                continue;
            }
            dict.product_canon.insert(key, value);
        }

        let known: std::collections::HashSet<&String> = dict.category_canon.values().collect();
        for (product, category) in product_categories {
            let product = normalize(&product);
            let category = normalize(&category);
            if !known.contains(&category) {
                tracing::warn!(
                    product = %product,
                    category = %category,
                    "Dropping product->category entry with unknown category"
                );
                continue;
            }
            dict.product_to_category.insert(product, category);
        }

        if dict.product_canon.is_empty() && dict.category_canon.is_empty() {
            return Err(NluError::Validation("dictionary has no entries".into()));
        }

        dict.rebuild_phrase_index();
        Ok(dict)
    }

    /// Derive the product->category mapping from a corpus of observed
    /// (product, category) pairs by majority vote
    pub fn vote_product_categories(pairs: &[(String, String)]) -> HashMap<String, String> {
        let mut votes: HashMap<String, HashMap<String, usize>> = HashMap::new();
        for (product, category) in pairs {
            *votes
                .entry(normalize(product))
                .or_default()
                .entry(normalize(category))
                .or_default() += 1;
        }

        votes
            .into_iter()
            .filter_map(|(product, counts)| {
                counts
                    .into_iter()
                    .max_by_key(|(_, n)| *n)
                    .map(|(category, _)| (product, category))
            })
            .collect()
    }

    fn rebuild_phrase_index(&mut self) {
        let by_len_desc = |a: &String, b: &String| b.len().cmp(&a.len()).then_with(|| a.cmp(b));

        self.product_phrases = self.product_canon.keys().cloned().collect();
        self.product_phrases.sort_by(by_len_desc);

        self.category_phrases = self.category_canon.keys().cloned().collect();
        self.category_phrases.sort_by(by_len_desc);
    }

    /// Number of (product, category) surface entries
    pub fn len(&self) -> (usize, usize) {
        (self.product_canon.len(), self.category_canon.len())
    }

    pub fn is_empty(&self) -> bool {
        self.product_canon.is_empty() && self.category_canon.is_empty()
    }

    /// Default category for a canonical product
    pub fn default_category(&self, product: &str) -> Option<&str> {
        self.product_to_category.get(product).map(String::as_str)
    }

    /// Raw views, used by the canon admin save path
    pub fn parts(
        &self,
    ) -> (
        &HashMap<String, String>,
        &HashMap<String, String>,
        &HashMap<String, String>,
    ) {
        (
            &self.product_canon,
            &self.category_canon,
            &self.product_to_category,
        )
    }

    /// Resolve a raw message to canonical product/category terms
    pub fn resolve(&self, text: &str) -> Resolution {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return Resolution::default();
        }
        // Pad with spaces so phrase containment respects word boundaries
        let padded = format!(" {} ", normalized);

        let product_hit = self.scan_phrases(&padded, &self.product_phrases);
        let category_hit = self.scan_phrases(&padded, &self.category_phrases);

        let mut resolution = Resolution::default();

        if let Some(surface) = product_hit {
            let product = self.product_canon[&surface].clone();
            let default = self.default_category(&product).map(str::to_string);

            // An explicit, different category phrase wins over the default
            // mapping; the same category phrase just confirms it.
            match category_hit {
                Some(cat_surface) => {
                    let explicit = self.category_canon[&cat_surface].clone();
                    resolution.category_explicit =
                        default.as_deref() != Some(explicit.as_str());
                    resolution.category = Some(explicit);
                }
                None => {
                    resolution.category = default;
                }
            }
            resolution.matched_term = Some(surface);
            resolution.product = Some(product);
            return resolution;
        }

        if let Some(surface) = category_hit {
            resolution.category = Some(self.category_canon[&surface].clone());
            resolution.category_explicit = true;
            resolution.matched_term = Some(surface);
            return resolution;
        }

        // Phrase scan missed: per-token fallback, exact then singularized
        for token in normalized.split_whitespace() {
            let singular = singularize(token);
            for key in [token, singular.as_str()] {
                if let Some(product) = self.product_canon.get(key) {
                    resolution.product = Some(product.clone());
                    resolution.category = self.default_category(product).map(str::to_string);
                    resolution.matched_term = Some(key.to_string());
                    return resolution;
                }
            }
        }
        for token in normalized.split_whitespace() {
            let singular = singularize(token);
            for key in [token, singular.as_str()] {
                if let Some(category) = self.category_canon.get(key) {
                    resolution.category = Some(category.clone());
                    resolution.category_explicit = true;
                    resolution.matched_term = Some(key.to_string());
                    return resolution;
                }
            }
        }

        resolution
    }

    /// Longest-phrase-first containment scan; phrases are pre-sorted
    fn scan_phrases(&self, padded: &str, phrases: &[String]) -> Option<String> {
        phrases
            .iter()
            .find(|phrase| padded.contains(&format!(" {} ", phrase)))
            .cloned()
    }
}

/// Built-in PT/ES seed dictionary
///
/// Deployments replace this through the canon admin interface; the seed
/// keeps the assistant useful out of the box.
pub fn default_dictionary() -> CanonicalDictionary {
    let products: HashMap<String, String> = [
        ("celular", "celular"),
        ("celulares", "celular"),
        ("telefone", "celular"),
        ("telefono", "celular"),
        ("movil", "celular"),
        ("smartphone", "celular"),
        ("iphone", "iphone"),
        ("galaxy", "galaxy"),
        ("fone", "fone de ouvido"),
        ("fones", "fone de ouvido"),
        ("fone de ouvido", "fone de ouvido"),
        ("fones de ouvido", "fone de ouvido"),
        ("auricular", "fone de ouvido"),
        ("auriculares", "fone de ouvido"),
        ("headphone", "fone de ouvido"),
        ("notebook", "notebook"),
        ("laptop", "notebook"),
        ("computador", "notebook"),
        ("perfume", "perfume"),
        ("perfumes", "perfume"),
        ("colonia", "perfume"),
        ("tenis", "tenis"),
        ("zapatilla", "tenis"),
        ("zapatillas", "tenis"),
        ("sapato", "tenis"),
        ("capa", "capinha"),
        ("capinha", "capinha"),
        ("funda", "capinha"),
        ("carregador", "carregador"),
        ("cargador", "carregador"),
        ("pelicula", "pelicula"),
        ("smartwatch", "smartwatch"),
        ("relogio", "smartwatch"),
        ("reloj", "smartwatch"),
        ("camiseta", "camiseta"),
        ("camisa", "camiseta"),
        ("geladeira", "geladeira"),
        ("heladera", "geladeira"),
        ("tv", "televisao"),
        ("televisao", "televisao"),
        ("televisor", "televisao"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let categories: HashMap<String, String> = [
        ("eletronico", "eletronicos"),
        ("eletronicos", "eletronicos"),
        ("electronica", "eletronicos"),
        ("tecnologia", "eletronicos"),
        ("acessorio", "acessorios"),
        ("acessorios", "acessorios"),
        ("accesorios", "acessorios"),
        ("beleza", "beleza"),
        ("belleza", "beleza"),
        ("cosmetico", "beleza"),
        ("cosmeticos", "beleza"),
        ("roupa", "moda"),
        ("roupas", "moda"),
        ("ropa", "moda"),
        ("moda", "moda"),
        ("calcado", "calcados"),
        ("calcados", "calcados"),
        ("calzado", "calcados"),
        ("eletrodomestico", "eletrodomesticos"),
        ("eletrodomesticos", "eletrodomesticos"),
        ("electrodomesticos", "eletrodomesticos"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let product_categories: HashMap<String, String> = [
        ("celular", "eletronicos"),
        ("iphone", "eletronicos"),
        ("galaxy", "eletronicos"),
        ("fone de ouvido", "eletronicos"),
        ("notebook", "eletronicos"),
        ("smartwatch", "eletronicos"),
        ("televisao", "eletronicos"),
        ("perfume", "beleza"),
        ("tenis", "calcados"),
        ("capinha", "acessorios"),
        ("carregador", "acessorios"),
        ("pelicula", "acessorios"),
        ("camiseta", "moda"),
        ("geladeira", "eletrodomesticos"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    // The seed data is internally consistent, so this cannot fail
    CanonicalDictionary::from_parts(products, categories, product_categories)
        .unwrap_or_default()
}

/// Shared, swappable dictionary handle
///
/// The conversational path reads the current `Arc`; the admin reload path
/// swaps in a rebuilt dictionary without a process restart.
#[derive(Clone)]
pub struct CanonHandle {
    inner: Arc<RwLock<Arc<CanonicalDictionary>>>,
}

impl CanonHandle {
    pub fn new(dictionary: CanonicalDictionary) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(dictionary))),
        }
    }

    /// Current dictionary snapshot
    pub fn current(&self) -> Arc<CanonicalDictionary> {
        self.inner.read().clone()
    }

    /// Replace the dictionary (admin reload path)
    pub fn replace(&self, dictionary: CanonicalDictionary) {
        let (products, categories) = dictionary.len();
        *self.inner.write() = Arc::new(dictionary);
        tracing::info!(products, categories, "Canonical dictionary replaced");
    }
}

impl Default for CanonHandle {
    fn default() -> Self {
        Self::new(default_dictionary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_phrase_wins() {
        let dict = default_dictionary();

        let r = dict.resolve("quero um fone de ouvido sem fio");
        assert_eq!(r.product.as_deref(), Some("fone de ouvido"));
        assert_eq!(r.matched_term.as_deref(), Some("fone de ouvido"));

        // Shorter synonym still resolves to the same canonical term
        let r = dict.resolve("quero um fone");
        assert_eq!(r.product.as_deref(), Some("fone de ouvido"));
    }

    #[test]
    fn test_default_category_attached() {
        let dict = default_dictionary();

        let r = dict.resolve("procuro perfume");
        assert_eq!(r.product.as_deref(), Some("perfume"));
        assert_eq!(r.category.as_deref(), Some("beleza"));
        assert!(!r.category_explicit);
    }

    #[test]
    fn test_explicit_category_wins() {
        let dict = default_dictionary();

        // "capinha" defaults to acessorios; an explicit different category
        // phrase overrides it
        let r = dict.resolve("capinha na secao de eletronicos");
        assert_eq!(r.product.as_deref(), Some("capinha"));
        assert_eq!(r.category.as_deref(), Some("eletronicos"));
        assert!(r.category_explicit);
    }

    #[test]
    fn test_category_only() {
        let dict = default_dictionary();

        let r = dict.resolve("me mostra eletronicos");
        assert!(r.product.is_none());
        assert_eq!(r.category.as_deref(), Some("eletronicos"));
        assert!(r.category_explicit);
    }

    #[test]
    fn test_plural_and_accent_fallback() {
        let dict = default_dictionary();

        let r = dict.resolve("PERFUMES importados");
        assert_eq!(r.product.as_deref(), Some("perfume"));

        let r = dict.resolve("teléfono barato");
        assert_eq!(r.product.as_deref(), Some("celular"));
    }

    #[test]
    fn test_no_match() {
        let dict = default_dictionary();
        assert!(dict.resolve("xyzzy plugh").is_empty());
        assert!(dict.resolve("").is_empty());
    }

    #[test]
    fn test_from_parts_drops_dangling() {
        let products = HashMap::from([("foo".to_string(), "foo".to_string())]);
        let categories = HashMap::from([("bar".to_string(), "bar".to_string())]);
        let mapping = HashMap::from([
            ("foo".to_string(), "bar".to_string()),
            ("foo2".to_string(), "nope".to_string()),
        ]);

        let dict = CanonicalDictionary::from_parts(products, categories, mapping).unwrap();
        assert_eq!(dict.default_category("foo"), Some("bar"));
        assert_eq!(dict.default_category("foo2"), None);
    }

    #[test]
    fn test_majority_vote() {
        let pairs = vec![
            ("Perfume".to_string(), "beleza".to_string()),
            ("perfume".to_string(), "beleza".to_string()),
            ("perfume".to_string(), "casa".to_string()),
        ];
        let mapping = CanonicalDictionary::vote_product_categories(&pairs);
        assert_eq!(mapping.get("perfume").map(String::as_str), Some("beleza"));
    }

    #[test]
    fn test_handle_replace() {
        let handle = CanonHandle::default();
        assert!(!handle.current().is_empty());

        let products = HashMap::from([("gadget".to_string(), "gadget".to_string())]);
        let categories = HashMap::from([("stuff".to_string(), "stuff".to_string())]);
        let dict =
            CanonicalDictionary::from_parts(products, categories, HashMap::new()).unwrap();
        handle.replace(dict);

        let r = handle.current().resolve("quero um gadget");
        assert_eq!(r.product.as_deref(), Some("gadget"));
    }
}
