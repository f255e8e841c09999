//! Canonical dictionary persistence
//!
//! The dictionary lives on disk as plain JSON so it can be hand-edited
//! or updated through the admin endpoint. Saves go through a temp file
//! plus rename, so a crash mid-write never truncates the live file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use shop_agent_nlu::CanonicalDictionary;

use crate::ConfigError;

/// On-disk dictionary format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonFile {
    /// surface term -> canonical product
    #[serde(default)]
    pub products: HashMap<String, String>,

    /// surface term -> canonical category
    #[serde(default)]
    pub categories: HashMap<String, String>,

    /// canonical product -> default canonical category
    #[serde(default)]
    pub product_categories: HashMap<String, String>,
}

impl CanonFile {
    /// Validate and build the runtime dictionary
    pub fn to_dictionary(&self) -> Result<CanonicalDictionary, ConfigError> {
        CanonicalDictionary::from_parts(
            self.products.clone(),
            self.categories.clone(),
            self.product_categories.clone(),
        )
        .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Snapshot a runtime dictionary back into the file format
    pub fn from_dictionary(dictionary: &CanonicalDictionary) -> Self {
        let (products, categories, product_categories) = dictionary.parts();
        Self {
            products: products.clone(),
            categories: categories.clone(),
            product_categories: product_categories.clone(),
        }
    }
}

/// JSON-file-backed dictionary store
pub struct CanonStore {
    path: PathBuf,
}

impl CanonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate the dictionary from disk
    pub fn load(&self) -> Result<CanonicalDictionary, ConfigError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|_| ConfigError::FileNotFound(self.path.display().to_string()))?;
        let file: CanonFile = serde_json::from_str(&raw)?;
        let dictionary = file.to_dictionary()?;

        let (products, categories) = dictionary.len();
        tracing::info!(
            path = %self.path.display(),
            products,
            categories,
            "Canonical dictionary loaded"
        );
        Ok(dictionary)
    }

    /// Persist the dictionary atomically (temp file + rename)
    pub fn save(&self, dictionary: &CanonicalDictionary) -> Result<(), ConfigError> {
        let file = CanonFile::from_dictionary(dictionary);
        let json = serde_json::to_string_pretty(&file)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::info!(path = %self.path.display(), "Canonical dictionary saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file() -> CanonFile {
        let mut products = HashMap::new();
        products.insert("celulares".to_string(), "celular".to_string());
        products.insert("celular".to_string(), "celular".to_string());

        let mut categories = HashMap::new();
        categories.insert("eletrônicos".to_string(), "eletronicos".to_string());

        let mut product_categories = HashMap::new();
        product_categories.insert("celular".to_string(), "eletronicos".to_string());

        CanonFile {
            products,
            categories,
            product_categories,
        }
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canon.json");

        let store = CanonStore::new(&path);
        let dictionary = sample_file().to_dictionary().unwrap();
        store.save(&dictionary).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.len(), dictionary.len());

        let resolution = reloaded.resolve("quero dois celulares");
        assert_eq!(resolution.product.as_deref(), Some("celular"));
        assert_eq!(resolution.category.as_deref(), Some("eletronicos"));
    }

    #[test]
    fn test_missing_file() {
        let store = CanonStore::new("/nonexistent/canon.json");
        assert!(matches!(store.load(), Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_dangling_category_is_dropped() {
        let mut file = sample_file();
        file.product_categories
            .insert("perfume".to_string(), "inexistente".to_string());

        let dictionary = file.to_dictionary().unwrap();
        assert_eq!(dictionary.default_category("perfume"), None);
        assert_eq!(
            dictionary.default_category("celular"),
            Some("eletronicos")
        );
    }

    #[test]
    fn test_empty_dictionary_rejected() {
        assert!(CanonFile::default().to_dictionary().is_err());
    }
}
