use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::config::{DocumentStoreConfig, SQLiteConfig};
use crate::error::{DatabaseError, Result};
use crate::sqlite::SQLiteDocumentStore;
use crate::traits::DocumentStore;

/// Builds a store from the part of the URL after `<scheme>://` and the database name.
pub type StoreCreator = fn(location: &str, database: &str) -> Result<Arc<dyn DocumentStore>>;

/// URL scheme assumed when the configured URL carries none.
pub const DEFAULT_SCHEME: &str = "sqlite";

static STORE_REGISTRY: Lazy<DashMap<String, StoreCreator>> = Lazy::new(|| {
    let registry = DashMap::new();
    // 自动注册内置存储类型
    register_builtin_types(&registry);
    registry
});

pub struct DocumentStoreFactory;

impl DocumentStoreFactory {
    /// Register a new store type under a URL scheme
    pub fn register_store_type(scheme: &str, creator: StoreCreator) -> Result<()> {
        STORE_REGISTRY.insert(scheme.to_string(), creator);
        Ok(())
    }

    pub fn is_registered(scheme: &str) -> bool {
        STORE_REGISTRY.contains_key(scheme)
    }

    /// Create a store instance based on configuration
    pub fn create_store(config: &DocumentStoreConfig) -> Result<Arc<dyn DocumentStore>> {
        if !config.enabled {
            return Err(DatabaseError::ConfigError("Document store is disabled".to_string()));
        }

        let url = config
            .url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| DatabaseError::ConfigError("Document store URL is not set".to_string()))?;
        let database = config
            .database
            .as_deref()
            .filter(|db| !db.trim().is_empty())
            .ok_or_else(|| DatabaseError::ConfigError("Document database is not set".to_string()))?;

        let (scheme, location) = split_store_url(url);

        // 先复制出函数指针，避免持有 DashMap 引用
        let creator = STORE_REGISTRY
            .get(scheme)
            .map(|entry| *entry.value())
            .ok_or_else(|| DatabaseError::UnsupportedType(scheme.to_string()))?;

        creator(location, database)
    }
}

/// Convenience function to create a store from configuration
pub fn create_store(config: &DocumentStoreConfig) -> Result<Arc<dyn DocumentStore>> {
    DocumentStoreFactory::create_store(config)
}

/// `sqlite://profiles.db` -> (`sqlite`, `profiles.db`); a bare path uses the default scheme.
pub fn split_store_url(url: &str) -> (&str, &str) {
    let url = url.trim();
    match url.split_once("://") {
        Some((scheme, location)) => (scheme, location),
        None => (DEFAULT_SCHEME, url),
    }
}

fn register_builtin_types(registry: &DashMap<String, StoreCreator>) {
    registry.insert("sqlite".to_string(), |location, database| {
        let store = SQLiteDocumentStore::new(SQLiteConfig::with_path(location), database)?;
        Ok(Arc::new(store) as Arc<dyn DocumentStore>)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_store_url_variants() {
        assert_eq!(split_store_url("sqlite://profiles.db"), ("sqlite", "profiles.db"));
        assert_eq!(split_store_url("sqlite:///var/lib/p.db"), ("sqlite", "/var/lib/p.db"));
        assert_eq!(split_store_url("sqlite://:memory:"), ("sqlite", ":memory:"));
        assert_eq!(split_store_url("profiles.db"), ("sqlite", "profiles.db"));
        assert_eq!(split_store_url("mongodb://localhost:27017"), ("mongodb", "localhost:27017"));
    }
}
