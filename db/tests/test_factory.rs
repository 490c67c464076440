use db::config::{DocumentStoreConfig, SQLiteConfig};
use db::{create_store, DatabaseError, DocumentStore, DocumentStoreFactory, SQLiteDocumentStore};
use std::sync::Arc;
use serde_json::json;
use tempfile::TempDir;

fn sqlite_config(dir: &TempDir) -> DocumentStoreConfig {
    DocumentStoreConfig {
        enabled: true,
        url: Some(format!(
            "sqlite://{}",
            dir.path().join("profiles.db").to_string_lossy()
        )),
        database: Some("connect_de".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_sqlite_store() {
        let dir = TempDir::new().unwrap();
        let store = create_store(&sqlite_config(&dir)).expect("Failed to create store");

        store.initialize().await.unwrap();
        assert_eq!(store.store_type(), "sqlite");

        store.insert("connections", json!({"id": "1"})).await.unwrap();
        assert_eq!(store.find("connections", &json!({}), None).await.unwrap().len(), 1);
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_store_persists_between_connections() {
        let dir = TempDir::new().unwrap();
        let config = sqlite_config(&dir);

        let store = create_store(&config).unwrap();
        store.insert("connections", json!({"id": "kept"})).await.unwrap();
        store.close().await.unwrap();
        drop(store);

        let reopened = create_store(&config).unwrap();
        let found = reopened.find("connections", &json!({"id": "kept"}), None).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_bare_path_uses_sqlite() {
        let dir = TempDir::new().unwrap();
        let config = DocumentStoreConfig {
            url: Some(dir.path().join("bare.db").to_string_lossy().to_string()),
            ..sqlite_config(&dir)
        };

        let store = create_store(&config).unwrap();
        assert_eq!(store.store_type(), "sqlite");
    }

    #[test]
    fn test_disabled_store() {
        let dir = TempDir::new().unwrap();
        let config = DocumentStoreConfig {
            enabled: false,
            ..sqlite_config(&dir)
        };

        assert!(matches!(create_store(&config), Err(DatabaseError::ConfigError(_))));
    }

    #[test]
    fn test_missing_url_or_database() {
        let dir = TempDir::new().unwrap();

        let no_url = DocumentStoreConfig {
            url: None,
            ..sqlite_config(&dir)
        };
        assert!(matches!(create_store(&no_url), Err(DatabaseError::ConfigError(_))));

        let no_database = DocumentStoreConfig {
            database: Some("  ".to_string()),
            ..sqlite_config(&dir)
        };
        assert!(matches!(create_store(&no_database), Err(DatabaseError::ConfigError(_))));
    }

    #[test]
    fn test_unsupported_scheme() {
        let config = DocumentStoreConfig {
            enabled: true,
            url: Some("mongodb://localhost:27017".to_string()),
            database: Some("connect_de".to_string()),
        };

        match create_store(&config) {
            Err(DatabaseError::UnsupportedType(scheme)) => assert_eq!(scheme, "mongodb"),
            other => panic!("expected unsupported type, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_register_custom_scheme() {
        // 自定义 scheme：忽略位置，始终使用内存库
        DocumentStoreFactory::register_store_type("scratch", |_location, database| {
            let store = SQLiteDocumentStore::new(SQLiteConfig::default(), database)?;
            Ok(Arc::new(store) as Arc<dyn DocumentStore>)
        })
        .unwrap();
        assert!(DocumentStoreFactory::is_registered("scratch"));

        let config = DocumentStoreConfig {
            enabled: true,
            url: Some("scratch://anything".to_string()),
            database: Some("connect_de".to_string()),
        };
        let store = create_store(&config).unwrap();
        store.insert("connections", json!({"id": "tmp"})).await.unwrap();
        assert_eq!(store.find("connections", &json!({}), None).await.unwrap().len(), 1);
    }

    #[test]
    fn test_builtin_types_registered() {
        assert!(DocumentStoreFactory::is_registered("sqlite"));
        assert!(!DocumentStoreFactory::is_registered("mongodb"));
    }
}
