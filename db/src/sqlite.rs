use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::Value;
use slog_scope::debug;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::SQLiteConfig;
use crate::error::{DatabaseError, Result};
use crate::traits::{apply_projection, matches_filter, DocumentStore, ID_FIELD};

const DOCUMENTS_TABLE_DEFINITION: &str = "
    database TEXT NOT NULL,
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    PRIMARY KEY (database, collection, id)
";

/// JSON documents stored in a single SQLite table, partitioned by database
/// and collection name.
pub struct SQLiteDocumentStore {
    connection: Arc<Mutex<Connection>>,
    config: SQLiteConfig,
    database: String,
}

impl SQLiteDocumentStore {
    pub fn new(config: SQLiteConfig, database: impl Into<String>) -> Result<Self> {
        let database = database.into();
        if database.is_empty() {
            return Err(DatabaseError::ConfigError("database name is not set".to_string()));
        }

        let conn = Connection::open(&config.path).map_err(|e| {
            DatabaseError::ConnectionError(format!("cannot open '{}': {}", config.path, e))
        })?;

        // Configure SQLite
        conn.pragma_update(None, "busy_timeout", config.busy_timeout)?;

        if let Some(journal_mode) = &config.journal_mode {
            conn.pragma_update(None, "journal_mode", journal_mode)?;
        }

        let create_table_sql = format!(
            "CREATE TABLE IF NOT EXISTS documents ({})",
            DOCUMENTS_TABLE_DEFINITION
        );
        conn.execute(&create_table_sql, [])?;

        debug!("SQLite document store opened: {} (database {})", config.path, database);

        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
            config,
            database,
        })
    }

    /// Ids are kept as strings; numeric ids are converted, missing ones generated.
    fn normalize_id(document: &mut Value) -> Result<String> {
        let object = document.as_object_mut().ok_or_else(|| {
            DatabaseError::QueryError("document must be a JSON object".to_string())
        })?;

        let id = match object.get(ID_FIELD) {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        object.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        Ok(id)
    }
}

#[async_trait]
impl DocumentStore for SQLiteDocumentStore {
    async fn initialize(&self) -> Result<()> {
        self.ping().await
    }

    async fn find(
        &self, collection: &str, filter: &Value, projection: Option<&[&str]>,
    ) -> Result<Vec<Value>> {
        let conn = self.connection.lock().await;

        let mut stmt = conn.prepare(
            "SELECT id, body FROM documents WHERE database = ?1 AND collection = ?2 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![self.database, collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, body) = row?;
            let mut document: Value = serde_json::from_str(&body)?;
            if let Some(object) = document.as_object_mut() {
                object
                    .entry(ID_FIELD.to_string())
                    .or_insert_with(|| Value::String(id));
            }

            if matches_filter(&document, filter)? {
                documents.push(apply_projection(document, projection));
            }
        }

        debug!("Found {} document(s) in {}.{}", documents.len(), self.database, collection);
        Ok(documents)
    }

    async fn insert(&self, collection: &str, document: Value) -> Result<String> {
        let mut document = document;
        let id = Self::normalize_id(&mut document)?;
        let body = serde_json::to_string(&document)?;

        let conn = self.connection.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO documents (database, collection, id, body) VALUES (?1, ?2, ?3, ?4)",
            params![self.database, collection, id, body],
        )?;

        Ok(id)
    }

    async fn ping(&self) -> Result<()> {
        let conn = self.connection.lock().await;

        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let _conn = self.connection.lock().await;
        // SQLite connection closes automatically when dropped
        debug!("SQLite document store closed: {}", self.config.path);
        Ok(())
    }

    fn store_type(&self) -> &'static str {
        "sqlite"
    }
}
