use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{DatabaseError, Result};

/// Field every stored document carries.
pub const ID_FIELD: &str = "id";

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Initialize database connection
    async fn initialize(&self) -> Result<()>;

    /// Documents of `collection` matching `filter`.
    ///
    /// `filter` is a JSON object of (dotted) field paths to expected values;
    /// an empty object matches everything. `projection` keeps only the listed
    /// top-level fields (plus `id`).
    async fn find(
        &self, collection: &str, filter: &Value, projection: Option<&[&str]>,
    ) -> Result<Vec<Value>>;

    /// Insert or replace a document, returning its id.
    async fn insert(&self, collection: &str, document: Value) -> Result<String>;

    /// Ping database to check connection
    async fn ping(&self) -> Result<()>;

    /// Close database connection
    async fn close(&self) -> Result<()>;

    /// Get store type
    fn store_type(&self) -> &'static str;
}

/// Resolve a dotted path such as `access.bucket`.
pub fn lookup_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, field| current.get(field))
}

pub fn matches_filter(document: &Value, filter: &Value) -> Result<bool> {
    let conditions = filter.as_object().ok_or_else(|| {
        DatabaseError::QueryError(format!("filter must be a JSON object, got {}", filter))
    })?;

    Ok(conditions
        .iter()
        .all(|(path, expected)| lookup_path(document, path) == Some(expected)))
}

pub fn apply_projection(document: Value, projection: Option<&[&str]>) -> Value {
    match (projection, document) {
        (Some(fields), Value::Object(mut object)) => {
            let mut projected = Map::new();
            if let Some(id) = object.remove(ID_FIELD) {
                projected.insert(ID_FIELD.to_string(), id);
            }
            for field in fields {
                if let Some(value) = object.remove(*field) {
                    projected.insert(field.to_string(), value);
                }
            }
            Value::Object(projected)
        }
        (_, document) => document,
    }
}
