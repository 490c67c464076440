use serde::{Deserialize, Serialize};

/// Where saved connection profiles live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStoreConfig {
    pub enabled: bool,
    /// `sqlite://<path>`, `sqlite://:memory:` or a bare file path
    pub url: Option<String>,
    pub database: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SQLiteConfig {
    pub path: String,
    pub busy_timeout: u32,
    pub journal_mode: Option<String>,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: None,
            database: None,
        }
    }
}

impl Default for SQLiteConfig {
    fn default() -> Self {
        Self {
            path: ":memory:".to_string(),
            busy_timeout: 5000,
            journal_mode: None,
        }
    }
}

impl SQLiteConfig {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}
