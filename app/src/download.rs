use bytes::Bytes;
use log::info;
use std::path::{Path, PathBuf};
use storage::{ObjectStore, DELIMITER};

use crate::error::{AppError, Result};
use crate::session::close_after;

/// Object contents together with the name to save them under.
#[derive(Debug, Clone)]
pub struct DownloadedObject {
    pub key: String,
    pub file_name: String,
    pub data: Bytes,
}

impl DownloadedObject {
    /// Write the contents to `target`, or to `file_name` in the current
    /// directory when no target is given. Returns the path written.
    pub async fn save(&self, target: Option<&Path>) -> Result<PathBuf> {
        let path = target
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&self.file_name));

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &self.data).await?;

        info!("Saved '{}' ({} bytes) to {}", self.key, self.data.len(), path.display());
        Ok(path)
    }
}

/// Strip quotes and surrounding whitespace that pasted keys often carry.
pub fn clean_key(key: &str) -> String {
    key.replace('"', "").trim().to_string()
}

/// 取键的最后一段作为文件名
pub fn file_name_of(key: &str) -> Result<String> {
    match key.rsplit(DELIMITER).next() {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(AppError::InvalidKey(key.to_string())),
    }
}

/// Fetch one object. The store is closed afterwards, also on failure.
pub async fn download(store: &dyn ObjectStore, key: &str) -> Result<DownloadedObject> {
    let result = fetch(store, key).await;
    close_after(store, result).await
}

async fn fetch(store: &dyn ObjectStore, key: &str) -> Result<DownloadedObject> {
    let key = clean_key(key);
    let file_name = file_name_of(&key)?;

    let data = store.get_object(&key).await?;
    info!("Fetched '{}' from bucket '{}' ({} bytes)", key, store.bucket(), data.len());

    Ok(DownloadedObject {
        key,
        file_name,
        data,
    })
}
