//! In-memory implementation of [`ObjectStore`].
//!
//! Keeps objects in a sorted map and splits listings into fixed-size pages,
//! so callers see the same pagination shape a real store produces.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::error::{Result, StorageError};
use crate::listing::ListingEntry;
use crate::ObjectStore;

const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    last_modified: DateTime<Utc>,
}

pub struct MemoryStore {
    bucket: String,
    // key -> content
    objects: RwLock<BTreeMap<String, StoredObject>>,
    page_size: usize,
    fail_listing: bool,
    close_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(BTreeMap::new()),
            page_size: DEFAULT_PAGE_SIZE,
            fail_listing: false,
            close_calls: AtomicUsize::new(0),
        }
    }

    /// Number of keys per listing page (at least one).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Make every listing call fail, to exercise error paths.
    pub fn with_listing_failure(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub async fn put_object(&self, key: impl Into<String>, data: impl Into<Bytes>) {
        self.put_object_at(key, data, Utc::now()).await;
    }

    pub async fn put_object_at(
        &self, key: impl Into<String>, data: impl Into<Bytes>, last_modified: DateTime<Utc>,
    ) {
        let mut objects = self.objects.write().await;
        objects.insert(
            key.into(),
            StoredObject {
                data: data.into(),
                last_modified,
            },
        );
    }

    /// How many times [`ObjectStore::close`] ran.
    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    fn check_listing(&self) -> Result<()> {
        if self.fail_listing {
            return Err(StorageError::Request(format!(
                "listing bucket '{}' failed",
                self.bucket
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_common_prefixes(&self, prefix: &str, delimiter: &str) -> Result<Vec<String>> {
        self.check_listing()?;
        let objects = self.objects.read().await;

        let mut prefixes = BTreeSet::new();
        for key in objects.keys() {
            let Some(remainder) = key.strip_prefix(prefix) else {
                continue;
            };
            if let Some(pos) = remainder.find(delimiter) {
                prefixes.insert(format!("{}{}", prefix, &remainder[..pos + delimiter.len()]));
            }
        }

        Ok(prefixes.into_iter().collect())
    }

    async fn list_pages(&self, prefix: &str) -> Result<Vec<Vec<ListingEntry>>> {
        self.check_listing()?;
        let objects = self.objects.read().await;

        let entries: Vec<ListingEntry> = objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| {
                ListingEntry::object(
                    key.clone(),
                    Some(object.data.len() as u64),
                    Some(object.last_modified),
                )
            })
            .collect();

        // 与 S3 一致：没有匹配的键时仍返回一个空页
        if entries.is_empty() {
            return Ok(vec![Vec::new()]);
        }

        Ok(entries.chunks(self.page_size).map(|page| page.to_vec()).collect())
    }

    async fn get_object(&self, key: &str) -> Result<Bytes> {
        let objects = self.objects.read().await;
        objects
            .get(key)
            .map(|object| object.data.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn close(&self) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
