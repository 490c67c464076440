pub mod connection;
pub mod endpoint;
pub mod error;
pub mod listing;
pub mod memory;
pub mod s3;

pub use connection::{ConnectionDescriptor, ConnectionMeta};
pub use endpoint::{parse_endpoint_uri, EndpointParts};
pub use error::{EndpointError, Result, StorageError};
pub use listing::{
    download_base_path, flatten, FileMetadata, FlattenOptions, FlattenedView, Flattener,
    ListingEntry, DELIMITER,
};
pub use memory::MemoryStore;
pub use s3::S3Storage;

use bytes::Bytes;

/// 对象存储操作trait
///
/// Listings are fully drained before they are returned; there is no partial
/// or streaming result.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    fn bucket(&self) -> &str;

    /// Common prefixes directly under `prefix`, grouped by `delimiter`.
    async fn list_common_prefixes(&self, prefix: &str, delimiter: &str) -> Result<Vec<String>>;

    /// Every key under `prefix`, one inner vector per store page.
    async fn list_pages(&self, prefix: &str) -> Result<Vec<Vec<ListingEntry>>>;

    async fn get_object(&self, key: &str) -> Result<Bytes>;

    /// Release the connection. Safe to call after a failed operation.
    async fn close(&self) -> Result<()>;
}
