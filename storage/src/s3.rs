use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::connection::ConnectionDescriptor;
use crate::error::{Result, StorageError};
use crate::listing::ListingEntry;
use crate::ObjectStore;

pub const DEFAULT_REGION: &str = "us-east-1";

/// 凭证来源标识
const PROVIDER_NAME: &str = "s3-browser";

/// Open connection to one bucket of an S3-compatible store.
pub struct S3Storage {
    client: Client,
    bucket: String,
    endpoint: String,
}

impl S3Storage {
    /// Build a client for the descriptor's endpoint and check that the bucket answers.
    pub async fn connect(descriptor: &ConnectionDescriptor) -> Result<Self> {
        let endpoint = descriptor.endpoint_url().ok_or_else(|| {
            StorageError::Connection("no endpoint host given; pass --endpoint or --host".to_string())
        })?;
        let region = descriptor.region().unwrap_or(DEFAULT_REGION).to_string();

        let credentials = aws_sdk_s3::config::Credentials::new(
            descriptor.access_key(),
            descriptor.secret_key(),
            None,
            None,
            PROVIDER_NAME,
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .endpoint_url(&endpoint)
            .credentials_provider(credentials)
            .load()
            .await;

        // MinIO 等自建服务需要 path-style 访问
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();
        let client = Client::from_conf(s3_config);

        let bucket = descriptor.bucket().to_string();
        client
            .head_bucket()
            .bucket(&bucket)
            .send()
            .await
            .map_err(|e| {
                StorageError::Connection(format!(
                    "bucket '{}' is not reachable at {}: {}",
                    bucket,
                    endpoint,
                    DisplayErrorContext(e)
                ))
            })?;

        info!("S3 connected: {} (bucket {})", endpoint, bucket);

        Ok(Self {
            client,
            bucket,
            endpoint,
        })
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_common_prefixes(&self, prefix: &str, delimiter: &str) -> Result<Vec<String>> {
        let mut prefixes = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut req = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .delimiter(delimiter);

            if let Some(ref token) = continuation_token {
                req = req.continuation_token(token);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| request_error("list with delimiter failed", e))?;

            if let Some(common_prefixes) = resp.common_prefixes {
                prefixes.extend(common_prefixes.into_iter().filter_map(|cp| cp.prefix));
            }

            if resp.is_truncated == Some(true) {
                continuation_token = resp.next_continuation_token;
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        debug!("Listed {} common prefixes under '{}'", prefixes.len(), prefix);
        Ok(prefixes)
    }

    async fn list_pages(&self, prefix: &str) -> Result<Vec<Vec<ListingEntry>>> {
        let mut pages = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut req = self.client.list_objects_v2().bucket(&self.bucket).prefix(prefix);

            if let Some(ref token) = continuation_token {
                req = req.continuation_token(token);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| request_error("list objects failed", e))?;

            let page: Vec<ListingEntry> = resp
                .contents
                .unwrap_or_default()
                .into_iter()
                .filter_map(|obj| {
                    let key = obj.key?;
                    let last_modified = obj
                        .last_modified
                        .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()));
                    let size = obj.size.and_then(|s| u64::try_from(s).ok());

                    Some(ListingEntry::object(key, size, last_modified))
                })
                .collect();
            pages.push(page);

            if resp.is_truncated == Some(true) {
                continuation_token = resp.next_continuation_token;
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        debug!("Listed {} page(s) under '{}'", pages.len(), prefix);
        Ok(pages)
    }

    async fn get_object(&self, key: &str) -> Result<Bytes> {
        debug!("Downloading s3://{}/{}", self.bucket, key);

        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let missing = err.as_service_error().map(|e| e.is_no_such_key()).unwrap_or(false)
                    || err.raw_response().map(|r| r.status().as_u16() == 404).unwrap_or(false);
                if missing {
                    return Err(StorageError::NotFound(key.to_string()));
                }
                return Err(request_error("get object failed", err));
            }
        };

        let data = output.body.collect().await.map_err(|e| {
            StorageError::Request(format!(
                "failed to read body for s3://{}/{}: {}",
                self.bucket, key, e
            ))
        })?;

        Ok(data.into_bytes())
    }

    async fn close(&self) -> Result<()> {
        // SDK client 没有显式关闭，drop 时释放连接池
        info!("S3 closed: {}", self.endpoint);
        Ok(())
    }
}

/// Transport failures count as connection errors, everything else as a failed request.
fn request_error<E, R>(context: &str, err: SdkError<E, R>) -> StorageError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let unreachable = matches!(err, SdkError::DispatchFailure(_) | SdkError::TimeoutError(_));
    let message = format!("{}: {}", context, DisplayErrorContext(err));

    if unreachable {
        StorageError::Connection(message)
    } else {
        StorageError::Request(message)
    }
}
