use db::{create_store, find_profiles, ConnectionProfile, DocumentStoreConfig};
use log::{info, warn};
use storage::ConnectionDescriptor;
use utils::app_config::ProfilesConfig;

use crate::error::Result;

/// 将配置文件中的 `[profiles]` 转为文档存储配置
pub fn store_config(config: &ProfilesConfig) -> DocumentStoreConfig {
    DocumentStoreConfig {
        enabled: config.enabled,
        url: config.url.clone(),
        database: config.database.clone(),
    }
}

/// Load the saved connection profiles.
///
/// Returns an empty list when profiles are disabled. The store is closed
/// before returning, also when the lookup fails.
pub async fn load_profiles(config: &ProfilesConfig) -> Result<Vec<ConnectionProfile>> {
    if !config.enabled {
        return Ok(Vec::new());
    }

    let store = create_store(&store_config(config))?;

    let result = async {
        store.initialize().await?;
        find_profiles(store.as_ref(), &config.collection, &config.kind).await
    }
    .await;

    if let Err(e) = store.close().await {
        warn!("Failed to close {} profile store: {}", store.store_type(), e);
    }

    let profiles = result?;
    info!("Found {} saved connection(s)", profiles.len());
    Ok(profiles)
}

/// Descriptor for a saved profile; its endpoint goes through the same
/// parser as a command-line endpoint.
pub fn descriptor_from_profile(profile: &ConnectionProfile) -> Result<ConnectionDescriptor> {
    let access = &profile.access;
    Ok(ConnectionDescriptor::new(
        access.endpoint_url.as_deref(),
        access.access_key.clone(),
        access.secret_key.clone(),
        access.bucket.clone(),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::ProfileAccess;

    fn profile(endpoint: Option<&str>) -> ConnectionProfile {
        ConnectionProfile {
            id: "p1".to_string(),
            name: "local".to_string(),
            kind: Some("s3http".to_string()),
            access: ProfileAccess {
                endpoint_url: endpoint.map(str::to_string),
                access_key: "ak".to_string(),
                secret_key: "sk".to_string(),
                bucket: "data".to_string(),
            },
        }
    }

    #[test]
    fn profile_endpoint_is_parsed() {
        let descriptor = descriptor_from_profile(&profile(Some("http://minio:9000"))).unwrap();
        assert_eq!(descriptor.host(), Some("minio"));
        assert_eq!(descriptor.port(), Some(9000));
        assert_eq!(descriptor.bucket(), "data");
    }

    #[test]
    fn profile_without_endpoint_has_no_host() {
        let descriptor = descriptor_from_profile(&profile(None)).unwrap();
        assert_eq!(descriptor.host(), None);
        assert_eq!(descriptor.endpoint_url(), None);
    }

    #[test]
    fn malformed_profile_endpoint_is_rejected() {
        assert!(descriptor_from_profile(&profile(Some("http://host:"))).is_err());
    }

    #[tokio::test]
    async fn disabled_profiles_load_nothing() {
        let config = ProfilesConfig {
            enabled: false,
            url: None,
            database: None,
            collection: "connections".to_string(),
            kind: "s3http".to_string(),
        };
        assert!(load_profiles(&config).await.unwrap().is_empty());
    }
}
