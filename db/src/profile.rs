use serde::{Deserialize, Serialize};
use serde_json::json;
use slog_scope::{debug, warn};

use crate::error::Result;
use crate::traits::DocumentStore;

/// Document `type` of saved S3-over-HTTP connections.
pub const PROFILE_KIND: &str = "s3http";

const PROFILE_PROJECTION: [&str; 3] = ["name", "type", "access"];

/// A saved connection document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub access: ProfileAccess,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileAccess {
    /// Older documents call this field `endpoint_uri`.
    #[serde(default, alias = "endpoint_uri")]
    pub endpoint_url: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
}

impl ConnectionProfile {
    /// Profiles are picked by id first, then by name.
    pub fn matches(&self, selector: &str) -> bool {
        self.id == selector || self.name == selector
    }
}

/// Load every profile of `kind` from `collection`.
///
/// Documents that do not have the profile shape are skipped with a warning.
pub async fn find_profiles(
    store: &dyn DocumentStore, collection: &str, kind: &str,
) -> Result<Vec<ConnectionProfile>> {
    let documents = store
        .find(collection, &json!({ "type": kind }), Some(&PROFILE_PROJECTION[..]))
        .await?;

    let mut profiles = Vec::with_capacity(documents.len());
    for document in documents {
        match serde_json::from_value::<ConnectionProfile>(document) {
            Ok(profile) => profiles.push(profile),
            Err(e) => warn!("Skipping malformed connection profile in '{}': {}", collection, e),
        }
    }

    debug!("Loaded {} connection profile(s) from '{}'", profiles.len(), collection);
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_uri_alias_is_accepted() {
        let profile: ConnectionProfile = serde_json::from_value(json!({
            "id": "p1",
            "name": "local minio",
            "type": "s3http",
            "access": {
                "endpoint_uri": "http://localhost:9000",
                "access_key": "minioadmin",
                "secret_key": "minioadmin",
                "bucket": "my-bucket"
            }
        }))
        .unwrap();

        assert_eq!(profile.access.endpoint_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(profile.kind.as_deref(), Some("s3http"));
    }

    #[test]
    fn endpoint_is_optional() {
        let profile: ConnectionProfile = serde_json::from_value(json!({
            "id": "p2",
            "name": "no endpoint",
            "access": {"access_key": "a", "secret_key": "s", "bucket": "b"}
        }))
        .unwrap();

        assert_eq!(profile.access.endpoint_url, None);
        assert_eq!(profile.kind, None);
    }

    #[test]
    fn matches_by_id_or_name() {
        let profile = ConnectionProfile {
            id: "42".to_string(),
            name: "archive".to_string(),
            kind: None,
            access: ProfileAccess {
                endpoint_url: None,
                access_key: "a".to_string(),
                secret_key: "s".to_string(),
                bucket: "b".to_string(),
            },
        };

        assert!(profile.matches("42"));
        assert!(profile.matches("archive"));
        assert!(!profile.matches("Archive"));
    }
}
