use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::Path;

use app::browse::{browse, BrowseParams};
use app::download::download;
use app::profiles::load_profiles;
use app::session::{connect, resolve_descriptor, ConnectionArgs};
use storage::FileMetadata;
use utils::app_config::AppConfig;
use utils::error::Result;

/// Profile summary printed by `profiles`; secrets are left out.
#[derive(Debug, Serialize)]
struct ProfileRow<'a> {
    id: &'a str,
    name: &'a str,
    endpoint_url: Option<&'a str>,
    bucket: &'a str,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn meta_cmd(args: &ConnectionArgs) -> Result<()> {
    let config = AppConfig::fetch()?;
    let descriptor = resolve_descriptor(args, &config).await?;
    print_json(&descriptor.meta())
}

pub async fn ls_cmd(args: &ConnectionArgs, params: &BrowseParams, long: bool) -> Result<()> {
    let config = AppConfig::fetch()?;
    let descriptor = resolve_descriptor(args, &config).await?;
    let store = connect(&descriptor).await?;

    let outcome = browse(&store, params).await?;
    let view = &outcome.view;

    let mut output = json!({
        "folders": view.folders,
        "total_keys": view.total_keys(),
        "keys": view.files,
        "download_base": outcome.download_base,
    });
    if long {
        let metadata: BTreeMap<&str, &FileMetadata> = view
            .file_metadata
            .iter()
            .map(|(key, meta)| (key.as_str(), meta))
            .collect();
        output["metadata"] = serde_json::to_value(metadata)?;
    }

    print_json(&output)
}

pub async fn get_cmd(args: &ConnectionArgs, key: &str, output: Option<&Path>) -> Result<()> {
    let config = AppConfig::fetch()?;
    let descriptor = resolve_descriptor(args, &config).await?;
    let store = connect(&descriptor).await?;

    let object = download(&store, key).await?;
    let path = object.save(output).await?;

    println!("{}", path.display());
    Ok(())
}

pub async fn profiles_cmd() -> Result<()> {
    let config = AppConfig::fetch()?;
    if !config.profiles.enabled {
        log::warn!("Saved profiles are disabled; set profiles.enabled = true to use them");
    }

    let profiles = load_profiles(&config.profiles).await?;
    let rows: Vec<ProfileRow> = profiles
        .iter()
        .map(|p| ProfileRow {
            id: &p.id,
            name: &p.name,
            endpoint_url: p.access.endpoint_url.as_deref(),
            bucket: &p.access.bucket,
        })
        .collect();

    print_json(&rows)
}
