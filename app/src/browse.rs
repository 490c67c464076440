//! 目录浏览 - 将键空间展开为“文件夹 + 文件”的单层视图

use log::{debug, info};
use serde::Serialize;
use storage::{download_base_path, FlattenOptions, FlattenedView, Flattener, ObjectStore, DELIMITER};

use crate::error::Result;
use crate::session::close_after;

#[derive(Debug, Clone, Default)]
pub struct BrowseParams {
    pub prefix: String,
    pub only_folders: bool,
    pub full_path: bool,
}

impl BrowseParams {
    pub fn options(&self) -> FlattenOptions {
        FlattenOptions {
            only_folders: self.only_folders,
            full_path: self.full_path,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BrowseOutcome {
    pub view: FlattenedView,
    /// Prefix a follow-up download should start from
    pub download_base: String,
}

/// List one level of the bucket under `params.prefix`.
///
/// The store is closed afterwards whether or not listing succeeded.
pub async fn browse(store: &dyn ObjectStore, params: &BrowseParams) -> Result<BrowseOutcome> {
    let result = list_level(store, params).await;
    close_after(store, result).await
}

async fn list_level(store: &dyn ObjectStore, params: &BrowseParams) -> Result<BrowseOutcome> {
    let options = params.options();
    let mut flattener = Flattener::new(params.prefix.as_str(), options);

    let common_prefixes = store.list_common_prefixes(&params.prefix, DELIMITER).await?;
    debug!("{} common prefix(es) under '{}'", common_prefixes.len(), params.prefix);
    flattener.add_common_prefixes(common_prefixes);

    if !options.only_folders {
        let pages = store.list_pages(&params.prefix).await?;
        debug!("{} listing page(s) under '{}'", pages.len(), params.prefix);
        for page in pages {
            flattener.push_page(page);
        }
    }

    let view = flattener.finish();
    info!(
        "Listed '{}' in bucket '{}': {} folder(s), {} file(s)",
        params.prefix,
        store.bucket(),
        view.folders.len(),
        view.files.len()
    );

    Ok(BrowseOutcome {
        download_base: download_base_path(&params.prefix, options),
        view,
    })
}
