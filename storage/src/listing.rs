//! Folder/file view over a flat object key space.
//!
//! Object stores only know keys. "Folders" come from the common prefixes the
//! store reports for a `/` delimiter, "files" from the raw key listing. The
//! [`Flattener`] reconciles the two: it strips the requested prefix, skips
//! directory markers and removes keys that are also reported as folders.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// The only delimiter used to group keys into folders.
pub const DELIMITER: &str = "/";

/// One raw key as returned by a listing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub key: String,
    pub size: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub is_common_prefix: bool,
}

impl ListingEntry {
    pub fn object(
        key: impl Into<String>, size: Option<u64>, last_modified: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified,
            is_common_prefix: false,
        }
    }

    pub fn common_prefix(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size: None,
            last_modified: None,
            is_common_prefix: true,
        }
    }

    /// Zero-byte keys ending in the delimiter stand for (empty) folders.
    pub fn is_directory_marker(&self) -> bool {
        self.key.ends_with(DELIMITER)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Only report folders; the key listing is not consulted.
    pub only_folders: bool,
    /// Report files by their full key instead of relative to the prefix.
    pub full_path: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    pub path: String,
    pub size: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlattenedView {
    pub folders: BTreeSet<String>,
    pub files: BTreeSet<String>,
    /// Keyed by the original object key.
    pub file_metadata: BTreeMap<String, FileMetadata>,
}

impl FlattenedView {
    pub fn total_keys(&self) -> usize {
        self.files.len()
    }
}

/// Accumulates common prefixes and listing pages into a [`FlattenedView`].
///
/// Nothing is produced until [`Flattener::finish`], so every page has to be
/// pushed before the view exists.
#[derive(Debug)]
pub struct Flattener {
    prefix: String,
    options: FlattenOptions,
    view: FlattenedView,
}

impl Flattener {
    pub fn new(prefix: impl Into<String>, options: FlattenOptions) -> Self {
        Self {
            prefix: prefix.into(),
            options,
            view: FlattenedView::default(),
        }
    }

    pub fn options(&self) -> FlattenOptions {
        self.options
    }

    pub fn add_common_prefixes<I, S>(&mut self, common_prefixes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for common_prefix in common_prefixes {
            self.add_folder(common_prefix.as_ref());
        }
    }

    pub fn push_page<I>(&mut self, page: I)
    where
        I: IntoIterator<Item = ListingEntry>,
    {
        if self.options.only_folders {
            return;
        }

        for entry in page {
            if entry.is_common_prefix {
                self.add_folder(&entry.key);
                continue;
            }
            if entry.is_directory_marker() {
                continue;
            }

            let display_path = if self.options.full_path {
                entry.key.clone()
            } else {
                let relative = self.strip_prefix(&entry.key);
                // 分页列举不带分隔符，更深层的键不属于当前目录
                if relative.contains(DELIMITER) {
                    continue;
                }
                relative.to_string()
            };

            if display_path.is_empty() {
                continue;
            }

            self.view.files.insert(display_path.clone());
            self.view.file_metadata.insert(
                entry.key,
                FileMetadata {
                    path: display_path,
                    size: entry.size,
                    last_modified: entry.last_modified,
                },
            );
        }
    }

    pub fn finish(self) -> FlattenedView {
        let mut view = self.view;

        let folders = &view.folders;
        view.files.retain(|file| !folders.contains(file));

        let files = &view.files;
        view.file_metadata.retain(|_, meta| files.contains(&meta.path));

        view
    }

    fn add_folder(&mut self, common_prefix: &str) {
        let folder = self.strip_prefix(common_prefix).to_string();
        if !folder.is_empty() {
            self.view.folders.insert(folder);
        }
    }

    fn strip_prefix<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(self.prefix.as_str()).unwrap_or(key)
    }
}

/// Flatten a complete listing in one call.
///
/// `pages` is drained to the end unless `options.only_folders` is set, in
/// which case it is never touched.
pub fn flatten<C, S, P, E>(
    prefix: &str, common_prefixes: C, pages: P, options: FlattenOptions,
) -> FlattenedView
where
    C: IntoIterator<Item = S>,
    S: AsRef<str>,
    P: IntoIterator<Item = E>,
    E: IntoIterator<Item = ListingEntry>,
{
    let mut flattener = Flattener::new(prefix, options);
    flattener.add_common_prefixes(common_prefixes);

    if !options.only_folders {
        for page in pages {
            flattener.push_page(page);
        }
    }

    flattener.finish()
}

/// Prefix to pre-fill for a follow-up object lookup: the listed prefix for
/// relative file names, nothing when files are already full keys.
pub fn download_base_path(prefix: &str, options: FlattenOptions) -> String {
    if options.full_path {
        String::new()
    } else {
        prefix.to_string()
    }
}
