use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;
use tracing::debug;

use super::filters::is_remote_url;
use super::kinds::AssetKind;
use crate::models::CatalogRecord;

/// Artwork available on the server for one ROM, as server-relative paths.
///
/// Iteration follows the canonical [`AssetKind`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArtworkManifest {
    entries: BTreeMap<AssetKind, String>,
}

impl ArtworkManifest {
    /// Server-relative path recorded for a kind.
    pub fn get(&self, kind: AssetKind) -> Option<&str> {
        self.entries.get(&kind).map(String::as_str)
    }

    /// Returns `true` when the kind has a path.
    pub fn contains(&self, kind: AssetKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Number of kinds with a path.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no artwork is available.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Kinds and paths in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetKind, &str)> {
        self.entries.iter().map(|(kind, path)| (*kind, path.as_str()))
    }
}

impl IntoIterator for ArtworkManifest {
    type Item = (AssetKind, String);
    type IntoIter = btree_map::IntoIter<AssetKind, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(AssetKind, String)> for ArtworkManifest {
    fn from_iter<I: IntoIterator<Item = (AssetKind, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Collect the artwork a record has stored on the server.
///
/// A kind is included only when its `_path` field is a non-empty string; a `_url` sibling
/// alone does not count. Records without `ss_metadata` produce an empty manifest.
pub fn extract_manifest(record: &CatalogRecord) -> ArtworkManifest {
    let Some(metadata) = record.ss_metadata.as_ref() else {
        debug!(rom_id = record.id, "record has no ss_metadata");
        return ArtworkManifest::default();
    };

    let manifest: ArtworkManifest = AssetKind::ALL
        .into_iter()
        .filter_map(|kind| metadata.path(kind).map(|path| (kind, path.to_string())))
        .collect();

    debug!(
        rom_id = record.id,
        kinds = manifest.len(),
        "extracted artwork manifest"
    );
    manifest
}

/// Scraper URLs of a record that can be fetched directly, keyed by kind.
pub fn remote_artwork_urls(record: &CatalogRecord) -> BTreeMap<AssetKind, String> {
    let Some(metadata) = record.ss_metadata.as_ref() else {
        return BTreeMap::new();
    };

    AssetKind::ALL
        .into_iter()
        .filter_map(|kind| {
            metadata
                .url(kind)
                .filter(|url| is_remote_url(url))
                .map(|url| (kind, url.to_string()))
        })
        .collect()
}
