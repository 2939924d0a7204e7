//! Catalog records received from the RomM server.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::artwork::AssetKind;

/// One ROM as described by the server catalog.
///
/// Every field is optional on the wire; missing or null values take their defaults so a
/// partial record still parses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogRecord {
  /// Server identifier of the ROM.
  #[serde(deserialize_with = "null_as_default")]
  pub id: u64,
  /// Display name.
  #[serde(deserialize_with = "null_as_default")]
  pub name: String,
  /// File name on the server, including extension.
  #[serde(deserialize_with = "null_as_default")]
  pub fs_name: String,
  /// Platform the ROM belongs to.
  #[serde(deserialize_with = "null_as_default")]
  pub platform_slug: String,
  /// File extension without the dot.
  #[serde(deserialize_with = "null_as_default")]
  pub fs_extension: String,
  /// Size of the ROM file.
  #[serde(deserialize_with = "null_as_default")]
  pub fs_size_bytes: u64,
  /// Whether the ROM spans several files.
  #[serde(deserialize_with = "null_as_default")]
  pub multi: bool,
  /// Languages in the order the server lists them.
  #[serde(deserialize_with = "null_as_default")]
  pub languages: Vec<String>,
  /// Release regions.
  #[serde(deserialize_with = "null_as_default")]
  pub regions: Vec<String>,
  /// Revision label, empty or null when there is none.
  pub revision: Option<String>,
  /// Free-form tags.
  #[serde(deserialize_with = "null_as_default")]
  pub tags: Vec<String>,
  /// ScreenScraper metadata, absent when the ROM was never scraped.
  pub ss_metadata: Option<ScreenScraperMetadata>,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CatalogRecord {
  /// File name without its extension, used to name local artwork.
  ///
  /// Falls back to the display name, then to the identifier.
  pub fn rom_stem(&self) -> String {
    Path::new(&self.fs_name)
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .filter(|stem| !stem.is_empty())
      .or_else(|| (!self.name.is_empty()).then(|| self.name.clone()))
      .unwrap_or_else(|| self.id.to_string())
  }
}

/// Remote URL and server-relative path of one artwork kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSources {
  /// Absolute URL on the scraper's servers.
  pub url: Option<String>,
  /// Path relative to the RomM resources directory.
  pub path: Option<String>,
}

/// The `ss_metadata` block of a catalog record, keyed by recognised artwork kind.
///
/// Wire keys follow the `<kind>_url` / `<kind>_path` convention. Keys naming an unknown kind
/// and values that are not strings are dropped while parsing, and a block that is not an
/// object parses as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct ScreenScraperMetadata {
  sources: BTreeMap<AssetKind, AssetSources>,
}

enum SourceField {
  Url,
  Path,
}

fn split_source_key(key: &str) -> Option<(AssetKind, SourceField)> {
  let (kind, field) = if let Some(kind) = key.strip_suffix("_path") {
    (kind, SourceField::Path)
  } else if let Some(kind) = key.strip_suffix("_url") {
    (kind, SourceField::Url)
  } else {
    return None;
  };
  kind.parse().ok().map(|kind| (kind, field))
}

impl From<Value> for ScreenScraperMetadata {
  fn from(raw: Value) -> Self {
    let Value::Object(raw) = raw else {
      return Self::default();
    };
    let mut sources: BTreeMap<AssetKind, AssetSources> = BTreeMap::new();

    for (key, value) in raw {
      let Some((kind, field)) = split_source_key(&key) else {
        continue;
      };
      let Value::String(value) = value else {
        continue;
      };

      let entry = sources.entry(kind).or_default();
      match field {
        SourceField::Url => entry.url = Some(value),
        SourceField::Path => entry.path = Some(value),
      }
    }

    Self { sources }
  }
}

impl ScreenScraperMetadata {
  /// Raw sources recorded for a kind.
  pub fn sources(&self, kind: AssetKind) -> Option<&AssetSources> {
    self.sources.get(&kind)
  }

  /// Server-relative path for a kind, when present and non-empty.
  pub fn path(&self, kind: AssetKind) -> Option<&str> {
    self
      .sources(kind)
      .and_then(|sources| sources.path.as_deref())
      .filter(|path| !path.is_empty())
  }

  /// Remote URL for a kind, when present and non-empty.
  pub fn url(&self, kind: AssetKind) -> Option<&str> {
    self
      .sources(kind)
      .and_then(|sources| sources.url.as_deref())
      .filter(|url| !url.is_empty())
  }

  /// Returns `true` when no recognised key carried a string value.
  pub fn is_empty(&self) -> bool {
    self.sources.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn parses_partial_record() {
    let record: CatalogRecord = serde_json::from_value(json!({"id": 1, "name": "Test ROM"}))
      .expect("partial record should parse");

    assert_eq!(record.id, 1);
    assert!(record.ss_metadata.is_none());
    assert!(record.languages.is_empty());
  }

  #[test]
  fn null_metadata_is_absent() {
    let record: CatalogRecord =
      serde_json::from_value(json!({"id": 1, "ss_metadata": null, "revision": null}))
        .expect("null fields should parse");

    assert!(record.ss_metadata.is_none());
    assert!(record.revision.is_none());
  }

  #[test]
  fn metadata_keys_map_onto_kinds() {
    let metadata: ScreenScraperMetadata = serde_json::from_value(json!({
      "box2d_side_url": "https://example.com/side.png",
      "box2d_side_path": "roms/1/4/box2d_side/box2d_side.png",
      "box2d_path": "roms/1/4/box2d/box2d.png",
      "bezel_path": null,
      "logo_path": "",
      "unknown_path": "roms/1/4/unknown.png",
      "miximage_path": 42,
      "unrelated": "value"
    }))
    .expect("metadata should parse");

    assert_eq!(
      metadata.path(AssetKind::Box2dSide),
      Some("roms/1/4/box2d_side/box2d_side.png")
    );
    assert_eq!(
      metadata.url(AssetKind::Box2dSide),
      Some("https://example.com/side.png")
    );
    assert_eq!(metadata.path(AssetKind::Box2d), Some("roms/1/4/box2d/box2d.png"));
    assert_eq!(metadata.path(AssetKind::Bezel), None);
    assert_eq!(metadata.path(AssetKind::Logo), None);
    assert_eq!(metadata.path(AssetKind::Miximage), None);
  }

  #[test]
  fn rom_stem_drops_extension() {
    let record = CatalogRecord {
      fs_name: "Advance Wars (Europe) (En,Fr,De,Es).gba".into(),
      ..CatalogRecord::default()
    };
    assert_eq!(record.rom_stem(), "Advance Wars (Europe) (En,Fr,De,Es)");
  }

  #[test]
  fn rom_stem_falls_back_to_name_then_id() {
    let named = CatalogRecord {
      id: 9,
      name: "Tetris".into(),
      ..CatalogRecord::default()
    };
    assert_eq!(named.rom_stem(), "Tetris");

    let bare = CatalogRecord {
      id: 9,
      ..CatalogRecord::default()
    };
    assert_eq!(bare.rom_stem(), "9");
  }

  #[test]
  fn null_fields_take_defaults() {
    let record: CatalogRecord = serde_json::from_value(json!({
      "id": 7,
      "name": null,
      "fs_name": null,
      "platform_slug": "gba",
      "fs_size_bytes": null,
      "multi": null,
      "languages": null,
      "tags": null,
      "regions": null,
      "ss_metadata": {"miximage_path": "roms/1/7/miximage/miximage.png"}
    }))
    .expect("null fields should not reject the record");

    assert_eq!(record.id, 7);
    assert!(record.name.is_empty());
    assert!(record.tags.is_empty());
    assert!(record.regions.is_empty());
    assert_eq!(record.rom_stem(), "7");
    assert_eq!(
      crate::artwork::extract_manifest(&record).get(AssetKind::Miximage),
      Some("roms/1/7/miximage/miximage.png")
    );
  }

  #[test]
  fn non_object_metadata_parses_as_empty() {
    for metadata in [json!([]), json!(""), json!(3), json!(["miximage_path"])] {
      let record: CatalogRecord =
        serde_json::from_value(json!({"id": 2, "name": "Tetris", "ss_metadata": metadata}))
          .expect("malformed metadata should not reject the record");

      assert_eq!(record.name, "Tetris");
      assert!(record.ss_metadata.as_ref().is_some_and(ScreenScraperMetadata::is_empty));
      assert!(crate::artwork::extract_manifest(&record).is_empty());
    }
  }
}
