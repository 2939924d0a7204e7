use std::path::{Path, PathBuf};

use serde::Serialize;

use super::kinds::AssetKind;
use super::manifest::extract_manifest;
use crate::error::Error;
use crate::models::CatalogRecord;
use crate::resolver::validate_platform_slug;
use crate::urls::build_asset_url;

const DEFAULT_ARTWORK_EXTENSION: &str = "png";

/// One artwork file to fetch from the server and where to store it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtworkDownload {
    /// Artwork kind.
    pub kind: AssetKind,
    /// Absolute download URL.
    pub url: String,
    /// Local file the artwork should be written to.
    pub destination: PathBuf,
}

/// Produce the local file path for a piece of artwork.
///
/// Files are grouped as `<root>/<platform>/<kind>/<rom stem>.<ext>`, with the extension taken
/// from the server path and defaulting to `png`.
pub fn artwork_destination(
    artwork_root: &Path,
    platform_slug: &str,
    kind: AssetKind,
    rom_stem: &str,
    relative_path: &str,
) -> PathBuf {
    let normalised = relative_path.replace('\\', "/");
    let extension = Path::new(&normalised)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .unwrap_or(DEFAULT_ARTWORK_EXTENSION)
        .to_ascii_lowercase();

    artwork_root
        .join(platform_slug)
        .join(kind.as_str())
        .join(format!("{rom_stem}.{extension}"))
}

/// Pair every manifest entry of a record with its download URL and local destination.
///
/// Records without artwork produce an empty plan. Errors are reserved for an unusable host or
/// platform slug.
pub fn plan_artwork_downloads(
    record: &CatalogRecord,
    host: &str,
    artwork_root: &Path,
) -> Result<Vec<ArtworkDownload>, Error> {
    let manifest = extract_manifest(record);
    if manifest.is_empty() {
        return Ok(Vec::new());
    }

    let platform = validate_platform_slug(&record.platform_slug)?;
    let stem = record.rom_stem();

    manifest
        .iter()
        .map(|(kind, relative_path)| -> Result<ArtworkDownload, Error> {
            Ok(ArtworkDownload {
                kind,
                url: build_asset_url(host, relative_path)?,
                destination: artwork_destination(artwork_root, platform, kind, &stem, relative_path),
            })
        })
        .collect()
}
