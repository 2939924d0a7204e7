//! Artwork discovery for catalog records.
//!
//! Responsibilities are split the same way the data flows: [`AssetKind`] fixes the closed
//! set of artwork categories, the manifest step keeps the kinds that have a server-relative
//! path, and the plan step pairs each of those with a download URL and a local destination.

mod filters;
mod kinds;
mod manifest;
mod plan;

pub use filters::is_remote_url;
pub use kinds::{AssetKind, UnknownAssetKind};
pub use manifest::{ArtworkManifest, extract_manifest, remote_artwork_urls};
pub use plan::{ArtworkDownload, artwork_destination, plan_artwork_downloads};
