#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod artwork;
pub mod config;
pub mod error;
pub mod models;
pub mod resolver;
pub mod topology;
pub mod urls;

pub use artwork::{ArtworkManifest, AssetKind, extract_manifest};
pub use config::{StorageLayout, SyncConfig};
pub use error::{Error, ResolveError, UrlError};
pub use models::CatalogRecord;
pub use resolver::{FilesystemResolver, SaveKind};
pub use topology::{SdSlot, StorageTopology, TopologyCell, TopologySource};
pub use urls::build_asset_url;
