//! Resolution of save and ROM locations for the current storage topology.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::StorageLayout;
use crate::error::ResolveError;
use crate::topology::{SdSlot, StorageTopology, TopologySource};

/// Kind of save artifact, each kept in its own directory under the save base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveKind {
    /// In-game battery or memory card saves.
    File,
    /// Emulator save states.
    State,
}

impl SaveKind {
    /// Directory name under the save base.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::State => "state",
        }
    }
}

/// Every location the resolver knows for one platform, taken from a single topology
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformPaths {
    /// Platform the paths were resolved for.
    pub platform: String,
    /// Save base directory, absent off device.
    pub save_base: Option<PathBuf>,
    /// Save file directory, absent off device.
    pub save_file: Option<PathBuf>,
    /// Save state directory, absent off device.
    pub save_state: Option<PathBuf>,
    /// ROM directory for the platform.
    pub roms: PathBuf,
}

/// Maps platform identifiers onto device paths.
///
/// The resolver holds no topology of its own. Each call asks its [`TopologySource`] for the
/// current value, so card changes published between calls are picked up immediately.
#[derive(Debug, Clone)]
pub struct FilesystemResolver<S> {
    layout: StorageLayout,
    topology: S,
}

impl<S: TopologySource> FilesystemResolver<S> {
    /// Create a resolver for a storage layout and a topology source.
    pub fn new(layout: StorageLayout, topology: S) -> Self {
        Self { layout, topology }
    }

    /// Storage layout the resolver applies.
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Base directory of all saves, or `None` when the host is not running muOS.
    pub fn save_base_path(&self) -> Option<PathBuf> {
        let topology = self.current_topology();
        self.save_base_for(&topology)
    }

    /// Directory holding save files for a platform.
    pub fn save_file_path(&self, platform_slug: &str) -> Result<Option<PathBuf>, ResolveError> {
        self.save_path(platform_slug, SaveKind::File)
    }

    /// Directory holding save states for a platform.
    pub fn save_state_path(&self, platform_slug: &str) -> Result<Option<PathBuf>, ResolveError> {
        self.save_path(platform_slug, SaveKind::State)
    }

    /// Directory holding saves of the given kind for a platform.
    ///
    /// The slug is validated before the topology is consulted, so a malformed slug is
    /// reported on every host.
    pub fn save_path(
        &self,
        platform_slug: &str,
        kind: SaveKind,
    ) -> Result<Option<PathBuf>, ResolveError> {
        let platform = validate_platform_slug(platform_slug)?;
        let topology = self.current_topology();
        Ok(self.save_dir_for(&topology, platform, kind))
    }

    /// ROM root of the active card, or the configured fallback off device.
    pub fn roms_storage_path(&self) -> PathBuf {
        let topology = self.current_topology();
        self.roms_root_for(&topology)
    }

    /// ROM directory for a platform.
    pub fn platform_roms_path(&self, platform_slug: &str) -> Result<PathBuf, ResolveError> {
        let platform = validate_platform_slug(platform_slug)?;
        Ok(self.roms_storage_path().join(platform))
    }

    /// Resolve every location for a platform against one topology snapshot.
    pub fn platform_paths(&self, platform_slug: &str) -> Result<PlatformPaths, ResolveError> {
        let platform = validate_platform_slug(platform_slug)?;
        let topology = self.current_topology();

        Ok(PlatformPaths {
            platform: platform.to_string(),
            save_base: self.save_base_for(&topology),
            save_file: self.save_dir_for(&topology, platform, SaveKind::File),
            save_state: self.save_dir_for(&topology, platform, SaveKind::State),
            roms: self.roms_root_for(&topology).join(platform),
        })
    }

    fn save_dir_for(
        &self,
        topology: &StorageTopology,
        platform: &str,
        kind: SaveKind,
    ) -> Option<PathBuf> {
        let path = self
            .save_base_for(topology)?
            .join(kind.dir_name())
            .join(platform);
        debug!(platform, kind = kind.dir_name(), path = %path.display(), "resolved save path");
        Some(path)
    }

    fn save_base_for(&self, topology: &StorageTopology) -> Option<PathBuf> {
        if !topology.is_muos {
            return None;
        }

        Some(
            self.card_root(topology)
                .join(&self.layout.firmware_dir)
                .join(&self.layout.save_dir),
        )
    }

    fn roms_root_for(&self, topology: &StorageTopology) -> PathBuf {
        if !topology.is_muos {
            return self.layout.fallback_roms_root.clone();
        }

        match (topology.effective_slot(), &topology.sd2_roms_storage_path) {
            (SdSlot::Secondary, Some(path)) => path.clone(),
            _ => self.card_root(topology).join(&self.layout.roms_dir_name),
        }
    }

    /// Read the topology once for a request, reporting the SD2 fallback at most once.
    fn current_topology(&self) -> Arc<StorageTopology> {
        let topology = self.topology.current();
        if topology.is_muos && topology.effective_slot() != topology.current_sd {
            warn!(
                fallback = %self.layout.sd1_root.display(),
                "SD2 selected but no second card is mounted, using SD1"
            );
        }
        topology
    }

    fn card_root(&self, topology: &StorageTopology) -> &Path {
        match topology.effective_slot() {
            SdSlot::Secondary => &self.layout.sd2_root,
            SdSlot::Primary => &self.layout.sd1_root,
        }
    }
}

fn platform_slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("invalid platform slug regex")
    })
}

/// Check that a platform slug can be used as a single directory name.
pub fn validate_platform_slug(platform_slug: &str) -> Result<&str, ResolveError> {
    if platform_slug_pattern().is_match(platform_slug) {
        Ok(platform_slug)
    } else {
        Err(ResolveError::InvalidPlatform(platform_slug.to_string()))
    }
}
