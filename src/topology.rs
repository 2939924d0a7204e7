//! Storage topology of the host device and the cell it is published through.
//!
//! The topology changes at runtime (an SD card can be inserted or pulled), so it is never
//! captured by the resolver. A single owner publishes new values into a [`TopologyCell`] and
//! every resolver call reads whatever value is current at that moment.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StorageLayout;
use crate::error::InvalidSdSlot;

/// Physical card slot the firmware is currently running its storage from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SdSlot {
  /// Slot 1, mounted at the primary (`mmc`) root.
  #[default]
  Primary,
  /// Slot 2, mounted at the secondary (`sdcard`) root when a card is present.
  Secondary,
}

impl SdSlot {
  /// Slot number as the firmware reports it.
  pub fn number(self) -> u8 {
    match self {
      Self::Primary => 1,
      Self::Secondary => 2,
    }
  }
}

impl TryFrom<u8> for SdSlot {
  type Error = InvalidSdSlot;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      1 => Ok(Self::Primary),
      2 => Ok(Self::Secondary),
      other => Err(InvalidSdSlot(other)),
    }
  }
}

impl From<SdSlot> for u8 {
  fn from(slot: SdSlot) -> Self {
    slot.number()
  }
}

/// Snapshot of which storage the host exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageTopology {
  /// Whether the host runs the muOS firmware.
  pub is_muos: bool,
  /// Slot the firmware currently uses.
  pub current_sd: SdSlot,
  /// ROM root on the second card, present only while that card is mounted.
  pub sd2_roms_storage_path: Option<PathBuf>,
}

impl StorageTopology {
  /// Topology of a host that is not running muOS.
  pub fn off_device() -> Self {
    Self::default()
  }

  /// Topology of a muOS host.
  pub fn muos(current_sd: SdSlot, sd2_roms_storage_path: Option<PathBuf>) -> Self {
    Self {
      is_muos: true,
      current_sd,
      sd2_roms_storage_path,
    }
  }

  /// Returns `true` when a second card is mounted.
  pub fn sd2_mounted(&self) -> bool {
    self.sd2_roms_storage_path.is_some()
  }

  /// Slot whose path conventions apply.
  ///
  /// Selecting slot 2 without a mounted second card resolves to slot 1.
  pub fn effective_slot(&self) -> SdSlot {
    match self.current_sd {
      SdSlot::Secondary if self.sd2_mounted() => SdSlot::Secondary,
      _ => SdSlot::Primary,
    }
  }

  /// Inspect the host filesystem for the firmware marker and the second card.
  ///
  /// The active slot is not discoverable from the filesystem, so the caller supplies it
  /// (usually from [`crate::config::SyncConfig::current_sd`]).
  pub fn detect(layout: &StorageLayout, current_sd: SdSlot) -> Self {
    let is_muos = layout.muos_marker.exists();
    let sd2_roms = layout.sd2_root.join(&layout.roms_dir_name);
    let sd2_roms_storage_path = sd2_roms.is_dir().then_some(sd2_roms);

    debug!(
      is_muos,
      current_sd = current_sd.number(),
      sd2_mounted = sd2_roms_storage_path.is_some(),
      "detected storage topology"
    );

    Self {
      is_muos,
      current_sd,
      sd2_roms_storage_path,
    }
  }
}

/// Anything the resolver can ask for the current topology.
pub trait TopologySource {
  /// Topology as of this call.
  fn current(&self) -> Arc<StorageTopology>;
}

impl TopologySource for StorageTopology {
  fn current(&self) -> Arc<StorageTopology> {
    Arc::new(self.clone())
  }
}

impl<T: TopologySource + ?Sized> TopologySource for Arc<T> {
  fn current(&self) -> Arc<StorageTopology> {
    (**self).current()
  }
}

impl<T: TopologySource + ?Sized> TopologySource for &T {
  fn current(&self) -> Arc<StorageTopology> {
    (**self).current()
  }
}

/// Shared, atomically replaced topology value.
///
/// Publishing swaps a single `Arc`, so a reader sees either the old topology or the new one
/// in full, never a mix of fields from both.
#[derive(Debug, Default)]
pub struct TopologyCell {
  inner: RwLock<Arc<StorageTopology>>,
}

impl TopologyCell {
  /// Create a cell holding an initial topology.
  pub fn new(topology: StorageTopology) -> Self {
    Self {
      inner: RwLock::new(Arc::new(topology)),
    }
  }

  /// Replace the current topology.
  pub fn publish(&self, topology: StorageTopology) {
    let next = Arc::new(topology);
    let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
    *guard = next;
  }

  /// Current topology.
  pub fn snapshot(&self) -> Arc<StorageTopology> {
    let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(&guard)
  }
}

impl TopologySource for TopologyCell {
  fn current(&self) -> Arc<StorageTopology> {
    self.snapshot()
  }
}
