//! Client configuration describing the server and the device storage layout.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::topology::SdSlot;

/// File name looked up by [`SyncConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "romm-sync.json";

/// Discoverable client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Base URL of the RomM server, e.g. `http://192.168.1.20:8080`.
    pub host: String,
    /// Directory downloaded artwork is written under.
    pub artwork_root: PathBuf,
    /// Slot the firmware is configured to store content on.
    pub current_sd: SdSlot,
    /// Mount conventions of the device.
    pub storage: StorageLayout,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            artwork_root: "/mnt/mmc/MUOS/info/catalogue".into(),
            current_sd: SdSlot::Primary,
            storage: StorageLayout::default(),
        }
    }
}

/// Where the firmware mounts each card and how it names its directories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageLayout {
    /// Mount root of the first card.
    pub sd1_root: PathBuf,
    /// Mount root of the second card.
    pub sd2_root: PathBuf,
    /// Firmware directory on each card.
    pub firmware_dir: String,
    /// Save directory inside the firmware directory.
    pub save_dir: String,
    /// ROM directory at the root of each card.
    pub roms_dir_name: String,
    /// Path whose existence identifies a muOS host.
    pub muos_marker: PathBuf,
    /// ROM root used when the host is not running muOS.
    pub fallback_roms_root: PathBuf,
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self {
            sd1_root: "/mnt/mmc".into(),
            sd2_root: "/mnt/sdcard".into(),
            firmware_dir: "MUOS".into(),
            save_dir: "save".into(),
            roms_dir_name: "ROMS".into(),
            muos_marker: "/opt/muos".into(),
            fallback_roms_root: "roms".into(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from the provided directory.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be read or parsed is
    /// an error.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if !candidate.exists() {
            return Ok(Self::default());
        }
        Self::from_path(&candidate)
    }

    /// Read configuration from a JSON file, or YAML when the extension says so.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let config = if is_yaml {
            serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse YAML config {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse JSON config {}", path.display()))?
        };
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discover_defaults_when_file_missing() {
        let temp = tempdir().expect("failed to create temp dir");
        let config = SyncConfig::discover(temp.path()).expect("missing config is not an error");
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn discover_reads_partial_json() {
        let temp = tempdir().expect("failed to create temp dir");
        fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            r#"{"host": "http://localhost:8080", "current_sd": 2, "storage": {"sd2_root": "/media/sd2"}}"#,
        )
        .expect("failed to write config");

        let config = SyncConfig::discover(temp.path()).expect("config should load");

        assert_eq!(config.host, "http://localhost:8080");
        assert_eq!(config.current_sd, SdSlot::Secondary);
        assert_eq!(config.storage.sd2_root, PathBuf::from("/media/sd2"));
        assert_eq!(config.storage.sd1_root, PathBuf::from("/mnt/mmc"));
    }

    #[test]
    fn from_path_reads_yaml() {
        let temp = tempdir().expect("failed to create temp dir");
        let path = temp.path().join("romm-sync.yaml");
        fs::write(&path, "host: http://romm.local\nartwork_root: /tmp/art\n")
            .expect("failed to write config");

        let config = SyncConfig::from_path(&path).expect("yaml config should load");

        assert_eq!(config.host, "http://romm.local");
        assert_eq!(config.artwork_root, PathBuf::from("/tmp/art"));
    }

    #[test]
    fn rejects_malformed_config() {
        let temp = tempdir().expect("failed to create temp dir");
        fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{ not json")
            .expect("failed to write config");

        assert!(SyncConfig::discover(temp.path()).is_err());
    }

    #[test]
    fn rejects_unknown_slot_number() {
        let temp = tempdir().expect("failed to create temp dir");
        fs::write(temp.path().join(DEFAULT_CONFIG_FILE), r#"{"current_sd": 3}"#)
            .expect("failed to write config");

        assert!(SyncConfig::discover(temp.path()).is_err());
    }
}
