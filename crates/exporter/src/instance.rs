//! Read-only model of a CurseForge Minecraft instance
//!
//! The instance description is produced by the external manager application
//! and consumed here as-is. Only the fields the exporter needs are modelled;
//! everything else in the file is ignored.

use std::path::Path;

use serde::Deserialize;
use tokio::fs;
use tracing::debug;

use crate::error::{ExportError, Result};

/// File name of the instance description inside the instance directory.
pub const INSTANCE_FILENAME: &str = "minecraftinstance.json";

/// Raw instance description as it appears in `minecraftinstance.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct MinecraftInstance {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "gameVersion")]
    pub game_version: String,
    #[serde(rename = "baseModLoader")]
    pub base_mod_loader: BaseModLoader,
    #[serde(rename = "installedAddons", default)]
    pub installed_addons: Vec<InstalledAddon>,
}

/// Mod loader the instance was installed with.
#[derive(Debug, Clone, Deserialize)]
pub struct BaseModLoader {
    pub name: String,
}

/// One installed addon entry.
///
/// No uniqueness is enforced on `addon_id` and file ids are taken verbatim;
/// duplicates and odd values pass through unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledAddon {
    #[serde(rename = "addonID")]
    pub addon_id: i64,
    #[serde(rename = "installedFile")]
    pub installed_file: InstalledFile,
}

/// The specific file (version) of an installed addon.
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledFile {
    pub id: i64,
    #[serde(rename = "downloadUrl", default)]
    pub download_url: Option<String>,
}

impl MinecraftInstance {
    /// Load `minecraftinstance.json` from an instance directory.
    pub async fn load(instance_dir: &Path) -> Result<Self> {
        let path = instance_dir.join(INSTANCE_FILENAME);
        if !path.exists() {
            return Err(ExportError::not_found(&path));
        }

        let bytes = fs::read(&path).await.map_err(|e| ExportError::InstanceLoad {
            path: path.clone(),
            source: e.into(),
        })?;
        let instance: MinecraftInstance =
            serde_json::from_slice(&bytes).map_err(|e| ExportError::InstanceLoad {
                path: path.clone(),
                source: e.into(),
            })?;

        debug!(
            "loaded instance '{}' ({} addons) from {}",
            instance.name,
            instance.installed_addons.len(),
            path.display()
        );
        Ok(instance)
    }
}
