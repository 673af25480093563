//! Optional download-URL metadata artifact
//!
//! A flat list of direct download URLs, one per installed addon, ordered the
//! same way as the manifest's file list so the two artifacts stay
//! cross-referenceable by position.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::fsops;
use crate::instance::MinecraftInstance;

/// Fixed name of the download-URL artifact.
pub const DOWNLOADS_FILENAME: &str = "curse-downloads.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadList {
    #[serde(rename = "minecraftVersion")]
    pub minecraft_version: String,
    pub downloads: Vec<DownloadMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadMeta {
    #[serde(rename = "projectId")]
    pub project_id: i64,
    #[serde(rename = "fileId")]
    pub file_id: i64,
    pub url: String,
}

impl DownloadList {
    /// Build the list with the same stable sort-by-project-ID rule as the
    /// manifest. Addons whose installed file carries no URL are skipped
    /// with a warning.
    pub fn build(instance: &MinecraftInstance) -> Self {
        let mut addons: Vec<_> = instance.installed_addons.iter().collect();
        addons.sort_by_key(|addon| addon.addon_id);

        let downloads = addons
            .into_iter()
            .filter_map(|addon| match &addon.installed_file.download_url {
                Some(url) => Some(DownloadMeta {
                    project_id: addon.addon_id,
                    file_id: addon.installed_file.id,
                    url: url.clone(),
                }),
                None => {
                    warn!(
                        "no download url for projectID {} fileID {}, skipping",
                        addon.addon_id, addon.installed_file.id
                    );
                    None
                }
            })
            .collect();

        DownloadList {
            minecraft_version: instance.game_version.clone(),
            downloads,
        }
    }

    /// Serialize as pretty JSON with the same overwrite semantics as the
    /// manifest.
    pub async fn write(&self, path: &Path, force: bool) -> Result<()> {
        fsops::write_pretty_json(self, path, force).await
    }
}
