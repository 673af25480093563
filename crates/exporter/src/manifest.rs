//! CurseForge modpack manifest
//!
//! The output entity of an export: metadata plus the ordered list of
//! required project/file pairs, serialized as `manifest.json`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fsops;
use crate::instance::MinecraftInstance;

/// Fixed name of the manifest inside the archive and the output directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

const MANIFEST_TYPE: &str = "minecraftModpack";
const MANIFEST_VERSION: u32 = 1;
const DEFAULT_OVERRIDES_DIR: &str = "overrides";

/// Canonical modpack manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub minecraft: MinecraftMeta,
    #[serde(rename = "manifestType")]
    pub manifest_type: String,
    #[serde(rename = "manifestVersion")]
    pub manifest_version: u32,
    pub name: String,
    pub version: String,
    pub author: String,
    pub files: Vec<FileEntry>,
    pub overrides: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinecraftMeta {
    pub version: String,
    #[serde(rename = "modLoaders")]
    pub mod_loaders: Vec<ModLoader>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModLoader {
    pub id: String,
    pub primary: bool,
}

/// One required addon/file pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "projectID")]
    pub project_id: i64,
    #[serde(rename = "fileID")]
    pub file_id: i64,
    pub required: bool,
}

impl Manifest {
    /// Build a manifest from an instance description and caller-supplied
    /// author and version.
    ///
    /// The file list is sorted ascending by project ID with a stable sort,
    /// so entries sharing a project ID keep their input order. The ordering
    /// is part of the output format: downstream tools diff manifests.
    pub fn build(instance: &MinecraftInstance, author: &str, version: &str) -> Self {
        let mut files: Vec<FileEntry> = instance
            .installed_addons
            .iter()
            .map(|addon| FileEntry {
                project_id: addon.addon_id,
                file_id: addon.installed_file.id,
                required: true,
            })
            .collect();
        files.sort_by_key(|entry| entry.project_id);

        Manifest {
            minecraft: MinecraftMeta {
                version: instance.game_version.clone(),
                mod_loaders: vec![ModLoader {
                    id: instance.base_mod_loader.name.clone(),
                    primary: true,
                }],
            },
            manifest_type: MANIFEST_TYPE.to_string(),
            manifest_version: MANIFEST_VERSION,
            name: instance.name.clone(),
            version: version.to_string(),
            author: author.to_string(),
            files,
            overrides: DEFAULT_OVERRIDES_DIR.to_string(),
        }
    }

    /// Serialize as pretty JSON. Fails on an existing target unless `force`.
    pub async fn write(&self, path: &Path, force: bool) -> Result<()> {
        fsops::write_pretty_json(self, path, force).await
    }

    /// Name of the archive artifact derived from manifest metadata.
    pub fn archive_filename(&self) -> String {
        format!("{}-{}.zip", self.name, self.version)
    }
}
