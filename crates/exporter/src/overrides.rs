//! Staging of override files and directories
//!
//! Copies user-selected files and directories from the instance into the
//! workspace's overrides area, preserving their placement relative to the
//! instance directory.

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::{ExportError, FileOperation, Result};
use crate::fsops;

/// Stage the requested override paths under `staging_dir`.
///
/// The staging directory is created even when nothing was requested, so
/// the overrides entry downstream is always well-formed. Paths are
/// processed in caller order with no deduplication; overlapping requests
/// copy redundantly but are not an error. A missing source is fatal.
pub async fn stage(instance_dir: &Path, requested: &[PathBuf], staging_dir: &Path) -> Result<()> {
    fs::create_dir_all(staging_dir)
        .await
        .map_err(|e| ExportError::io(FileOperation::CreateDir, staging_dir, e))?;

    for relative in requested {
        assert_relative(relative)?;
        let src = instance_dir.join(relative);
        let dst = staging_dir.join(relative);
        fsops::assert_exists(&src)?;

        let meta = fs::metadata(&src)
            .await
            .map_err(|e| ExportError::io(FileOperation::Read, &src, e))?;
        if meta.is_dir() {
            fsops::copy_dir_recursive(&src, &dst).await?;
        } else {
            fsops::copy_file(&src, &dst).await?;
        }
        debug!("staged override {}", relative.display());
    }
    Ok(())
}

/// Requested paths are scoped to the instance directory. An absolute path
/// or one that climbs out with `..` would make the joins below escape the
/// instance and the staging area.
fn assert_relative(path: &Path) -> Result<()> {
    let contained = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if contained {
        Ok(())
    } else {
        Err(ExportError::Configuration {
            message: format!(
                "override path '{}' must be relative to the instance directory",
                path.display()
            ),
        })
    }
}
