//! Final placement of artifacts into the working directory
//!
//! Every target goes through the same existence check before anything is
//! written. Outputs already placed before a later failure are not rolled
//! back.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::fsops;
use crate::manifest::MANIFEST_FILENAME;

/// Move the built archive from the workspace into `out_dir`.
///
/// A pre-existing target without `force` is fatal before any mutation.
pub async fn finalize_archive(
    archive_path: &Path,
    archive_name: &str,
    out_dir: &Path,
    force: bool,
) -> Result<PathBuf> {
    let target = out_dir.join(archive_name);
    fsops::assert_not_exists(&target, force)?;

    fsops::move_file(archive_path, &target).await?;
    info!("wrote {}", target.display());
    Ok(target)
}

/// Copy the manifest and the staged overrides tree into `out_dir`.
///
/// Both targets are checked for collisions before either is written.
pub async fn finalize_directory(
    manifest_path: &Path,
    overrides_dir: &Path,
    overrides_name: &str,
    out_dir: &Path,
    force: bool,
) -> Result<()> {
    let manifest_target = out_dir.join(MANIFEST_FILENAME);
    let overrides_target = out_dir.join(overrides_name);
    fsops::assert_not_exists(&manifest_target, force)?;
    fsops::assert_not_exists(&overrides_target, force)?;

    fsops::copy_file(manifest_path, &manifest_target).await?;
    fsops::copy_dir_recursive(overrides_dir, &overrides_target).await?;
    info!("wrote {}", manifest_target.display());
    info!("wrote {}", overrides_target.display());
    Ok(())
}

/// Copy the optional download-URL file into `out_dir` under the same
/// overwrite rules as the other artifacts.
pub async fn finalize_downloads(
    staged_path: &Path,
    file_name: &str,
    out_dir: &Path,
    force: bool,
) -> Result<PathBuf> {
    let target = out_dir.join(file_name);
    fsops::assert_not_exists(&target, force)?;

    fsops::copy_file(staged_path, &target).await?;
    info!("wrote {}", target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use tempfile::tempdir;

    #[tokio::test]
    async fn archive_target_collision_fails_before_moving() {
        let dir = tempdir().unwrap();
        let staged = dir.path().join("staged.zip");
        tokio::fs::write(&staged, "new").await.unwrap();

        let out_dir = dir.path().join("out");
        tokio::fs::create_dir_all(&out_dir).await.unwrap();
        tokio::fs::write(out_dir.join("pack-1.0.zip"), "old").await.unwrap();

        let err = finalize_archive(&staged, "pack-1.0.zip", &out_dir, false)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::OutputExists { .. }));
        // Nothing was mutated: the old target and the staged source remain.
        assert_eq!(
            tokio::fs::read_to_string(out_dir.join("pack-1.0.zip")).await.unwrap(),
            "old"
        );
        assert!(staged.exists());
    }

    #[tokio::test]
    async fn archive_force_replaces_the_target() {
        let dir = tempdir().unwrap();
        let staged = dir.path().join("staged.zip");
        tokio::fs::write(&staged, "new").await.unwrap();

        let out_dir = dir.path().join("out");
        tokio::fs::create_dir_all(&out_dir).await.unwrap();
        tokio::fs::write(out_dir.join("pack-1.0.zip"), "old").await.unwrap();

        let target = finalize_archive(&staged, "pack-1.0.zip", &out_dir, true)
            .await
            .unwrap();
        assert_eq!(tokio::fs::read_to_string(&target).await.unwrap(), "new");
        assert!(!staged.exists());
    }

    #[tokio::test]
    async fn directory_mode_checks_both_targets_before_writing() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("manifest.json");
        tokio::fs::write(&manifest, "{}").await.unwrap();
        let overrides = dir.path().join("overrides");
        tokio::fs::create_dir_all(&overrides).await.unwrap();

        let out_dir = dir.path().join("out");
        // Collision on the overrides name only; the manifest must not be
        // copied either.
        tokio::fs::create_dir_all(out_dir.join("overrides")).await.unwrap();

        let err = finalize_directory(&manifest, &overrides, "overrides", &out_dir, false)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::OutputExists { .. }));
        assert!(!out_dir.join(MANIFEST_FILENAME).exists());
    }

    #[tokio::test]
    async fn directory_mode_copies_manifest_and_tree() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("manifest.json");
        tokio::fs::write(&manifest, "{}").await.unwrap();
        let overrides = dir.path().join("overrides");
        tokio::fs::create_dir_all(overrides.join("config")).await.unwrap();
        tokio::fs::write(overrides.join("config/a.cfg"), "a").await.unwrap();

        let out_dir = dir.path().join("out");
        tokio::fs::create_dir_all(&out_dir).await.unwrap();

        finalize_directory(&manifest, &overrides, "overrides", &out_dir, false)
            .await
            .unwrap();
        assert!(out_dir.join("manifest.json").is_file());
        assert!(out_dir.join("overrides/config/a.cfg").is_file());
        // Copy, not move: the staged inputs survive.
        assert!(manifest.exists());
        assert!(overrides.join("config/a.cfg").exists());
    }
}
