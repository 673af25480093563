//! Centralized filesystem helpers
//!
//! Shared path assertions, JSON output writing, and copy/move primitives so
//! the staging and finalization stages behave consistently.

use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{ExportError, FileOperation, Result};

/// Fail with the offending path when a required source is missing.
pub(crate) fn assert_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ExportError::not_found(path))
    }
}

/// Overwrite protection: an existing target is fatal unless `force` is set.
pub(crate) fn assert_not_exists(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        Err(ExportError::OutputExists {
            path: path.to_path_buf(),
        })
    } else {
        Ok(())
    }
}

/// Write a value as pretty-printed JSON.
///
/// Create-new semantics by default; `force` switches to create-or-truncate.
pub(crate) async fn write_pretty_json<T: Serialize>(
    value: &T,
    path: &Path,
    force: bool,
) -> Result<()> {
    let body = serde_json::to_string_pretty(value).map_err(|e| ExportError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut open = fs::OpenOptions::new();
    open.write(true);
    if force {
        open.create(true).truncate(true);
    } else {
        open.create_new(true);
    }

    let mut file = open.open(path).await.map_err(|e| {
        if e.kind() == ErrorKind::AlreadyExists {
            ExportError::OutputExists {
                path: path.to_path_buf(),
            }
        } else {
            ExportError::io(FileOperation::Write, path, e)
        }
    })?;
    file.write_all(body.as_bytes())
        .await
        .map_err(|e| ExportError::io(FileOperation::Write, path, e))?;
    file.flush()
        .await
        .map_err(|e| ExportError::io(FileOperation::Write, path, e))?;

    debug!("wrote {} ({} bytes)", path.display(), body.len());
    Ok(())
}

/// Copy a single file, creating the destination's parent directories.
pub(crate) async fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ExportError::io(FileOperation::CreateDir, parent, e))?;
    }
    fs::copy(src, dst)
        .await
        .map_err(|e| ExportError::io(FileOperation::Copy, src, e))?;
    debug!("copied {} to {}", src.display(), dst.display());
    Ok(())
}

/// Recursively copy a directory tree, preserving structure.
///
/// Entries are copied sequentially; the dominant cost is I/O, not CPU.
pub(crate) async fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    let mut pending = vec![(src.to_path_buf(), dst.to_path_buf())];

    while let Some((from, to)) = pending.pop() {
        fs::create_dir_all(&to)
            .await
            .map_err(|e| ExportError::io(FileOperation::CreateDir, &to, e))?;

        let mut entries = fs::read_dir(&from)
            .await
            .map_err(|e| ExportError::io(FileOperation::Read, &from, e))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ExportError::io(FileOperation::Read, &from, e))?
        {
            let source = entry.path();
            let target = to.join(entry.file_name());
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| ExportError::io(FileOperation::Read, &source, e))?;

            if file_type.is_dir() {
                pending.push((source, target));
            } else {
                fs::copy(&source, &target)
                    .await
                    .map_err(|e| ExportError::io(FileOperation::Copy, &source, e))?;
                debug!("copied {} to {}", source.display(), target.display());
            }
        }
    }
    Ok(())
}

/// Move a file into place, falling back to copy-and-remove when the
/// workspace and the target sit on different filesystems.
pub(crate) async fn move_file(src: &Path, dst: &Path) -> Result<()> {
    match fs::rename(src, dst).await {
        Ok(()) => {
            debug!("moved {} to {}", src.display(), dst.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            fs::copy(src, dst)
                .await
                .map_err(|e| ExportError::io(FileOperation::Copy, src, e))?;
            fs::remove_file(src)
                .await
                .map_err(|e| ExportError::io(FileOperation::Remove, src, e))?;
            debug!("moved {} to {} (copy fallback)", src.display(), dst.display());
            Ok(())
        }
        Err(e) => Err(ExportError::io(FileOperation::Rename, src, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Sample {
        key: String,
    }

    #[tokio::test]
    async fn write_pretty_json_refuses_existing_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let value = Sample { key: "v".into() };

        write_pretty_json(&value, &path, false).await.unwrap();
        let err = write_pretty_json(&value, &path, false).await.unwrap_err();
        assert!(matches!(err, ExportError::OutputExists { .. }));
    }

    #[tokio::test]
    async fn write_pretty_json_force_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");

        tokio::fs::write(&path, "something much longer than the replacement")
            .await
            .unwrap();
        let value = Sample { key: "v".into() };
        write_pretty_json(&value, &path, true).await.unwrap();

        let body = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: Sample = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, value);
    }

    #[tokio::test]
    async fn move_file_reports_a_failed_rename_as_such() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.zip");
        let target = dir.path().join("target.zip");

        let err = move_file(&missing, &target).await.unwrap_err();
        match err {
            ExportError::FileSystem { operation, path, .. } => {
                assert_eq!(operation, FileOperation::Rename);
                assert_eq!(path, missing);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn copy_dir_recursive_preserves_structure() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        tokio::fs::create_dir_all(src.join("nested/deep")).await.unwrap();
        tokio::fs::write(src.join("top.txt"), "top").await.unwrap();
        tokio::fs::write(src.join("nested/deep/leaf.txt"), "leaf")
            .await
            .unwrap();
        tokio::fs::create_dir_all(src.join("empty")).await.unwrap();

        let dst = dir.path().join("dst");
        copy_dir_recursive(&src, &dst).await.unwrap();

        assert_eq!(tokio::fs::read_to_string(dst.join("top.txt")).await.unwrap(), "top");
        assert_eq!(
            tokio::fs::read_to_string(dst.join("nested/deep/leaf.txt")).await.unwrap(),
            "leaf"
        );
        assert!(dst.join("empty").is_dir());
    }
}
