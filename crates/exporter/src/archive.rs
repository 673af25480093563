//! ZIP archive assembly
//!
//! Streams the staged manifest and overrides tree into a single compressed
//! archive inside the workspace.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ExportError, FileOperation, Result};
use crate::manifest::MANIFEST_FILENAME;

/// Build the archive at `out_path`.
///
/// The manifest lands at the archive root as `manifest.json`. When
/// overrides were requested, the whole staged tree is added under
/// `overrides_name`; otherwise a single explicit directory entry is written
/// for it, since the ZIP format has no implicit empty directories.
///
/// A staged entry that vanishes between staging and streaming is logged as
/// a warning and skipped; any other streaming failure aborts the build.
pub async fn build(
    manifest_path: &Path,
    overrides_dir: &Path,
    overrides_requested: bool,
    overrides_name: &str,
    out_path: &Path,
) -> Result<()> {
    let file = File::create(out_path)
        .map_err(|e| ExportError::io(FileOperation::Write, out_path, e))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    append_file(&mut writer, manifest_path, MANIFEST_FILENAME, options, out_path)?;

    if overrides_requested {
        append_tree(&mut writer, overrides_dir, overrides_name, options, out_path)?;
    } else {
        writer
            .add_directory(overrides_name, options)
            .map_err(|e| archive_error(out_path, e))?;
    }

    // Flushes the central directory; the archive is not valid before this.
    writer.finish().map_err(|e| archive_error(out_path, e))?;
    debug!("archive built at {}", out_path.display());
    Ok(())
}

fn archive_error<E>(out_path: &Path, source: E) -> ExportError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ExportError::Archive {
        path: out_path.to_path_buf(),
        source: Box::new(source),
    }
}

/// Stream one file into the archive under `entry_name`.
///
/// Tolerates a source that no longer exists (warn and skip).
fn append_file(
    writer: &mut ZipWriter<File>,
    source: &Path,
    entry_name: &str,
    options: SimpleFileOptions,
    out_path: &Path,
) -> Result<()> {
    let mut file = match File::open(source) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("{} vanished while streaming, skipping", source.display());
            return Ok(());
        }
        Err(e) => return Err(ExportError::io(FileOperation::Read, source, e)),
    };

    writer
        .start_file(entry_name, options)
        .map_err(|e| archive_error(out_path, e))?;
    std::io::copy(&mut file, writer).map_err(|e| archive_error(out_path, e))?;
    debug!("added {} as {}", source.display(), entry_name);
    Ok(())
}

/// Stream a directory tree into the archive under `prefix`, keeping
/// explicit entries for directories so empty ones survive.
fn append_tree(
    writer: &mut ZipWriter<File>,
    root: &Path,
    prefix: &str,
    options: SimpleFileOptions,
    out_path: &Path,
) -> Result<()> {
    let mut pending: Vec<(PathBuf, String)> =
        vec![(root.to_path_buf(), prefix.trim_end_matches('/').to_string())];

    while let Some((dir, name)) = pending.pop() {
        writer
            .add_directory(name.as_str(), options)
            .map_err(|e| archive_error(out_path, e))?;

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("{} vanished while streaming, skipping", dir.display());
                continue;
            }
            Err(e) => return Err(ExportError::io(FileOperation::Read, &dir, e)),
        };

        for entry in entries {
            let entry = entry.map_err(|e| ExportError::io(FileOperation::Read, &dir, e))?;
            let child_name = format!("{}/{}", name, entry.file_name().to_string_lossy());
            let file_type = entry
                .file_type()
                .map_err(|e| ExportError::io(FileOperation::Read, &entry.path(), e))?;

            if file_type.is_dir() {
                pending.push((entry.path(), child_name));
            } else {
                append_file(writer, &entry.path(), &child_name, options, out_path)?;
            }
        }
    }
    Ok(())
}
