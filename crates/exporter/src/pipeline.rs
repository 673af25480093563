//! The linear export pipeline
//!
//! Workspace → manifest → overrides → optional URL list → archive or direct
//! copy → finalization. Every step awaits its predecessor; any failure
//! short-circuits the rest of the chain and the workspace is removed on
//! every exit path.

use std::path::Path;

use tracing::{debug, info};

use crate::archive;
use crate::downloads::{DOWNLOADS_FILENAME, DownloadList};
use crate::error::{ExportError, FileOperation, Result};
use crate::finalize;
use crate::fsops;
use crate::instance::MinecraftInstance;
use crate::manifest::{MANIFEST_FILENAME, Manifest};
use crate::options::ExportOptions;
use crate::overrides;
use crate::workspace::{RunState, Stage, Workspace};

/// Run one export into the current working directory.
pub async fn run(options: &ExportOptions, state: RunState) -> Result<()> {
    let out_dir = std::env::current_dir()
        .map_err(|e| ExportError::io(FileOperation::Read, Path::new("."), e))?;
    run_in(options, &out_dir, state).await
}

/// Run one export, finalizing into `out_dir`.
///
/// Consumes the [`RunState`], so a second run needs a fresh token.
pub async fn run_in(options: &ExportOptions, out_dir: &Path, mut state: RunState) -> Result<()> {
    options.validate()?;

    let result = execute(options, out_dir, &mut state).await;
    state.advance(Stage::Terminated);
    result
}

async fn execute(options: &ExportOptions, out_dir: &Path, state: &mut RunState) -> Result<()> {
    fsops::assert_exists(&options.instance_dir)?;

    let workspace = Workspace::acquire()?;
    state.advance(Stage::WorkspaceReady);

    let instance = MinecraftInstance::load(&options.instance_dir).await?;

    let manifest = Manifest::build(&instance, &options.author, &options.version);
    let manifest_path = workspace.path().join(MANIFEST_FILENAME);
    manifest.write(&manifest_path, options.force).await?;
    state.advance(Stage::ManifestBuilt);

    let staging_dir = workspace.path().join(&manifest.overrides);
    overrides::stage(&options.instance_dir, &options.overrides, &staging_dir).await?;
    state.advance(Stage::OverridesStaged);

    let downloads_path = if options.urls {
        let list = DownloadList::build(&instance);
        debug!("exporting {} download urls", list.downloads.len());
        let path = workspace.path().join(DOWNLOADS_FILENAME);
        list.write(&path, options.force).await?;
        state.advance(Stage::UrlsExported);
        Some(path)
    } else {
        None
    };

    if options.zip {
        let archive_name = manifest.archive_filename();
        let archive_path = workspace.path().join(&archive_name);
        archive::build(
            &manifest_path,
            &staging_dir,
            !options.overrides.is_empty(),
            &manifest.overrides,
            &archive_path,
        )
        .await?;
        state.advance(Stage::Packaged);

        finalize::finalize_archive(&archive_path, &archive_name, out_dir, options.force).await?;
    } else {
        state.advance(Stage::Packaged);
        finalize::finalize_directory(
            &manifest_path,
            &staging_dir,
            &manifest.overrides,
            out_dir,
            options.force,
        )
        .await?;
    }

    if let Some(path) = downloads_path {
        finalize::finalize_downloads(&path, DOWNLOADS_FILENAME, out_dir, options.force).await?;
    }
    state.advance(Stage::Finalized);

    info!("exported '{}' version {}", manifest.name, manifest.version);
    workspace.release()
}
