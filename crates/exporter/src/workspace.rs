//! Temporary workspace and per-run state
//!
//! All intermediate artifacts (staged manifest, overrides tree, built
//! archive) live in a private temporary directory until finalization.

use std::path::Path;

use tempfile::TempDir;
use tracing::debug;

use crate::error::{ExportError, FileOperation, Result};

const WORKSPACE_PREFIX: &str = "mc-export-";

/// Private temporary directory owned by one export run.
///
/// The directory is removed when this value drops, on success, error, and
/// panic paths alike; [`Workspace::release`] removes it eagerly so removal
/// failures can be reported.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a uniquely named temporary directory for this run.
    pub fn acquire() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()
            .map_err(|e| ExportError::io(FileOperation::CreateDir, &std::env::temp_dir(), e))?;
        debug!("workspace acquired at {}", dir.path().display());
        Ok(Workspace { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Recursively remove the workspace now instead of waiting for drop.
    pub fn release(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|e| ExportError::io(FileOperation::Remove, &path, e))?;
        debug!("workspace released: {}", path.display());
        Ok(())
    }
}

/// Stages of one export run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    WorkspaceReady,
    ManifestBuilt,
    OverridesStaged,
    UrlsExported,
    Packaged,
    Finalized,
    Terminated,
}

/// Run token owned by the caller.
///
/// The pipeline takes it by value, so one `RunState` admits exactly one
/// run; starting a second logical run requires a new token. This replaces
/// a process-wide "already started" flag.
#[derive(Debug)]
pub struct RunState {
    stage: Stage,
}

impl RunState {
    pub fn new() -> Self {
        RunState { stage: Stage::Idle }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub(crate) fn advance(&mut self, next: Stage) {
        debug!("run state: {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_is_removed_on_release() {
        let workspace = Workspace::acquire().unwrap();
        let path = workspace.path().to_path_buf();
        assert!(path.is_dir());

        workspace.release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn workspace_is_removed_on_drop() {
        let path = {
            let workspace = Workspace::acquire().unwrap();
            workspace.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn two_workspaces_never_share_a_directory() {
        let a = Workspace::acquire().unwrap();
        let b = Workspace::acquire().unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn run_state_tracks_transitions() {
        let mut state = RunState::new();
        assert_eq!(state.stage(), Stage::Idle);
        state.advance(Stage::WorkspaceReady);
        state.advance(Stage::Terminated);
        assert_eq!(state.stage(), Stage::Terminated);
    }
}
