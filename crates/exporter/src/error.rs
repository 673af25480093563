//! Error types for the export pipeline with path and operation context

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used throughout the exporter.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Filesystem operation that was in progress when an I/O error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
    Copy,
    Rename,
    CreateDir,
    Remove,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FileOperation::Read => "read",
            FileOperation::Write => "write",
            FileOperation::Copy => "copy",
            FileOperation::Rename => "rename",
            FileOperation::CreateDir => "create directory",
            FileOperation::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during an export run
#[derive(Debug, Error)]
pub enum ExportError {
    /// A required source path (instance directory, instance file, override
    /// source) does not exist.
    #[error("Path not found '{path}'")]
    PathNotFound { path: PathBuf },

    /// An output target already exists and overwriting was not requested.
    #[error("'{path}' exists and option '--force' was not used")]
    OutputExists { path: PathBuf },

    /// The instance description could not be read or parsed.
    #[error("Unable to load '{path}'")]
    InstanceLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// File system I/O failure with operation context.
    #[error("File operation ({operation}) failed on '{path}'")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    /// Fatal error while streaming the output archive.
    #[error("Archive streaming failed for '{path}'")]
    Archive {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Serializing an output entity failed.
    #[error("Unable to serialize '{path}'")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An options file was present but could not be loaded or parsed.
    #[error("Unable to load options from '{path}'")]
    OptionsLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid option values (empty author or version, conflicting flags).
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },
}

impl ExportError {
    pub(crate) fn io(operation: FileOperation, path: &Path, source: std::io::Error) -> Self {
        ExportError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        }
    }

    pub(crate) fn not_found(path: &Path) -> Self {
        ExportError::PathNotFound {
            path: path.to_path_buf(),
        }
    }
}
