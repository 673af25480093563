//! Export options and options-file loading
//!
//! Options normally come from command-line arguments. When the program is
//! started without any, a `mc-tools.json` in the working directory or the
//! file named by `MC_TOOLS_OPTIONS` may supply them wholesale.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ExportError, Result};

/// Options file looked up in the working directory.
pub const OPTIONS_FILENAME: &str = "mc-tools.json";

/// Environment variable naming an alternative options file.
pub const OPTIONS_ENV_VAR: &str = "MC_TOOLS_OPTIONS";

/// Resolved options for one export run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Path to the CurseForge instance directory.
    pub instance_dir: PathBuf,
    /// Author of the modpack.
    pub author: String,
    /// Version of the modpack.
    pub version: String,
    /// Files and directories inside the instance directory to bundle as
    /// overrides, in caller order.
    #[serde(default)]
    pub overrides: Vec<PathBuf>,
    /// Produce a ZIP archive (`false` places the files directly in the
    /// working directory).
    #[serde(default = "default_true")]
    pub zip: bool,
    /// Also emit `curse-downloads.json` with direct download URLs.
    #[serde(default)]
    pub urls: bool,
    /// Overwrite existing output files.
    #[serde(default)]
    pub force: bool,
    /// Verbose diagnostic output.
    #[serde(default)]
    pub debug: bool,
}

fn default_true() -> bool {
    true
}

impl ExportOptions {
    /// Author and version must be non-empty before the pipeline starts.
    pub fn validate(&self) -> Result<()> {
        if self.author.trim().is_empty() {
            return Err(ExportError::Configuration {
                message: "author must not be empty".into(),
            });
        }
        if self.version.trim().is_empty() {
            return Err(ExportError::Configuration {
                message: "version must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// Shape of the options file: `{ "export": { ... } }`.
#[derive(Debug, Deserialize)]
struct OptionsFile {
    export: ExportOptions,
}

/// Try the working-directory options file, then the environment variable.
///
/// Returns the options together with the path they came from, or `None`
/// when no options file exists. A file that exists but fails to parse is
/// an error, not a fallthrough.
pub fn load_options_file() -> Result<Option<(ExportOptions, PathBuf)>> {
    let local = PathBuf::from(OPTIONS_FILENAME);
    if local.exists() {
        return parse_options_file(&local).map(|options| Some((options, local)));
    }

    if let Ok(env_path) = std::env::var(OPTIONS_ENV_VAR) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return parse_options_file(&path).map(|options| Some((options, path)));
        }
    }

    Ok(None)
}

/// Parse a known-existing options file into typed options.
pub fn parse_options_file(path: &Path) -> Result<ExportOptions> {
    let bytes = std::fs::read(path).map_err(|e| ExportError::OptionsLoad {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let file: OptionsFile =
        serde_json::from_slice(&bytes).map_err(|e| ExportError::OptionsLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
    Ok(file.export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn options() -> ExportOptions {
        ExportOptions {
            instance_dir: PathBuf::from("/tmp/instance"),
            author: "a".into(),
            version: "1.0".into(),
            overrides: vec![],
            zip: true,
            urls: false,
            force: false,
            debug: false,
        }
    }

    #[test]
    fn empty_author_is_a_configuration_error() {
        let mut opts = options();
        opts.author = "  ".into();
        assert!(matches!(
            opts.validate(),
            Err(ExportError::Configuration { .. })
        ));
    }

    #[test]
    fn empty_version_is_a_configuration_error() {
        let mut opts = options();
        opts.version = String::new();
        assert!(matches!(
            opts.validate(),
            Err(ExportError::Configuration { .. })
        ));
    }

    #[test]
    fn parses_an_options_file_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(OPTIONS_FILENAME);
        std::fs::write(
            &path,
            r#"{
                "export": {
                    "instanceDir": "/tmp/instance",
                    "author": "omgPacks",
                    "version": "0.0.1-alpha",
                    "overrides": ["config", "options.txt"]
                }
            }"#,
        )
        .unwrap();

        let opts = parse_options_file(&path).unwrap();
        assert_eq!(opts.author, "omgPacks");
        assert_eq!(opts.overrides.len(), 2);
        assert!(opts.zip);
        assert!(!opts.urls);
        assert!(!opts.force);
    }

    #[test]
    fn malformed_options_file_is_a_load_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(OPTIONS_FILENAME);
        std::fs::write(&path, r#"{"export": {"author": "x"}}"#).unwrap();

        assert!(matches!(
            parse_options_file(&path),
            Err(ExportError::OptionsLoad { .. })
        ));
    }
}
