//! CurseForge instance exporter
//!
//! This library turns a locally installed CurseForge Minecraft instance
//! into a portable modpack package: a `manifest.json` describing the mod
//! set, a directory of user-selected override files, and optionally a
//! single ZIP archive bundling both. All intermediate artifacts are staged
//! in a private temporary workspace that is removed on every exit path.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use exporter::{ExportOptions, RunState, pipeline};
//! use std::path::PathBuf;
//!
//! # async fn example() -> exporter::Result<()> {
//! let options = ExportOptions {
//!     instance_dir: PathBuf::from("C:/CurseForge/Instances/MyModpack"),
//!     author: "omgPacks".to_string(),
//!     version: "0.0.1-alpha".to_string(),
//!     overrides: vec![PathBuf::from("config"), PathBuf::from("options.txt")],
//!     zip: true,
//!     urls: false,
//!     force: false,
//!     debug: false,
//! };
//!
//! // One RunState admits exactly one run.
//! pipeline::run(&options, RunState::new()).await?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod downloads;
pub mod error;
pub mod finalize;
mod fsops;
pub mod instance;
pub mod manifest;
pub mod options;
pub mod overrides;
pub mod pipeline;
pub mod workspace;


pub use error::{ExportError, Result};
pub use instance::MinecraftInstance;
pub use manifest::Manifest;
pub use options::ExportOptions;
pub use workspace::{RunState, Workspace};
