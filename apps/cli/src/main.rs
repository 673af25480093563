//! Command-line front-end for the instance exporter

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use exporter::options::{self, ExportOptions, OPTIONS_ENV_VAR};
use exporter::pipeline;
use exporter::workspace::RunState;

const AFTER_HELP: &str = r#"Example:
  $ mc-export -i C:\CurseForge\Instances\MyModpack -a omgPacks -v 0.0.1-alpha -o config -o scripts -o options.txt

  What it does:
    - Exports the CurseForge Minecraft instance in C:\CurseForge\Instances\MyModpack
    - Sets omgPacks as modpack author
    - Sets 0.0.1-alpha as modpack version
    - Copies directory C:\CurseForge\Instances\MyModpack\config to overrides\config
    - Copies directory C:\CurseForge\Instances\MyModpack\scripts to overrides\scripts
    - Copies file C:\CurseForge\Instances\MyModpack\options.txt to overrides\options.txt
    - Creates a ZIP archive containing manifest.json and the overrides directory
"#;

/// Exports an Overwolf CurseForge Minecraft instance as ZIP archive
#[derive(Debug, Parser)]
#[command(name = "mc-export", after_help = AFTER_HELP, disable_version_flag = true)]
struct Cli {
    /// Path to CurseForge instance directory
    #[arg(short = 'i', long)]
    instance_dir: PathBuf,

    /// Author of this modpack
    #[arg(short = 'a', long)]
    author: String,

    /// Version of this modpack
    #[arg(short = 'v', long)]
    version: String,

    /// Directories and/or files inside the instance directory to include as overrides
    #[arg(short = 'o', long = "overrides")]
    overrides: Vec<PathBuf>,

    /// Don't create a ZIP archive; place output files in the current directory
    #[arg(short = 'z', long = "no-zip", action = ArgAction::SetFalse)]
    zip: bool,

    /// Also write curse-downloads.json with direct download URLs
    #[arg(short = 'u', long)]
    urls: bool,

    /// Overwrite existing output files
    #[arg(short = 'f', long)]
    force: bool,

    /// Enable debug output of this tool
    #[arg(short = 'd', long)]
    debug: bool,
}

impl From<Cli> for ExportOptions {
    fn from(cli: Cli) -> Self {
        ExportOptions {
            instance_dir: cli.instance_dir,
            author: cli.author,
            version: cli.version,
            overrides: cli.overrides,
            zip: cli.zip,
            urls: cli.urls,
            force: cli.force,
            debug: cli.debug,
        }
    }
}

/// Where the effective options came from.
enum OptionsSource {
    Args,
    File(PathBuf),
}

/// Command-line arguments win; with none given, an options file
/// (./mc-tools.json or $MC_TOOLS_OPTIONS) may supply them wholesale.
fn resolve_options() -> exporter::Result<(ExportOptions, OptionsSource)> {
    if std::env::args().len() == 1 {
        if let Some((opts, path)) = options::load_options_file()? {
            return Ok((opts, OptionsSource::File(path)));
        }
    }
    Ok((Cli::parse().into(), OptionsSource::Args))
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn run() -> anyhow::Result<()> {
    let (options, source) = resolve_options()?;
    init_tracing(options.debug);

    if let OptionsSource::File(path) = &source {
        warn!(
            "command-line arguments replaced by options from {} (set via ./mc-tools.json or ${})",
            path.display(),
            OPTIONS_ENV_VAR
        );
    }
    if options.debug {
        debug!("resolved options: {options:?}");
    }

    pipeline::run(&options, RunState::new()).await?;
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        // Alternate formatting renders the whole source chain in one line.
        eprintln!("[ERROR]: {error:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use exporter::error::{ExportError, FileOperation};
    use std::path::PathBuf;

    #[test]
    fn error_chain_is_rendered_in_one_line() {
        let error = ExportError::FileSystem {
            path: PathBuf::from("manifest.json"),
            operation: FileOperation::Write,
            source: std::io::Error::other("disk full"),
        };

        let rendered = format!("[ERROR]: {:#}", anyhow::Error::from(error));
        assert!(rendered.starts_with("[ERROR]: File operation (write) failed"));
        assert!(rendered.contains("disk full"));
    }
}
