//! Command-line interface for cdoclint.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{Config, CONFIG_FILE_NAMES};
use crate::detect::{Runner, SourceFile};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// File extensions that are analyzed.
const C_EXTENSIONS: &[&str] = &["c", "h"];

/// Default configuration written by `init`.
const DEFAULT_CONFIG: &str = include_str!("templates/default.yaml");

/// Documentation and condition style checker for C sources.
///
/// cdoclint checks that every documentation comment matches the function,
/// struct, union, enum or typedef it precedes, and that no control statement
/// assigns inside its condition.
#[derive(Parser)]
#[command(name = "cdoclint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log progress to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check C files and report style diagnostics
    #[command(visible_alias = "check")]
    Lint(LintArgs),
    /// Write a default configuration file
    Init(InitArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
    Sarif,
}

/// Arguments for the lint command.
#[derive(Parser)]
pub struct LintArgs {
    /// Files or directories to check
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Show suppressed diagnostics in output
    #[arg(long)]
    pub show_suppressed: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "cdoclint.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Load the config named on the command line, or discover one in the
/// working directory.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<(Config, Option<PathBuf>)> {
    match explicit {
        Some(path) => Ok((Config::parse_file(path)?, Some(path.to_path_buf()))),
        None => {
            let cwd = std::env::current_dir()?;
            Ok(Config::discover(&cwd)?)
        }
    }
}

/// Collect `.c` and `.h` files under `root`, skipping hidden directories and
/// excluded paths.
pub fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            let hidden_dir = e.depth() > 0 && e.file_type().is_dir() && name.starts_with('.');
            !hidden_dir && !config.is_path_excluded(e.path())
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if C_EXTENSIONS.contains(&ext) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Read every file fully; unreadable files are logged and skipped.
fn read_sources(paths: &[PathBuf]) -> Vec<SourceFile> {
    paths
        .iter()
        .filter_map(|path| match std::fs::read(path) {
            Ok(bytes) => Some(SourceFile::new(
                path.to_string_lossy(),
                String::from_utf8_lossy(&bytes),
            )),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                None
            }
        })
        .collect()
}

/// Run the lint command.
pub fn run_lint(args: &LintArgs) -> anyhow::Result<i32> {
    let (config, config_path) = load_config(args.config.as_deref())?;
    match &config_path {
        Some(path) => info!(config = %path.display(), "loaded configuration"),
        None => debug!(
            "no configuration found (looked for {}), using defaults",
            CONFIG_FILE_NAMES.join(", ")
        ),
    }

    let mut files = Vec::new();
    for path in &args.paths {
        let metadata = std::fs::metadata(path)
            .map_err(|e| anyhow::anyhow!("cannot access path {}: {}", path.display(), e))?;
        if metadata.is_dir() {
            files.extend(collect_files(path, &config)?);
        } else if !config.is_path_excluded(path) {
            files.push(path.clone());
        }
    }
    debug!(count = files.len(), "collected files");

    if files.is_empty() {
        warn!("no files to scan");
        return Ok(EXIT_SUCCESS);
    }

    let sources = read_sources(&files);
    let result = Runner::new(&config).run(&sources);

    let path_str = args
        .paths
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let config_str = config_path.map(|p| p.to_string_lossy().to_string());

    match args.format {
        OutputFormat::Json => report::write_json(&path_str, &result)?,
        OutputFormat::Sarif => {
            let base = match args.paths.as_slice() {
                [single] => single.as_path(),
                _ => Path::new(""),
            };
            report::write_sarif(base, &result)?;
        }
        OutputFormat::Pretty => {
            report::write_pretty(&path_str, config_str.as_deref(), &result, args.show_suppressed)
        }
    }

    if result.violations.is_empty() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() && !args.force {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Use --force to overwrite it or --output to choose another path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(&args.output, DEFAULT_CONFIG)?;

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: cdoclint lint . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
