//! CLI Adapter.

mod stat;

use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::app::config::load_config;
use crate::domain::config::parse_octal_mode;
use crate::domain::paths::{real_path_safety, relative_path};
use crate::domain::{AppError, FilesystemConfig, OpenMode};
use crate::services::Filesystem;

use self::stat::StatView;

#[derive(Parser)]
#[command(name = "fsgate")]
#[command(version)]
#[command(
    about = "Inspect and change the local filesystem with contextual errors",
    long_about = None
)]
struct Cli {
    /// Configuration file; defaults apply when it does not exist
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Log facade operations to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show metadata of a path
    Stat {
        path: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the entries of a directory
    #[clap(visible_alias = "list")]
    Ls {
        path: PathBuf,
        /// Include every descendant, parents before children
        #[arg(short, long)]
        recursive: bool,
    },
    /// Create a directory and any missing ancestors
    Mkdir {
        path: PathBuf,
        /// Octal mode (defaults to the configured directory mode)
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<u32>,
    },
    /// Copy a file, or a directory tree
    Cp { source: PathBuf, destination: PathBuf },
    /// Remove a file or a directory tree; nothing there is not an error
    Rm { path: PathBuf },
    /// Remove everything inside a directory
    Clear { path: PathBuf },
    /// Change permissions of a path, or of a whole tree with -R
    Chmod {
        path: PathBuf,
        /// Octal mode
        #[arg(value_parser = parse_mode, required_unless_present = "recursive")]
        mode: Option<u32>,
        /// Apply to every descendant, children first
        #[arg(short = 'R', long)]
        recursive: bool,
        /// Directory mode for -R (defaults to the configured directory mode)
        #[arg(long, value_parser = parse_mode, requires = "recursive")]
        dir_mode: Option<u32>,
        /// File mode for -R (defaults to the configured file mode)
        #[arg(long, value_parser = parse_mode, requires = "recursive")]
        file_mode: Option<u32>,
    },
    /// Create a file if missing and set its timestamps to now
    Touch { path: PathBuf },
    /// Print the delimited records of a file as JSON arrays
    Records { path: PathBuf },
    /// Collapse `.` and `..` segments without touching the filesystem
    Normalize { path: String },
    /// Print PATH relative to BASE
    Relpath { base: String, path: String },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("fsgate=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

fn execute(cli: Cli) -> Result<(), AppError> {
    let fs = Filesystem::local();
    let config = match &cli.config {
        Some(path) => load_config(&fs, path)?,
        None => FilesystemConfig::default(),
    };

    match cli.command {
        Commands::Stat { path, json } => run_stat(&fs, &path, json),
        Commands::Ls { path, recursive } => run_ls(&fs, &path, recursive),
        Commands::Mkdir { path, mode } => {
            fs.create_directory(&path, mode.unwrap_or(config.directory_mode))?;
            println!("✅ Created directory {}", path.display());
            Ok(())
        }
        Commands::Cp { source, destination } => run_cp(&fs, &source, &destination),
        Commands::Rm { path } => {
            fs.remove(&path)?;
            println!("✅ Removed {}", path.display());
            Ok(())
        }
        Commands::Clear { path } => {
            fs.clear_directory(&path)?;
            println!("✅ Cleared {}", path.display());
            Ok(())
        }
        Commands::Chmod { path, mode, recursive, dir_mode, file_mode } => {
            if recursive {
                fs.change_permissions_recursively(
                    &path,
                    dir_mode.or(mode).unwrap_or(config.directory_mode),
                    file_mode.or(mode).unwrap_or(config.file_mode),
                )?;
            } else {
                let mode = mode.ok_or_else(|| AppError::config_error("chmod requires a MODE"))?;
                fs.change_permissions(&path, mode)?;
            }
            println!("✅ Changed permissions of {}", path.display());
            Ok(())
        }
        Commands::Touch { path } => {
            fs.touch(&path, None, None)?;
            println!("✅ Touched {}", path.display());
            Ok(())
        }
        Commands::Records { path } => run_records(&fs, &path, &config),
        Commands::Normalize { path } => {
            println!("{}", real_path_safety(&path));
            Ok(())
        }
        Commands::Relpath { base, path } => {
            println!("{}", relative_path(&base, &path));
            Ok(())
        }
    }
}

fn run_stat(fs: &Filesystem, path: &Path, json: bool) -> Result<(), AppError> {
    let meta = fs.stat(path)?.ok_or_else(|| AppError::NotFound(path.to_path_buf()))?;
    let view = StatView::new(path, &meta);
    if json {
        println!("{}", serde_json::to_string_pretty(&view).map_err(io::Error::from)?);
    } else {
        println!("{}", view.render_text());
    }
    Ok(())
}

fn run_ls(fs: &Filesystem, path: &Path, recursive: bool) -> Result<(), AppError> {
    let entries =
        if recursive { fs.list_directory_recursive(path)? } else { fs.list_directory(path)? };
    for entry in entries {
        println!("{}", entry.display());
    }
    Ok(())
}

fn run_cp(fs: &Filesystem, source: &Path, destination: &Path) -> Result<(), AppError> {
    if fs.is_directory(source)? {
        fs.copy_directory(source, destination)?;
        println!("✅ Copied directory {} to {}", source.display(), destination.display());
    } else {
        let bytes = fs.copy(source, destination)?;
        println!("✅ Copied {} bytes to {}", bytes, destination.display());
    }
    Ok(())
}

fn run_records(fs: &Filesystem, path: &Path, config: &FilesystemConfig) -> Result<(), AppError> {
    let format = config.record_format();
    let mut stream = fs.open(path, OpenMode::Read)?;
    while let Some(record) = stream.read_record(format)? {
        println!("{}", serde_json::to_string(&record).map_err(io::Error::from)?);
    }
    stream.close()?;
    Ok(())
}

fn parse_mode(text: &str) -> Result<u32, String> {
    match parse_octal_mode(text) {
        Some(mode) if mode <= 0o7777 => Ok(mode),
        _ => Err(format!("'{text}' is not an octal permission mode")),
    }
}
