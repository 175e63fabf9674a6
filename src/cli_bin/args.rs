//! Command-line argument definitions and parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "mattertime",
    version,
    about = "Keep updated/created timestamps in markdown front matter",
    long_about = "mattertime maintains timestamp keys in the YAML front matter of markdown \
                  notes. It can upsert single keys, stamp files from their modification \
                  times, update a whole vault at once, or watch a vault for changes."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Insert or update one front matter key
    Upsert(UpsertArgs),
    /// Stamp files with their created/updated times
    Stamp(StampArgs),
    /// Stamp every eligible note in a vault
    UpdateAll(UpdateAllArgs),
    /// Watch a vault and stamp notes as they change
    Watch(WatchArgs),
    /// Show or create settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Common options for write operations
#[derive(Args, Debug, Clone, Default)]
pub struct WriteOptions {
    /// Show what would change without modifying files
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the upsert command
#[derive(Args, Debug)]
pub struct UpsertArgs {
    /// Files to modify; reads stdin and writes stdout when empty
    pub files: Vec<PathBuf>,

    /// Key to set
    #[arg(short, long)]
    pub key: String,

    /// Value to set
    #[arg(short = 'V', long)]
    pub value: String,

    /// Print modified content to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the stamp command
#[derive(Args, Debug)]
pub struct StampArgs {
    /// Files or directories to stamp
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Vault root that ignore folders are relative to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the update-all command
#[derive(Args, Debug)]
pub struct UpdateAllArgs {
    /// Vault root
    pub root: PathBuf,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Vault root
    pub root: PathBuf,

    /// Quiet period before a changed note is stamped, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 30_000)]
    pub debounce_ms: u64,

    /// Delay between scans, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 1_000)]
    pub poll_ms: u64,
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective settings as JSON
    Show,
    /// Write default settings to a file
    Init {
        /// Destination file
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
