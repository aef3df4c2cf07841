//! MirrorDNA CLI - state hashing, checksums, snapshots and checksummed configuration.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod errors;
mod logging;
mod output;

use commands::{
    canonicalize, checksum, compute_hash, config, snapshot, status, timeline, verify,
};
use logging::LogFormat;

#[derive(Parser)]
#[command(name = "mirrordna")]
#[command(about = "MirrorDNA continuity state hashing and snapshot CLI")]
#[command(version)]
struct Cli {
    /// Log filter directive (overrides MIRRORDNA_LOG, default: warn)
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Log output format
    #[arg(long, global = true, value_enum, env = "MIRRORDNA_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,
    /// Configuration store directory (default: ~/.mirrordna/config)
    #[arg(long, global = true, env = "MIRRORDNA_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the deterministic state hash of a directory
    ComputeHash {
        /// Directory to hash
        dir: PathBuf,
        /// Ignore pattern (repeatable; replaces the defaults)
        #[arg(long = "ignore", value_name = "PATTERN")]
        ignore: Vec<String>,
        /// Show per-file hashes
        #[arg(short, long)]
        verbose: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show canonical bytes for a JSON or YAML document
    Canonicalize {
        /// Input file (JSON on stdin if not provided)
        input: Option<PathBuf>,
        /// Also print the SHA-256 of the canonical bytes to stderr
        #[arg(long)]
        digest: bool,
    },
    /// Compute the checksum of a file
    Checksum {
        /// File to hash
        path: PathBuf,
        /// Hash as text (line endings and trailing whitespace normalized)
        #[arg(long)]
        text: bool,
        /// With --text, hash the text exactly as stored
        #[arg(long, requires = "text")]
        no_normalize: bool,
    },
    /// Verify a file against an expected checksum
    Verify {
        /// File to check
        path: PathBuf,
        /// Expected hex digest (case-insensitive)
        digest: String,
        /// Compare against the normalized text checksum
        #[arg(long)]
        text: bool,
    },
    /// Capture, inspect and compare snapshots
    Snapshot {
        #[command(subcommand)]
        command: snapshot::SnapshotCommand,
    },
    /// Manage checksummed configuration
    Config {
        #[command(subcommand)]
        command: config::ConfigCommand,
    },
    /// Timeline file operations
    Timeline {
        #[command(subcommand)]
        command: timeline::TimelineCommand,
    },
    /// Summarize vault and timeline continuity status
    Status {
        /// Vault configuration file
        #[arg(long)]
        vault: Option<PathBuf>,
        /// Timeline file
        #[arg(long)]
        timeline: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.log_level.as_deref(), cli.log_format) {
        eprintln!("Error: failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::ComputeHash {
            dir,
            ignore,
            verbose,
            json,
        } => compute_hash::run(dir, ignore, verbose, json),
        Commands::Canonicalize { input, digest } => canonicalize::run(input, digest),
        Commands::Checksum {
            path,
            text,
            no_normalize,
        } => checksum::run(path, text, no_normalize),
        Commands::Verify { path, digest, text } => verify::run(path, digest, text),
        Commands::Snapshot { command } => snapshot::run(command),
        Commands::Config { command } => config::run(command, cli.config_dir),
        Commands::Timeline { command } => timeline::run(command),
        Commands::Status {
            vault,
            timeline,
            json,
        } => status::run(vault, timeline, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
