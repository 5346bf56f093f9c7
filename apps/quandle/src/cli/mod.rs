//! # Quandle CLI Module
//!
//! ## Available Commands
//!
//! - `run` - Enumerate the Cayley graph of a presentation
//! - `validate` - Check a presentation file without running it
//! - `inspect` - Load an exported graph or report snapshot
//! - `hash` - Compute BLAKE3 cryptographic hash of a canonical export

mod commands;

use clap::{Parser, Subcommand};
use quandle_core::QuandleError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Quandle - Cayley graph enumeration
///
/// Grows the Cayley graph of a finitely presented quandle or rack by
/// laying relation chains and merging vertices until every generator acts
/// as a bijection.
#[derive(Parser, Debug)]
#[command(name = "quandle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enumerate a presentation
    Run(RunArgs),

    /// Validate a presentation file without enumerating
    Validate {
        /// Path to the presentation file (toml)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Load an exported graph or report snapshot and check it
    Inspect {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Input format (canonical, report)
        #[arg(short = 't', long, default_value = "canonical")]
        format: String,
    },

    /// Compute BLAKE3 cryptographic hash of a canonical export
    Hash {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

/// Arguments of `quandle run`.
#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Presentation file (toml); flags below override its values
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Number of generators
    #[arg(short, long)]
    pub generators: Option<u32>,

    /// Relation as comma-separated integers, e.g. "3,1,-2,1" (repeatable)
    #[arg(short, long = "relation", allow_hyphen_values = true)]
    pub relations: Vec<String>,

    /// Extra closed word applied at every vertex, e.g. "2,1,3,1,2,-3"
    /// (repeatable)
    #[arg(short, long, allow_hyphen_values = true)]
    pub secondary: Vec<String>,

    /// Enumerate a rack (no generator self-loops)
    #[arg(long)]
    pub rack: bool,

    /// Order of every generator
    #[arg(long, conflicts_with = "generator_orders")]
    pub order: Option<u32>,

    /// Order of each generator as comma-separated integers, e.g. "2,2,3"
    #[arg(long)]
    pub generator_orders: Option<String>,

    /// Stop after this many processed vertices
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Stop once more vertices than this are live
    #[arg(long)]
    pub max_vertices: Option<usize>,

    /// Stop when one closure needs more merging passes than this
    #[arg(long)]
    pub max_closure_passes: Option<u64>,

    /// Output file path (stdout for json and text when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (json, canonical, report, text)
    #[arg(short = 't', long, default_value = "json")]
    pub format: String,
}

/// How a successful command ended, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// The enumeration stopped on a budget limit.
    Inconclusive,
}

impl CommandStatus {
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Inconclusive => 2,
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<CommandStatus, QuandleError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Run(args) => cmd_run(json_mode, &args),
        Commands::Validate { file } => cmd_validate(json_mode, &file),
        Commands::Inspect { input, format } => cmd_inspect(json_mode, &input, &format),
        Commands::Hash { input } => cmd_hash(json_mode, &input),
    }
}
