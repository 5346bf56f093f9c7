//! # Quandle - Cayley Graph Enumerator
//!
//! The command-line driver for quandle-core.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                apps/quandle (THE BINARY)             │
//! │                                                      │
//! │  ┌─────────────┐  ┌──────────────┐  ┌────────────┐   │
//! │  │    CLI      │  │ Presentation │  │  Progress  │   │
//! │  │   (clap)    │  │ files (toml) │  │ (tracing)  │   │
//! │  └──────┬──────┘  └──────┬───────┘  └─────┬──────┘   │
//! │         └────────────────┼────────────────┘          │
//! │                          ▼                           │
//! │                  ┌───────────────┐                   │
//! │                  │ quandle-core  │                   │
//! │                  │  (THE LOGIC)  │                   │
//! │                  └───────────────┘                   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Enumerate the three-element dihedral quandle
//! quandle run -g 2 -r 1,2,1,2 -t text
//!
//! # Run a presentation file with a step limit, keep the result
//! quandle run -f demos/three_generators.toml --max-steps 5000 -t canonical -o q36.qnex
//! quandle inspect -i q36.qnex
//! quandle hash -i q36.qnex
//! ```
//!
//! Exit codes: 0 on success, 2 when an enumeration is inconclusive, 1 on
//! error.

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // QUANDLE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("QUANDLE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "quandle=debug,quandle_core=debug"
    } else {
        "quandle=info,quandle_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // logs go to stderr so stdout stays parseable
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    match cli::execute(cli) {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
   ___                    _ _
  / _ \ _  _ __ _ _ _  __| | |___
 | (_) | || / _` | ' \/ _` | / -_)
  \__\_\\_,_\__,_|_||_\__,_|_\___|

  Cayley Graph Enumerator v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
