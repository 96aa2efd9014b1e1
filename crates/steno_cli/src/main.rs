//! Steno CLI
//!
//! Command-line front end for the steno base library.
//!
//! # Commands
//!
//! - `merge` - Merge time-ordered packet files into one ordered stream
//! - `positions` - Union or intersect sorted position lists

mod commands;

use clap::{Parser, Subcommand};
use commands::positions::SetOp;
use std::path::PathBuf;
use steno_base::Verbosity;
use tracing_subscriber::EnvFilter;

/// Packet stream and position list tools.
#[derive(Parser)]
#[command(name = "steno")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose diagnostics (repeat for more)
    #[arg(global = true, short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge packet files, each sorted by time, into one sorted stream
    Merge {
        /// Capacity of each producer channel
        #[arg(short, long, default_value = "16")]
        buffer: usize,

        /// Capacity of the merged channel
        #[arg(short, long, default_value_t = steno_base::DEFAULT_MERGE_BUFFER)]
        output_buffer: usize,

        /// Packet files with one `<unix-nanos> <payload>` line per packet
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Combine two comma-separated position lists
    Positions {
        /// Operation to apply
        #[arg(value_enum)]
        op: SetOp,

        /// First list, e.g. `1,3,5`
        a: String,

        /// Second list, e.g. `2,3,4`
        b: String,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let verbosity = Verbosity::new(cli.verbose);

    match cli.command {
        Commands::Merge {
            buffer,
            output_buffer,
            files,
        } => {
            commands::merge::run(&files, buffer, output_buffer, verbosity).await?;
        }
        Commands::Positions { op, a, b } => {
            commands::positions::run(op, &a, &b)?;
        }
        Commands::Version => {
            println!("Steno CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Steno Base v{}", steno_base::VERSION);
        }
    }

    Ok(())
}
