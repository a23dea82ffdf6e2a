//! HopperKV Binary
//!
//! Command dispatch for the four operations. Records are read from stdin
//! as newline-delimited `key,value` lines; status output goes to stdout.

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use hopperkv::{ops, Config};

/// HopperKV bulk loader
#[derive(Parser, Debug)]
#[command(name = "hopperkv")]
#[command(about = "Bulk loader for an embedded ordered key-value store")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bulk-load key,value lines from stdin with batched commits
    Index {
        /// Store directory
        #[arg(short, long)]
        path: PathBuf,

        /// Records staged between batch commits
        #[arg(short, long, default_value_t = 1_000_000)]
        batch_size: usize,
    },

    /// Look up each stdin line's key; reports FOUND/FAILED per key
    Query {
        /// Store directory
        #[arg(short, long)]
        path: PathBuf,
    },

    /// Delete each stdin line's key; reports SUCCESS/ERROR per key
    Remove {
        /// Store directory
        #[arg(short, long)]
        path: PathBuf,
    },

    /// Write all stored entries to stdout as key,value lines
    Dump {
        /// Store directory
        #[arg(short, long)]
        path: PathBuf,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hopperkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Index { path, batch_size } => {
            let config = Config::builder()
                .data_dir(path)
                .batch_size(batch_size)
                .build();
            ops::index::run(config, io::stdin().lock())
        }
        Commands::Query { path } => {
            let config = Config::builder().data_dir(path).build();
            ops::query::run(config, io::stdin().lock(), &mut io::stdout().lock())
        }
        Commands::Remove { path } => {
            let config = Config::builder().data_dir(path).build();
            ops::remove::run(config, io::stdin().lock(), &mut io::stdout().lock())
        }
        Commands::Dump { path } => {
            let config = Config::builder().data_dir(path).build();
            ops::dump::run(config, &mut io::stdout().lock())
        }
    };

    if let Err(e) = result {
        tracing::error!("fatal: {}", e);
        std::process::exit(1);
    }
}
