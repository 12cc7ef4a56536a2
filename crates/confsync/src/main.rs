//! confsync CLI - publish markdown documentation to Confluence.
//!
//! Provides one command:
//! - `sync`: render eligible markdown documents and reconcile them (pages
//!   and attachments) against a Confluence space.

mod commands;
mod error;
mod output;
mod site;

use clap::{Parser, Subcommand};

use commands::SyncArgs;
use output::Output;

/// confsync - Confluence documentation publisher.
#[derive(Parser)]
#[command(name = "confsync", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synchronize markdown documents to Confluence.
    Sync(SyncArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let result = match cli.command {
        Commands::Sync(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
