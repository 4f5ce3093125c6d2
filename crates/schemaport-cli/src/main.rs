//! SchemaPort CLI
//!
//! Command-line interface for importing exchange documents

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "schemaport")]
#[command(about = "SchemaPort - Reconcile exchanged metadata schemas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Preview or commit an XML document
    Import(commands::import::ImportArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import(args) => commands::import::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
