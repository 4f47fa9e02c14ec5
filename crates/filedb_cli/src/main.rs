//! FileDB CLI
//!
//! Command-line tools for FileDB databases.
//!
//! # Commands
//!
//! - `collections` - List collections with record counts and sizes
//! - `insert` - Insert a JSON document into a collection
//! - `dump` - Print the records of a collection
//! - `count` - Count the records of a collection
//! - `drop` - Remove every record from a collection
//! - `verify` - Check the framing of every collection file

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// FileDB command-line database tools.
#[derive(Parser)]
#[command(name = "filedb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List collections with record counts and sizes
    Collections {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Insert a JSON document into a collection
    Insert {
        /// Collection name
        collection: String,

        /// JSON document to insert
        document: String,
    },

    /// Print the records of a collection, one per line
    Dump {
        /// Collection name
        collection: String,

        /// Maximum number of records to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Count the records of a collection
    Count {
        /// Collection name
        collection: String,
    },

    /// Remove every record from a collection
    Drop {
        /// Collection name
        collection: String,
    },

    /// Verify the framing of every collection file
    Verify,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Collections { format } => {
            let path = cli.path.ok_or("Database path required for collections")?;
            commands::inspect::run(&path, &format)?;
        }
        Commands::Insert {
            collection,
            document,
        } => {
            let path = cli.path.ok_or("Database path required for insert")?;
            commands::records::insert(&path, &collection, &document)?;
        }
        Commands::Dump { collection, limit } => {
            let path = cli.path.ok_or("Database path required for dump")?;
            commands::records::dump(&path, &collection, limit)?;
        }
        Commands::Count { collection } => {
            let path = cli.path.ok_or("Database path required for count")?;
            commands::records::count(&path, &collection)?;
        }
        Commands::Drop { collection } => {
            let path = cli.path.ok_or("Database path required for drop")?;
            commands::records::drop(&path, &collection)?;
        }
        Commands::Verify => {
            let path = cli.path.ok_or("Database path required for verify")?;
            commands::verify::run(&path)?;
        }
        Commands::Version => {
            println!("FileDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("FileDB Core v{}", filedb_core::VERSION);
        }
    }

    Ok(())
}
