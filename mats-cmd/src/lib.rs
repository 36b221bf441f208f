//! Command implementations for the MATS CLI.
//!
//! Provides subcommands for resolving and running reliability plot requests
//! against a curve metadata store, and for maintaining that store.

use clap::Subcommand;

pub mod metadata;
pub mod plot;
pub mod store;

#[derive(Subcommand)]
pub enum Command {
    /// Print the resolved statement for every database curve of a plot request
    Statement {
        /// Plot request JSON file
        #[arg(short = 'p', long)]
        params: String,

        /// Metadata store: SQLite file or CSV export of the metadata table
        #[arg(short = 'm', long, env = "MATS_METADATA")]
        metadata: String,
    },

    /// Run a reliability plot request against recorded query results
    Reliability {
        /// Plot request JSON file
        #[arg(short = 'p', long)]
        params: String,

        /// Metadata store: SQLite file or CSV export of the metadata table
        #[arg(short = 'm', long, env = "MATS_METADATA")]
        metadata: String,

        /// JSON array of query results, one per database curve in order
        #[arg(short = 'r', long)]
        results: String,
    },

    /// Print the curve parameter catalog as JSON
    Catalog {
        /// Metadata store: SQLite file or CSV export of the metadata table
        #[arg(short = 'm', long, env = "MATS_METADATA")]
        metadata: String,
    },

    /// Load a metadata CSV export into the staging tables of a SQLite store
    Load {
        /// SQLite metadata store (created if missing)
        #[arg(short = 'm', long, env = "MATS_METADATA")]
        metadata: String,

        /// Metadata CSV export
        #[arg(short = 'c', long)]
        csv: String,

        /// Optional database groups CSV export
        #[arg(short = 'g', long)]
        groups: Option<String>,
    },

    /// Reconcile the staging tables into the production tables
    Publish {
        /// SQLite metadata store
        #[arg(short = 'm', long, env = "MATS_METADATA")]
        metadata: String,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Statement { params, metadata } => {
            println!("{}", plot::statement_report(&params, &metadata)?);
            Ok(())
        }
        Command::Reliability {
            params,
            metadata,
            results,
        } => {
            println!("{}", plot::reliability_report(&params, &metadata, &results)?);
            Ok(())
        }
        Command::Catalog { metadata } => {
            println!("{}", metadata::catalog_report(&metadata)?);
            Ok(())
        }
        Command::Load {
            metadata,
            csv,
            groups,
        } => metadata::run_load(&metadata, &csv, groups.as_deref()),
        Command::Publish { metadata } => {
            println!("{}", metadata::publish_report(&metadata)?);
            Ok(())
        }
    }
}
