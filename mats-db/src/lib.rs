//! SQLite metadata store for the MATS upper-air/ensemble apps.
//!
//! The metadata tables describe, per verification database and model, which
//! regions, levels, variables and forecast leads exist and over what dates.
//! The plot data functions never read these tables directly; they consume the
//! [`Catalog`](mats_types::catalog::Catalog) built from them.
//!
//! # Usage
//!
//! ```rust
//! use mats_db::{Database, MetadataTable};
//!
//! let db = Database::new().unwrap();
//! db.load_metadata(
//!     MetadataTable::Prod,
//!     "db,model,display_text,regions,levels,fcst_lens,variables,fcst_orig,mindate,maxdate,numrecs,updated\n\
//!      mv_gsl,GFS,GFS,['FULL'],['P500'],['12'],['TMP'],['120000'],1577836800,1580515200,10,1580515200\n",
//! ).unwrap();
//!
//! let catalog = db.build_catalog().unwrap();
//! assert_eq!(catalog.model("mv_gsl", "GFS"), Some("GFS"));
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.
//!
//! - `upperair_mats_metadata` / `upperair_mats_metadata_dev` - one row per (db, model)
//! - `upperair_database_groups` / `upperair_database_groups_dev` - database groupings
//!
//! Metadata is written to the `_dev` tables first and then published into the
//! production tables with [`Database::publish_metadata`].

pub mod schema;
mod catalog;
mod loader;
mod publish;
mod queries;
pub mod models;

pub use catalog::{catalog_from_rows, forecast_value_map};
pub use publish::PublishSummary;
pub use schema::MetadataTable;

use rusqlite::Connection;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// SQLite database holding the metadata tables.
///
/// This struct is cheaply cloneable (via `Rc`); clones share one connection.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    /// Open (or create) a database file and make sure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        log::info!("[MATS] db: opened metadata store {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}
