//! SQL schema definitions for the metadata store.
//!
//! The schema is applied as a single batch when the database is opened.

/// Which copy of the metadata tables to read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataTable {
    /// Tables the apps read from.
    Prod,
    /// Staging tables the metadata scraper writes to before publishing.
    Dev,
}

impl MetadataTable {
    pub fn metadata(self) -> &'static str {
        match self {
            MetadataTable::Prod => "upperair_mats_metadata",
            MetadataTable::Dev => "upperair_mats_metadata_dev",
        }
    }

    pub fn groups(self) -> &'static str {
        match self {
            MetadataTable::Prod => "upperair_database_groups",
            MetadataTable::Dev => "upperair_database_groups_dev",
        }
    }
}

/// Returns the full SQL schema as a single batch string.
///
/// List-valued columns (`regions`, `levels`, `fcst_lens`, `variables`,
/// `fcst_orig`) hold Python list literals such as `['P500', 'P850']`.
/// Dates are unix seconds.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS upperair_mats_metadata (
        db TEXT NOT NULL,
        model TEXT NOT NULL,
        display_text TEXT NOT NULL,
        regions TEXT NOT NULL,
        levels TEXT NOT NULL,
        fcst_lens TEXT NOT NULL,
        variables TEXT NOT NULL,
        fcst_orig TEXT NOT NULL,
        mindate INTEGER NOT NULL,
        maxdate INTEGER NOT NULL,
        numrecs INTEGER NOT NULL,
        updated INTEGER NOT NULL,
        PRIMARY KEY (db, model)
    );

    CREATE TABLE IF NOT EXISTS upperair_mats_metadata_dev (
        db TEXT NOT NULL,
        model TEXT NOT NULL,
        display_text TEXT NOT NULL,
        regions TEXT NOT NULL,
        levels TEXT NOT NULL,
        fcst_lens TEXT NOT NULL,
        variables TEXT NOT NULL,
        fcst_orig TEXT NOT NULL,
        mindate INTEGER NOT NULL,
        maxdate INTEGER NOT NULL,
        numrecs INTEGER NOT NULL,
        updated INTEGER NOT NULL,
        PRIMARY KEY (db, model)
    );

    CREATE TABLE IF NOT EXISTS upperair_database_groups (
        db_group TEXT PRIMARY KEY,
        dbs TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS upperair_database_groups_dev (
        db_group TEXT PRIMARY KEY,
        dbs TEXT NOT NULL
    );
    "#
}
