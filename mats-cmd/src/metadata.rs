//! Metadata store commands.

use crate::store::{open_store, read_file};
use mats_db::{Database, MetadataTable};

/// The production catalog as pretty JSON.
pub fn catalog_report(metadata: &str) -> anyhow::Result<String> {
    let catalog = open_store(metadata)?.build_catalog()?;
    Ok(serde_json::to_string_pretty(&catalog)?)
}

/// Load CSV exports into the staging tables of a SQLite store.
pub fn run_load(metadata: &str, csv_path: &str, groups_path: Option<&str>) -> anyhow::Result<()> {
    let db = Database::open(metadata)?;
    let rows = db.load_metadata(MetadataTable::Dev, &read_file(csv_path, "metadata CSV")?)?;
    let groups = match groups_path {
        Some(path) => db.load_database_groups(MetadataTable::Dev, &read_file(path, "groups CSV")?)?,
        None => 0,
    };
    log::info!(
        "[MATS] load: staged {} metadata rows and {} groups in {}",
        rows,
        groups,
        metadata
    );
    Ok(())
}

/// Publish staged metadata and report what changed as JSON.
pub fn publish_report(metadata: &str) -> anyhow::Result<String> {
    let summary = Database::open(metadata)?.publish_metadata()?;
    Ok(serde_json::to_string_pretty(&summary)?)
}
