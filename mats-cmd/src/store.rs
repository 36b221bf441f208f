//! Opening the metadata store named on the command line.

use mats_db::{Database, MetadataTable};
use std::path::Path;

/// Open a SQLite metadata store, or build an in-memory one from a `.csv`
/// export of the production metadata table.
pub fn open_store(path: &str) -> anyhow::Result<Database> {
    let is_csv = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        let csv_data = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read metadata CSV {}: {}", path, e))?;
        let db = Database::new()?;
        db.load_metadata(MetadataTable::Prod, &csv_data)?;
        Ok(db)
    } else {
        if !Path::new(path).exists() {
            log::warn!("[MATS] store: {} does not exist, creating an empty store", path);
        }
        Database::open(path)
    }
}

/// Read a file into a string, naming it in the error.
pub fn read_file(path: &str, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Failed to read {} {}: {}", what, path, e))
}
