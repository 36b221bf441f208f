//! Typed query methods for the metadata tables.

use crate::models::{DatabaseGroup, MetadataRow};
use crate::schema::MetadataTable;
use crate::Database;
use mats_utils::lists::parse_list_column;
use rusqlite::{params, Row};

const METADATA_COLUMNS: &str = "db, model, display_text, regions, levels, fcst_lens, variables, \
     fcst_orig, mindate, maxdate, numrecs, updated";

fn metadata_from_row(row: &Row<'_>) -> rusqlite::Result<MetadataRow> {
    Ok(MetadataRow {
        db: row.get(0)?,
        model: row.get(1)?,
        display_text: row.get(2)?,
        regions: parse_list_column(&row.get::<_, String>(3)?),
        levels: parse_list_column(&row.get::<_, String>(4)?),
        fcst_lens: parse_list_column(&row.get::<_, String>(5)?),
        variables: parse_list_column(&row.get::<_, String>(6)?),
        fcst_orig: parse_list_column(&row.get::<_, String>(7)?),
        mindate: row.get(8)?,
        maxdate: row.get(9)?,
        numrecs: row.get(10)?,
        updated: row.get(11)?,
    })
}

impl Database {
    /// Distinct databases with production metadata, ordered by name.
    pub fn query_databases(&self) -> anyhow::Result<Vec<String>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT db FROM {} ORDER BY db",
            MetadataTable::Prod.metadata()
        ))?;
        let rows = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(rows)
    }

    /// All metadata rows of one database, ordered by model.
    pub fn query_metadata_rows(
        &self,
        table: MetadataTable,
        db: &str,
    ) -> anyhow::Result<Vec<MetadataRow>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} WHERE db = ?1 ORDER BY model",
            METADATA_COLUMNS,
            table.metadata()
        ))?;
        let rows = stmt
            .query_map(params![db], metadata_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[MATS] query: query_metadata_rows({}) returned {} records",
            db,
            rows.len()
        );
        Ok(rows)
    }

    /// Every metadata row in `table`, ordered by (db, model).
    pub fn query_all_metadata(&self, table: MetadataTable) -> anyhow::Result<Vec<MetadataRow>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY db, model",
            METADATA_COLUMNS,
            table.metadata()
        ))?;
        let rows = stmt
            .query_map([], metadata_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[MATS] query: query_all_metadata({}) returned {} records",
            table.metadata(),
            rows.len()
        );
        Ok(rows)
    }

    pub fn query_database_groups(
        &self,
        table: MetadataTable,
    ) -> anyhow::Result<Vec<DatabaseGroup>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT db_group, dbs FROM {} ORDER BY db_group",
            table.groups()
        ))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(DatabaseGroup {
                    group: row.get(0)?,
                    dbs: parse_list_column(&row.get::<_, String>(1)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
