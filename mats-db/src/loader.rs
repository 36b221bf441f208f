//! CSV loading and row insertion for the metadata tables.
//!
//! # CSV Formats
//!
//! - **Metadata** (has headers):
//!   `db,model,display_text,regions,levels,fcst_lens,variables,fcst_orig,mindate,maxdate,numrecs,updated`.
//!   List columns are Python list literals and must be quoted when they
//!   contain more than one item, e.g. `"['P500', 'P850']"`.
//! - **Database groups** (has headers): `db_group,dbs`

use crate::models::{DatabaseGroup, MetadataRow};
use crate::schema::MetadataTable;
use crate::Database;
use mats_utils::lists::{parse_list_column, to_list_column};
use rusqlite::{params, Connection};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct MetadataRecord {
    db: String,
    model: String,
    #[serde(default)]
    display_text: String,
    regions: String,
    levels: String,
    fcst_lens: String,
    variables: String,
    #[serde(default)]
    fcst_orig: String,
    mindate: i64,
    maxdate: i64,
    numrecs: i64,
    updated: i64,
}

impl MetadataRecord {
    fn into_row(self) -> MetadataRow {
        let fcst_lens = parse_list_column(&self.fcst_lens);
        let fcst_orig = if self.fcst_orig.trim().is_empty() {
            fcst_lens.clone()
        } else {
            parse_list_column(&self.fcst_orig)
        };
        let display_text = if self.display_text.is_empty() {
            MetadataRow::default_display_text(&self.model)
        } else {
            self.display_text
        };
        MetadataRow {
            db: self.db,
            model: self.model,
            display_text,
            regions: parse_list_column(&self.regions),
            levels: parse_list_column(&self.levels),
            fcst_lens,
            variables: parse_list_column(&self.variables),
            fcst_orig,
            mindate: self.mindate,
            maxdate: self.maxdate,
            numrecs: self.numrecs,
            updated: self.updated,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GroupRecord {
    db_group: String,
    dbs: String,
}

pub(crate) fn insert_row(conn: &Connection, table: MetadataTable, row: &MetadataRow) -> anyhow::Result<()> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO {} (db, model, display_text, regions, levels, fcst_lens,
                variables, fcst_orig, mindate, maxdate, numrecs, updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            table.metadata()
        ),
        params![
            row.db,
            row.model,
            row.display_text,
            to_list_column(&row.regions),
            to_list_column(&row.levels),
            to_list_column(&row.fcst_lens),
            to_list_column(&row.variables),
            to_list_column(&row.fcst_orig),
            row.mindate,
            row.maxdate,
            row.numrecs,
            row.updated,
        ],
    )?;
    Ok(())
}

pub(crate) fn insert_group(conn: &Connection, table: MetadataTable, group: &DatabaseGroup) -> anyhow::Result<()> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO {} (db_group, dbs) VALUES (?1, ?2)",
            table.groups()
        ),
        params![group.group, to_list_column(&group.dbs)],
    )?;
    Ok(())
}

impl Database {
    /// Load metadata rows from a CSV string into `table`.
    ///
    /// Rows without a db or model, and rows with an empty region, level,
    /// forecast length or variable list, are skipped. Returns the number of
    /// rows stored.
    ///
    /// # Example CSV
    /// ```text
    /// db,model,display_text,regions,levels,fcst_lens,variables,fcst_orig,mindate,maxdate,numrecs,updated
    /// mv_gsl,GFS.0.25,,"['FULL', 'EAST']",['P500'],['12'],['TMP'],['120000'],1577836800,1580515200,10,1580515200
    /// ```
    pub fn load_metadata(&self, table: MetadataTable, csv_data: &str) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());

        let mut count = 0usize;
        let mut skipped = 0usize;
        for result in rdr.deserialize::<MetadataRecord>() {
            let record = result?;
            if record.db.is_empty() || record.model.is_empty() {
                skipped += 1;
                continue;
            }
            let row = record.into_row();
            if !row.is_complete() {
                log::warn!(
                    "[MATS] loader: skipping {}/{} with an empty option list",
                    row.db,
                    row.model
                );
                skipped += 1;
                continue;
            }
            insert_row(&conn, table, &row)?;
            count += 1;
        }
        log::info!(
            "[MATS] loader: Loaded {} metadata rows into {}, skipped {}",
            count,
            table.metadata(),
            skipped
        );
        Ok(count)
    }

    /// Load database groups from a CSV string into `table`'s groups table.
    ///
    /// # Example CSV
    /// ```text
    /// db_group,dbs
    /// NOAA NCEP,"['mv_gsl', 'mv_ncep']"
    /// ```
    pub fn load_database_groups(&self, table: MetadataTable, csv_data: &str) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());

        let mut count = 0usize;
        for result in rdr.deserialize::<GroupRecord>() {
            let record = result?;
            if record.db_group.is_empty() {
                continue;
            }
            let group = DatabaseGroup {
                group: record.db_group,
                dbs: parse_list_column(&record.dbs),
            };
            insert_group(&conn, table, &group)?;
            count += 1;
        }
        log::info!(
            "[MATS] loader: Loaded {} database groups into {}",
            count,
            table.groups()
        );
        Ok(count)
    }

    /// Store one metadata row, replacing any existing row for its (db, model).
    pub fn insert_metadata_row(&self, table: MetadataTable, row: &MetadataRow) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        insert_row(&conn, table, row)
    }

    pub fn insert_database_group(&self, table: MetadataTable, group: &DatabaseGroup) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        insert_group(&conn, table, group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::HEADER;

    #[test]
    fn load_metadata_parses_list_columns() {
        let db = Database::new().unwrap();
        let csv = format!(
            "{}mv_gsl,GFS.0.25,,\"['FULL', 'EAST']\",\"['P500', 'P850']\",['12'],['TMP'],['120000'],1577836800,1580515200,10,1580515200\n",
            HEADER
        );
        assert_eq!(db.load_metadata(MetadataTable::Dev, &csv).unwrap(), 1);

        let rows = db.query_metadata_rows(MetadataTable::Dev, "mv_gsl").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].display_text, "GFS_0_25");
        assert_eq!(rows[0].regions, vec!["FULL", "EAST"]);
        assert_eq!(rows[0].levels, vec!["P500", "P850"]);
        assert_eq!(rows[0].fcst_orig, vec!["120000"]);
        assert!(db.query_databases().unwrap().is_empty(), "prod table untouched");
    }

    #[test]
    fn load_metadata_skips_incomplete_rows() {
        let db = Database::new().unwrap();
        let csv = format!(
            "{}mv_gsl,GFS,GFS,['FULL'],[],['12'],['TMP'],['12'],1,2,3,4\n\
             mv_gsl,,X,['FULL'],['P500'],['12'],['TMP'],['12'],1,2,3,4\n\
             mv_gsl,RAP,RAP,['FULL'],['P500'],['12'],['TMP'],['12'],1,2,3,4\n",
            HEADER
        );
        assert_eq!(db.load_metadata(MetadataTable::Prod, &csv).unwrap(), 1);
        let rows = db.query_all_metadata(MetadataTable::Prod).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].model, "RAP");
    }

    #[test]
    fn load_metadata_defaults_fcst_orig_to_fcst_lens() {
        let db = Database::new().unwrap();
        let csv = format!(
            "{}mv_gsl,GFS,GFS,['FULL'],['P500'],\"['6', '12']\",['TMP'],,1,2,3,4\n",
            HEADER
        );
        db.load_metadata(MetadataTable::Prod, &csv).unwrap();
        let rows = db.query_all_metadata(MetadataTable::Prod).unwrap();
        assert_eq!(rows[0].fcst_orig, vec!["6", "12"]);
    }

    #[test]
    fn load_metadata_rejects_bad_numbers() {
        let db = Database::new().unwrap();
        let csv = format!(
            "{}mv_gsl,GFS,GFS,['FULL'],['P500'],['12'],['TMP'],['12'],soon,2,3,4\n",
            HEADER
        );
        assert!(db.load_metadata(MetadataTable::Prod, &csv).is_err());
    }

    #[test]
    fn load_database_groups_replaces_by_name() {
        let db = Database::new().unwrap();
        let csv = "db_group,dbs\nNOAA,\"['mv_gsl', 'mv_ncep']\"\nNOAA,['mv_gsl']\n";
        assert_eq!(db.load_database_groups(MetadataTable::Prod, csv).unwrap(), 2);
        let groups = db.query_database_groups(MetadataTable::Prod).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].dbs, vec!["mv_gsl"]);
    }
}
