//! Row models for the metadata tables.

use serde::Serialize;
use std::collections::BTreeSet;

/// One (database, model) row of the metadata table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetadataRow {
    /// Verification database name (e.g. "mv_gsl").
    pub db: String,
    /// Raw model value as stored in `stat_header.model`.
    pub model: String,
    /// Model name shown to users.
    pub display_text: String,
    pub regions: Vec<String>,
    pub levels: Vec<String>,
    /// Forecast leads as displayed.
    pub fcst_lens: Vec<String>,
    pub variables: Vec<String>,
    /// Forecast leads as stored; may be `"dflt"` placeholders.
    pub fcst_orig: Vec<String>,
    /// First valid time, unix seconds.
    pub mindate: i64,
    /// Last valid time, unix seconds.
    pub maxdate: i64,
    pub numrecs: i64,
    pub updated: i64,
}

impl MetadataRow {
    /// Display name for a raw model value when none is given.
    pub fn default_display_text(model: &str) -> String {
        model.replace('.', "_")
    }

    /// A row is only worth offering if every selector has options.
    pub fn is_complete(&self) -> bool {
        !self.regions.is_empty()
            && !self.levels.is_empty()
            && !self.fcst_lens.is_empty()
            && !self.variables.is_empty()
    }

    /// Merge a newer scrape of the same (db, model) into this row.
    ///
    /// Differing list fields become the sorted union of both; the date range
    /// widens, and `numrecs`/`updated` keep the larger value.
    pub fn reconcile(&self, newer: &MetadataRow) -> MetadataRow {
        fn merge(a: &[String], b: &[String]) -> Vec<String> {
            if a == b {
                return a.to_vec();
            }
            a.iter()
                .chain(b.iter())
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        }

        MetadataRow {
            db: self.db.clone(),
            model: self.model.clone(),
            display_text: newer.display_text.clone(),
            regions: merge(&self.regions, &newer.regions),
            levels: merge(&self.levels, &newer.levels),
            fcst_lens: merge(&self.fcst_lens, &newer.fcst_lens),
            variables: merge(&self.variables, &newer.variables),
            fcst_orig: merge(&self.fcst_orig, &newer.fcst_orig),
            mindate: self.mindate.min(newer.mindate),
            maxdate: self.maxdate.max(newer.maxdate),
            numrecs: self.numrecs.max(newer.numrecs),
            updated: self.updated.max(newer.updated),
        }
    }
}

/// A named group of verification databases.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatabaseGroup {
    pub group: String,
    pub dbs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn row(levels: &[&str], mindate: i64, maxdate: i64, numrecs: i64) -> MetadataRow {
        MetadataRow {
            db: "mv_gsl".to_string(),
            model: "GFS.0.25".to_string(),
            display_text: MetadataRow::default_display_text("GFS.0.25"),
            regions: strings(&["FULL"]),
            levels: strings(levels),
            fcst_lens: strings(&["12"]),
            variables: strings(&["TMP"]),
            fcst_orig: strings(&["120000"]),
            mindate,
            maxdate,
            numrecs,
            updated: maxdate,
        }
    }

    #[test]
    fn display_text_replaces_dots() {
        assert_eq!(MetadataRow::default_display_text("GFS.0.25"), "GFS_0_25");
    }

    #[test]
    fn reconcile_unions_lists_and_widens_dates() {
        let old = row(&["P850", "P500"], 100, 200, 10);
        let new = row(&["P250"], 150, 300, 5);
        let merged = old.reconcile(&new);
        assert_eq!(merged.levels, strings(&["P250", "P500", "P850"]));
        assert_eq!(merged.regions, strings(&["FULL"]));
        assert_eq!(merged.mindate, 100);
        assert_eq!(merged.maxdate, 300);
        assert_eq!(merged.numrecs, 10);
        assert_eq!(merged.updated, 300);
    }

    #[test]
    fn reconcile_keeps_identical_list_order() {
        let old = row(&["P850", "P500"], 100, 200, 10);
        let merged = old.reconcile(&old.clone());
        assert_eq!(merged.levels, strings(&["P850", "P500"]));
    }

    #[test]
    fn incomplete_rows_are_detected() {
        let mut r = row(&["P500"], 1, 2, 3);
        assert!(r.is_complete());
        r.variables.clear();
        assert!(!r.is_complete());
    }
}
