//! Publishing staged (`_dev`) metadata into the production tables.

use crate::loader::{insert_group, insert_row};
use crate::models::DatabaseGroup;
use crate::schema::MetadataTable;
use crate::Database;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// What [`Database::publish_metadata`] did to the production tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishSummary {
    /// Rows new to production.
    pub inserted: usize,
    /// Rows merged with an existing production row.
    pub reconciled: usize,
    /// Rows whose production copy already covered the staged one.
    pub unchanged: usize,
    pub groups: usize,
}

impl Database {
    /// Reconcile the `_dev` tables into production in one transaction.
    ///
    /// Production rows without a staged counterpart are left alone.
    pub fn publish_metadata(&self) -> anyhow::Result<PublishSummary> {
        let staged = self.query_all_metadata(MetadataTable::Dev)?;
        let prod: BTreeMap<(String, String), _> = self
            .query_all_metadata(MetadataTable::Prod)?
            .into_iter()
            .map(|row| ((row.db.clone(), row.model.clone()), row))
            .collect();
        let staged_groups = self.query_database_groups(MetadataTable::Dev)?;
        let prod_groups: BTreeMap<String, Vec<String>> = self
            .query_database_groups(MetadataTable::Prod)?
            .into_iter()
            .map(|g| (g.group, g.dbs))
            .collect();

        let mut summary = PublishSummary::default();
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;

        for row in &staged {
            match prod.get(&(row.db.clone(), row.model.clone())) {
                Some(existing) => {
                    let merged = existing.reconcile(row);
                    if &merged == existing {
                        summary.unchanged += 1;
                    } else {
                        insert_row(&tx, MetadataTable::Prod, &merged)?;
                        summary.reconciled += 1;
                    }
                }
                None => {
                    insert_row(&tx, MetadataTable::Prod, row)?;
                    summary.inserted += 1;
                }
            }
        }

        for group in &staged_groups {
            let dbs = match prod_groups.get(&group.group) {
                Some(existing) => existing
                    .iter()
                    .chain(group.dbs.iter())
                    .cloned()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect(),
                None => group.dbs.clone(),
            };
            insert_group(
                &tx,
                MetadataTable::Prod,
                &DatabaseGroup {
                    group: group.group.clone(),
                    dbs,
                },
            )?;
            summary.groups += 1;
        }

        tx.commit()?;
        log::info!(
            "[MATS] publish: inserted {}, reconciled {}, unchanged {}, groups {}",
            summary.inserted,
            summary.reconciled,
            summary.unchanged,
            summary.groups
        );
        Ok(summary)
    }
}
