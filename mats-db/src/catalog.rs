//! Builds the curve parameter [`Catalog`] from metadata rows.

use crate::models::{DatabaseGroup, MetadataRow};
use crate::schema::MetadataTable;
use crate::Database;
use mats_types::catalog::{Catalog, DateRangeLabel, ModelOptions};
use mats_utils::dates::{default_date_window, format_metadata_date};
use mats_utils::lists::display_forecast_lead;
use std::collections::BTreeMap;

/// Map each displayed forecast length to the raw stored values behind it.
///
/// Numeric raw values are grouped under their display lead. Display values
/// with no numeric raw value (e.g. `"dflt"` placeholders in `fcst_orig`) map
/// to themselves.
pub fn forecast_value_map(
    fcst_lens: &[String],
    fcst_orig: &[String],
) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for raw in fcst_orig {
        if let Ok(value) = raw.parse::<i64>() {
            let values = map
                .entry(display_forecast_lead(value).to_string())
                .or_default();
            if !values.contains(raw) {
                values.push(raw.clone());
            }
        }
    }
    for display in fcst_lens {
        map.entry(display.clone())
            .or_insert_with(|| vec![display.clone()]);
    }
    map
}

fn model_options(row: &MetadataRow) -> anyhow::Result<ModelOptions> {
    Ok(ModelOptions {
        model: row.model.clone(),
        regions: row.regions.clone(),
        levels: row.levels.clone(),
        variables: row.variables.clone(),
        forecast_lengths: row.fcst_lens.clone(),
        forecast_values: forecast_value_map(&row.fcst_lens, &row.fcst_orig),
        dates: DateRangeLabel {
            min_date: format_metadata_date(row.mindate)?,
            max_date: format_metadata_date(row.maxdate)?,
        },
    })
}

/// Build a catalog from metadata rows and database groups.
///
/// Databases are listed in row order. The default date range is the last
/// [`DEFAULT_WINDOW_DAYS`](mats_utils::dates::DEFAULT_WINDOW_DAYS) of the
/// default database's first data source.
pub fn catalog_from_rows(
    rows: &[MetadataRow],
    groups: &[DatabaseGroup],
) -> anyhow::Result<Catalog> {
    let mut catalog = Catalog::new();
    for row in rows {
        catalog.insert(&row.db, &row.display_text, model_options(row)?);
    }
    for group in groups {
        catalog
            .database_groups
            .insert(group.group.clone(), group.dbs.clone());
    }

    let default_dates = catalog
        .default_database()
        .and_then(|db| {
            let ds = catalog.default_data_source(db)?;
            catalog.model_options(db, ds)
        })
        .map(|options| default_date_window(&options.dates.min_date, &options.dates.max_date))
        .transpose()?;
    catalog.default_dates = default_dates.map(|(min, max)| format!("{} - {}", min, max));
    Ok(catalog)
}

impl Database {
    /// Build the catalog from the production tables.
    pub fn build_catalog(&self) -> anyhow::Result<Catalog> {
        let rows = self.query_all_metadata(MetadataTable::Prod)?;
        let groups = self.query_database_groups(MetadataTable::Prod)?;
        let catalog = catalog_from_rows(&rows, &groups)?;
        log::info!(
            "[MATS] catalog: built catalog with {} databases",
            catalog.databases.len()
        );
        Ok(catalog)
    }
}
