//! Curve parameter catalog built from the metadata tables.
//!
//! The catalog holds the option lists offered for each database and data
//! source (model display name), and the lookups the plot data functions need
//! to translate user selections into database values:
//!
//! - data source display name → raw model value
//! - data source → full level list (used when no level is selected)
//! - forecast length display value → raw stored lead values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// First and last available valid date for a model, `MM/DD/YYYY HH:mm` (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeLabel {
    pub min_date: String,
    pub max_date: String,
}

/// Options for one data source within one database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOptions {
    /// Raw model value as stored in `stat_header.model`.
    pub model: String,
    pub regions: Vec<String>,
    pub levels: Vec<String>,
    pub variables: Vec<String>,
    /// Forecast lengths as displayed to the user.
    pub forecast_lengths: Vec<String>,
    /// Displayed forecast length → raw `fcst_lead` values.
    pub forecast_values: BTreeMap<String, Vec<String>>,
    pub dates: DateRangeLabel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Databases in display order; the first one is the default.
    pub databases: Vec<String>,
    /// Database → data source display name → options.
    pub models: BTreeMap<String, BTreeMap<String, ModelOptions>>,
    /// Group name → databases in the group.
    pub database_groups: BTreeMap<String, Vec<String>>,
    /// Default `"<start> - <end>"` date range for the default database/model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_dates: Option<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Register a data source. Databases are listed in first-insert order.
    pub fn insert(&mut self, database: &str, data_source: &str, options: ModelOptions) {
        if !self.databases.iter().any(|d| d == database) {
            self.databases.push(database.to_string());
        }
        self.models
            .entry(database.to_string())
            .or_default()
            .insert(data_source.to_string(), options);
    }

    pub fn model_options(&self, database: &str, data_source: &str) -> Option<&ModelOptions> {
        self.models.get(database)?.get(data_source)
    }

    /// Raw model value for a data source display name.
    pub fn model(&self, database: &str, data_source: &str) -> Option<&str> {
        self.model_options(database, data_source)
            .map(|o| o.model.as_str())
    }

    pub fn levels(&self, database: &str, data_source: &str) -> Option<&[String]> {
        self.model_options(database, data_source)
            .map(|o| o.levels.as_slice())
    }

    /// Raw stored values for a displayed forecast length.
    pub fn forecast_values(
        &self,
        database: &str,
        data_source: &str,
        forecast_length: &str,
    ) -> Option<&[String]> {
        self.model_options(database, data_source)?
            .forecast_values
            .get(forecast_length)
            .map(Vec::as_slice)
    }

    pub fn default_database(&self) -> Option<&str> {
        self.databases.first().map(String::as_str)
    }

    /// First data source (alphabetically) of a database.
    pub fn default_data_source(&self, database: &str) -> Option<&str> {
        self.models
            .get(database)?
            .keys()
            .next()
            .map(String::as_str)
    }
}
