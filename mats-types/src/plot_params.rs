//! Plot request parameters as sent by the front-end.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Sentinel the front-end sends for a selector the user left unset.
pub const UNUSED: &str = "unused";

/// `plotAction` value requesting matched curves.
pub const PLOT_ACTION_MATCHED: &str = "matched";

/// A curve selector that may hold one value or many.
///
/// The front-end sends either a bare string, a number, or an array of either.
/// The [`UNUSED`] sentinel and `null` both deserialise to an empty selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection(Vec<String>);

impl Selection {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection(
            values
                .into_iter()
                .map(Into::into)
                .filter(|v: &String| v != UNUSED)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }
}

impl TryFrom<Value> for Selection {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        fn scalar(value: Value) -> Result<Option<String>, String> {
            match value {
                Value::Null => Ok(None),
                Value::String(s) if s == UNUSED => Ok(None),
                Value::String(s) => Ok(Some(s)),
                Value::Number(n) => Ok(Some(n.to_string())),
                other => Err(format!("unsupported selector value: {}", other)),
            }
        }

        match value {
            Value::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(v) = scalar(item)? {
                        values.push(v);
                    }
                }
                Ok(Selection(values))
            }
            other => Ok(Selection(scalar(other)?.into_iter().collect())),
        }
    }
}

impl<'de> Deserialize<'de> for Selection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Selection::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// One curve the user asked to plot.
///
/// Field names follow the front-end's curve parameter names. Parameters this
/// crate does not interpret (statistic, curve-dates, ...) are kept in `extra`
/// so curve text patterns can still render them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSpec {
    pub label: String,
    pub database: String,
    #[serde(rename = "data-source")]
    pub data_source: String,
    #[serde(default, skip_serializing_if = "Selection::is_empty")]
    pub region: Selection,
    #[serde(default)]
    pub variable: String,
    #[serde(default, alias = "pres-level", skip_serializing_if = "Selection::is_empty")]
    pub level: Selection,
    #[serde(
        rename = "forecast-length",
        default,
        skip_serializing_if = "Selection::is_empty"
    )]
    pub forecast_length: Selection,
    #[serde(rename = "valid-time", default, skip_serializing_if = "Selection::is_empty")]
    pub valid_time: Selection,
    /// Label of an earlier curve this curve is computed as a difference from.
    #[serde(rename = "diffFrom", default, skip_serializing_if = "Option::is_none")]
    pub diff_from: Option<String>,

    // Stamped during processing.
    #[serde(rename = "axisKey", default, skip_serializing_if = "Option::is_none")]
    pub axis_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xmin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xmax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ymin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ymax: Option<f64>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CurveSpec {
    /// Create a database-backed curve with no filters set.
    pub fn new(label: &str, database: &str, data_source: &str, variable: &str) -> Self {
        CurveSpec {
            label: label.to_string(),
            database: database.to_string(),
            data_source: data_source.to_string(),
            region: Selection::default(),
            variable: variable.to_string(),
            level: Selection::default(),
            forecast_length: Selection::default(),
            valid_time: Selection::default(),
            diff_from: None,
            axis_key: None,
            annotation: None,
            xmin: None,
            xmax: None,
            ymin: None,
            ymax: None,
            extra: BTreeMap::new(),
        }
    }

    /// Create a difference curve referencing an earlier curve by label.
    pub fn diff(label: &str, database: &str, data_source: &str, diff_from: &str) -> Self {
        let mut curve = CurveSpec::new(label, database, data_source, "");
        curve.diff_from = Some(diff_from.to_string());
        curve
    }

    pub fn is_diff(&self) -> bool {
        self.diff_from.is_some()
    }

    /// Display text for a named curve parameter, if the curve has a value for it.
    ///
    /// Multi-valued selectors are comma-joined.
    pub fn param_text(&self, name: &str) -> Option<String> {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let joined = |sel: &Selection| (!sel.is_empty()).then(|| sel.values().join(","));
        match name {
            "label" => non_empty(&self.label),
            "database" => non_empty(&self.database),
            "data-source" => non_empty(&self.data_source),
            "variable" => non_empty(&self.variable),
            "region" => joined(&self.region),
            "level" | "pres-level" => joined(&self.level),
            "forecast-length" => joined(&self.forecast_length),
            "valid-time" => joined(&self.valid_time),
            other => match self.extra.get(other)? {
                Value::String(s) if s == UNUSED => None,
                Value::String(s) => non_empty(s),
                Value::Number(n) => Some(n.to_string()),
                Value::Array(items) => {
                    let parts: Vec<String> = items
                        .iter()
                        .filter_map(|v| match v {
                            Value::String(s) => Some(s.clone()),
                            Value::Number(n) => Some(n.to_string()),
                            _ => None,
                        })
                        .collect();
                    (!parts.is_empty()).then(|| parts.join(","))
                }
                _ => None,
            },
        }
    }
}

/// The whole plot request as collected by the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotParams {
    /// `"<start> - <end>"` date range.
    pub dates: String,
    #[serde(rename = "plotAction", default)]
    pub plot_action: String,
    #[serde(default)]
    pub completeness: Value,
    #[serde(default)]
    pub outliers: Value,
    #[serde(rename = "noGapsCheck", default)]
    pub no_gaps_check: bool,
    #[serde(default)]
    pub curves: Vec<CurveSpec>,
}

impl PlotParams {
    pub fn new(dates: &str, curves: Vec<CurveSpec>) -> Self {
        PlotParams {
            dates: dates.to_string(),
            plot_action: PLOT_ACTION_MATCHED.to_string(),
            completeness: Value::from("0"),
            outliers: Value::from("all"),
            no_gaps_check: false,
            curves,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.plot_action == PLOT_ACTION_MATCHED
    }
}
