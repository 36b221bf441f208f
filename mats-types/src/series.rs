//! Query results and the per-curve series they carry.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Error text the query layer returns when a statement matched no rows.
///
/// This is a "no data" condition, not a failure.
pub const NO_DATA_FOUND: &str = "INFO:  No Data Found in Database";

/// Axis extents across one or more curves.
///
/// A freshly seeded value holds `+inf` minimums and `-inf` maximums so that the
/// first real fold replaces all four bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extents {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Extents {
    pub fn seeded() -> Self {
        Extents {
            xmin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymin: f64::INFINITY,
            ymax: f64::NEG_INFINITY,
        }
    }

    /// Widen these extents to cover `other`. Never narrows.
    pub fn fold(&mut self, other: &Extents) {
        self.xmin = self.xmin.min(other.xmin);
        self.xmax = self.xmax.max(other.xmax);
        self.ymin = self.ymin.min(other.ymin);
        self.ymax = self.ymax.max(other.ymax);
    }

    /// True while no finite bound has been folded in.
    pub fn is_seeded(&self) -> bool {
        *self == Extents::seeded()
    }
}

impl Default for Extents {
    fn default() -> Self {
        Extents::seeded()
    }
}

/// Series data for one curve as produced by the query layer.
///
/// `x`/`y` are the plotted points. Plot-type specific arrays (bin values,
/// thresholds, hit counts, ...) pass through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    #[serde(default)]
    pub x: Vec<f64>,
    #[serde(default)]
    pub y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
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

impl SeriesData {
    /// Build a series from points, deriving sum and extents.
    pub fn from_points(x: Vec<f64>, y: Vec<f64>) -> Self {
        let mut extents = Extents::seeded();
        for v in &x {
            extents.xmin = extents.xmin.min(*v);
            extents.xmax = extents.xmax.max(*v);
        }
        for v in &y {
            extents.ymin = extents.ymin.min(*v);
            extents.ymax = extents.ymax.max(*v);
        }
        let finite = |v: f64| v.is_finite().then_some(v);
        SeriesData {
            sum: Some(x.iter().sum()),
            xmin: finite(extents.xmin),
            xmax: finite(extents.xmax),
            ymin: finite(extents.ymin),
            ymax: finite(extents.ymax),
            x,
            y,
            extra: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Mean of the x values: `sum / count`, with `sum` falling back to the
    /// sum of `x` when the query layer did not provide one.
    ///
    /// `None` when there are no points.
    pub fn mean(&self) -> Option<f64> {
        if self.x.is_empty() {
            return None;
        }
        let sum = self.sum.unwrap_or_else(|| self.x.iter().sum());
        let mean = sum / self.x.len() as f64;
        mean.is_finite().then_some(mean)
    }

    /// The extents reported with this series. Missing bounds stay at their
    /// seeded sentinels so folding them is a no-op.
    pub fn extents(&self) -> Extents {
        let seeded = Extents::seeded();
        Extents {
            xmin: self.xmin.unwrap_or(seeded.xmin),
            xmax: self.xmax.unwrap_or(seeded.xmax),
            ymin: self.ymin.unwrap_or(seeded.ymin),
            ymax: self.ymax.unwrap_or(seeded.ymax),
        }
    }
}

/// How a [`QueryResult`] should be treated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus<'a> {
    Data,
    NoData,
    Error(&'a str),
}

/// Normalized result bundle returned by the query layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub data: SeriesData,
    #[serde(default)]
    pub error: String,
}

impl QueryResult {
    pub fn with_data(data: SeriesData) -> Self {
        QueryResult {
            data,
            error: String::new(),
        }
    }

    pub fn no_data() -> Self {
        QueryResult {
            data: SeriesData::default(),
            error: NO_DATA_FOUND.to_string(),
        }
    }

    pub fn failed(error: &str) -> Self {
        QueryResult {
            data: SeriesData::default(),
            error: error.to_string(),
        }
    }

    pub fn status(&self) -> ResultStatus<'_> {
        match self.error.as_str() {
            "" => ResultStatus::Data,
            NO_DATA_FOUND => ResultStatus::NoData,
            other => ResultStatus::Error(other),
        }
    }
}
