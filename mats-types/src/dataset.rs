//! Plottable curve bundles and the axis map they are assigned against.

use crate::series::{Extents, SeriesData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One y-axis shared by every curve stamped with the same axis key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisEntry {
    /// Zero-based axis number, assigned in order of first use.
    pub index: usize,
    pub label: String,
    pub extents: Extents,
}

/// Axis key → axis.
pub type AxisMap = BTreeMap<String, AxisEntry>;

/// A curve ready for the plotting front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveBundle {
    pub label: String,
    pub annotation: String,
    pub axis_key: String,
    pub axis_index: usize,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_from: Option<String>,
    pub data: SeriesData,
}
