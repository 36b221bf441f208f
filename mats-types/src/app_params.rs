//! Plot type and the application parameters handed to collaborators.

use crate::plot_params::PlotParams;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Plot types known to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PlotType {
    TimeSeries,
    Profile,
    DieOff,
    ValidTime,
    Histogram,
    Reliability,
}

/// Parameters shared by every curve of a single plot request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppParams {
    pub plot_type: PlotType,
    pub matching: bool,
    pub completeness: Value,
    pub outliers: Value,
    pub hide_gaps: bool,
    pub has_levels: bool,
}

impl AppParams {
    /// App parameters for a reliability plot request.
    pub fn reliability(plot_params: &PlotParams) -> Self {
        AppParams {
            plot_type: PlotType::Reliability,
            matching: plot_params.is_matched(),
            completeness: plot_params.completeness.clone(),
            outliers: plot_params.outliers.clone(),
            hide_gaps: plot_params.no_gaps_check,
            has_levels: true,
        }
    }
}
