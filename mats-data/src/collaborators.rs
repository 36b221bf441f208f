//! Services the reliability data function depends on but does not implement.

use crate::statement::Statement;
use mats_types::app_params::AppParams;
use mats_types::dataset::{AxisMap, CurveBundle};
use mats_types::plot_params::CurveSpec;
use mats_types::series::{QueryResult, SeriesData};

/// Statistic line type the reliability query reads.
pub const STAT_LINE_TYPE: &str = "ensemble";

/// Reliability curves have no user-selectable statistic.
pub const STATISTIC: &str = "None";

/// One statement handed to the query layer.
#[derive(Debug, Clone, Copy)]
pub struct QueryRequest<'a> {
    pub statement: &'a Statement,
    pub stat_line_type: &'a str,
    pub statistic: &'a str,
    pub app_params: &'a AppParams,
    /// Quoted, comma-joined valid hours, empty when unset.
    pub valid_times: &'a str,
}

/// Runs statements against the verification database.
///
/// Implementations own their connection pool. A statement that matched no
/// rows is reported as [`QueryResult::no_data`]; database errors go in
/// [`QueryResult::error`]. `Err` is for failures of the query layer itself.
pub trait QueryExecutor {
    fn execute(&self, request: &QueryRequest<'_>) -> anyhow::Result<QueryResult>;
}

/// Computes a difference curve from curves already in the dataset.
pub trait DiffCalculator {
    fn diff_curve(
        &self,
        dataset: &[CurveBundle],
        diff_from: &str,
        app_params: &AppParams,
    ) -> anyhow::Result<SeriesData>;
}

/// Turns a processed curve into the bundle the plotting front-end draws.
pub trait CurveOptionsBuilder {
    fn build(
        &self,
        curve: &CurveSpec,
        index: usize,
        axis_map: &mut AxisMap,
        data: &SeriesData,
        app_params: &AppParams,
    ) -> CurveBundle;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn execute(&self, request: &QueryRequest<'_>) -> anyhow::Result<QueryResult> {
        (**self).execute(request)
    }
}

impl<T: DiffCalculator + ?Sized> DiffCalculator for &T {
    fn diff_curve(
        &self,
        dataset: &[CurveBundle],
        diff_from: &str,
        app_params: &AppParams,
    ) -> anyhow::Result<SeriesData> {
        (**self).diff_curve(dataset, diff_from, app_params)
    }
}

impl<T: CurveOptionsBuilder + ?Sized> CurveOptionsBuilder for &T {
    fn build(
        &self,
        curve: &CurveSpec,
        index: usize,
        axis_map: &mut AxisMap,
        data: &SeriesData,
        app_params: &AppParams,
    ) -> CurveBundle {
        (**self).build(curve, index, axis_map, data, app_params)
    }
}
