//! The reliability plot data function.
//!
//! Curves are processed in request order. Database curves are resolved to a
//! statement and executed; difference curves are computed from curves
//! earlier in the request. Once every curve is processed the assembled
//! [`PlotResult`] is handed to the plot function exactly once.

use crate::aggregate::{Aggregator, CurveStats, QueryContext};
use crate::bookkeeping::{Bookkeeper, BookkeepingParams};
use crate::collaborators::{
    CurveOptionsBuilder, DiffCalculator, QueryExecutor, QueryRequest, STATISTIC, STAT_LINE_TYPE,
};
use crate::error::PlotError;
use crate::statement::resolve_reliability_statement;
use chrono::{DateTime, Utc};
use mats_types::app_params::AppParams;
use mats_types::catalog::Catalog;
use mats_types::dataset::{AxisMap, CurveBundle};
use mats_types::plot_params::{CurveSpec, PlotParams};
use mats_types::series::{Extents, SeriesData};
use mats_utils::dates::{parse_plot_date_range, DateRangeSecs};
use serde::Serialize;
use std::collections::HashSet;

/// Axis key shared by every reliability curve.
pub const AXIS_KEY: &str = "reliability";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveInfoParams {
    /// The request's curves, stamped with axis key, annotation and extents.
    pub curves: Vec<CurveSpec>,
    pub curves_length: usize,
    pub axis_map: AxisMap,
    #[serde(flatten)]
    pub extents: Extents,
}

/// Everything handed to the plot function.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotResult {
    pub dataset: Vec<CurveBundle>,
    pub app_params: AppParams,
    pub curve_info_params: CurveInfoParams,
    pub plot_params: PlotParams,
    pub bookkeeping: BookkeepingParams,
}

struct ProcessedCurve {
    data: SeriesData,
    stats: CurveStats,
    post_processing_start: DateTime<Utc>,
}

/// Reliability plot data function with its collaborators injected.
pub struct ReliabilityPlot<'a, E, D, C> {
    catalog: &'a Catalog,
    executor: E,
    diff: D,
    curve_options: C,
}

impl<'a, E, D, C> ReliabilityPlot<'a, E, D, C>
where
    E: QueryExecutor,
    D: DiffCalculator,
    C: CurveOptionsBuilder,
{
    pub fn new(catalog: &'a Catalog, executor: E, diff: D, curve_options: C) -> Self {
        ReliabilityPlot {
            catalog,
            executor,
            diff,
            curve_options,
        }
    }

    /// Process every curve of `plot_params` and pass the result to `plot_function`.
    ///
    /// Any error aborts the whole request and `plot_function` is not called.
    pub fn run<R, F>(&self, plot_params: &PlotParams, plot_function: F) -> Result<R, PlotError>
    where
        F: FnOnce(PlotResult) -> R,
    {
        let mut bookkeeper = Bookkeeper::new();
        let mut curves = plot_params.curves.clone();

        let mut labels = HashSet::new();
        for curve in &curves {
            if !labels.insert(curve.label.as_str()) {
                return Err(PlotError::DuplicateLabel(curve.label.clone()));
            }
        }

        let date_range =
            parse_plot_date_range(&plot_params.dates).map_err(|e| PlotError::InvalidDateRange {
                dates: plot_params.dates.clone(),
                message: e.to_string(),
            })?;
        let app_params = AppParams::reliability(plot_params);
        let mut aggregator = Aggregator::new();
        let mut dataset: Vec<CurveBundle> = Vec::with_capacity(curves.len());
        let mut axis_map = AxisMap::new();

        for (index, curve) in curves.iter_mut().enumerate() {
            curve.axis_key = Some(AXIS_KEY.to_string());

            let processed = match curve.diff_from.clone() {
                None => self.database_curve(
                    curve,
                    &date_range,
                    &app_params,
                    &mut aggregator,
                    &mut bookkeeper,
                )?,
                Some(diff_from) => {
                    self.diff_curve(curve, &diff_from, &dataset, &app_params, &mut aggregator)?
                }
            };

            curve.annotation = Some(processed.stats.annotation.clone());
            curve.xmin = processed.data.xmin;
            curve.xmax = processed.data.xmax;
            curve.ymin = processed.data.ymin;
            curve.ymax = processed.data.ymax;

            let bundle =
                self.curve_options
                    .build(curve, index, &mut axis_map, &processed.data, &app_params);
            dataset.push(bundle);
            bookkeeper.record_post_processing(
                &curve.label,
                processed.post_processing_start,
                Utc::now(),
            );
        }

        if !aggregator.data_found_for_any_curve() {
            return Err(PlotError::NoDataForAnyCurve);
        }

        log::info!(
            "[MATS] reliability: processed {} curves",
            dataset.len()
        );
        let curves_length = curves.len();
        let result = PlotResult {
            dataset,
            app_params,
            curve_info_params: CurveInfoParams {
                curves,
                curves_length,
                axis_map,
                extents: aggregator.extents(),
            },
            plot_params: plot_params.clone(),
            bookkeeping: bookkeeper.into_params(),
        };
        Ok(plot_function(result))
    }

    fn database_curve(
        &self,
        curve: &CurveSpec,
        date_range: &DateRangeSecs,
        app_params: &AppParams,
        aggregator: &mut Aggregator,
        bookkeeper: &mut Bookkeeper,
    ) -> Result<ProcessedCurve, PlotError> {
        let resolved = resolve_reliability_statement(curve, date_range, self.catalog)?;
        let rendered = resolved.statement.render();
        bookkeeper.record_statement(&curve.label, &rendered);

        let request = QueryRequest {
            statement: &resolved.statement,
            stat_line_type: STAT_LINE_TYPE,
            statistic: STATISTIC,
            app_params,
            valid_times: &resolved.valid_times,
        };
        let begin = Utc::now();
        let result = self
            .executor
            .execute(&request)
            .map_err(|e| PlotError::QueryExecutionBug {
                message: e.to_string(),
                statement: rendered.clone(),
            })?;
        bookkeeper.record_query_time(&curve.label, begin, Utc::now(), result.data.len());

        let post_processing_start = Utc::now();
        let context = QueryContext {
            statistic: STATISTIC,
            variable: &curve.variable,
            model: &resolved.model,
            regions: &resolved.regions,
        };
        let stats = aggregator.record_curve_result(&curve.label, &result, &rendered, &context)?;
        Ok(ProcessedCurve {
            data: result.data,
            stats,
            post_processing_start,
        })
    }

    fn diff_curve(
        &self,
        curve: &CurveSpec,
        diff_from: &str,
        dataset: &[CurveBundle],
        app_params: &AppParams,
        aggregator: &mut Aggregator,
    ) -> Result<ProcessedCurve, PlotError> {
        if !dataset.iter().any(|c| c.label == diff_from) {
            return Err(PlotError::InvalidDiffReference {
                label: curve.label.clone(),
                diff_from: diff_from.to_string(),
            });
        }
        let post_processing_start = Utc::now();
        let data = self
            .diff
            .diff_curve(dataset, diff_from, app_params)
            .map_err(|e| PlotError::DiffComputation {
                label: curve.label.clone(),
                message: e.to_string(),
            })?;
        let stats = aggregator.record_diff_curve(&curve.label, &data);
        Ok(ProcessedCurve {
            data,
            stats,
            post_processing_start,
        })
    }
}
