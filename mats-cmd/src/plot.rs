//! Reliability plot commands.

use crate::store::{open_store, read_file};
use mats_data::{
    resolve_reliability_statement, QueryExecutor, QueryRequest, ReliabilityPlot,
    SeriesCurveOptions, SubtractSeries,
};
use mats_types::app_params::PlotType;
use mats_types::plot_params::PlotParams;
use mats_types::text_pattern::CurveTextPattern;
use mats_types::series::QueryResult;
use mats_utils::dates::parse_plot_date_range;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Replays query results captured from a live database, one per statement.
pub struct RecordedResults {
    results: RefCell<VecDeque<QueryResult>>,
}

impl RecordedResults {
    pub fn new(results: Vec<QueryResult>) -> Self {
        RecordedResults {
            results: RefCell::new(results.into()),
        }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let results: Vec<QueryResult> = serde_json::from_str(json)?;
        Ok(RecordedResults::new(results))
    }

    pub fn remaining(&self) -> usize {
        self.results.borrow().len()
    }
}

impl QueryExecutor for RecordedResults {
    fn execute(&self, request: &QueryRequest<'_>) -> anyhow::Result<QueryResult> {
        log::debug!("[MATS] recorded: replaying result for {}", request.statement);
        self.results
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no recorded result left"))
    }
}

#[derive(Serialize)]
struct ResolvedStatement {
    label: String,
    text: String,
    model: String,
    statement: String,
    sql: String,
    binds: Vec<mats_data::statement::SqlValue>,
    #[serde(rename = "validTimes")]
    valid_times: String,
}

fn load_params(params_path: &str) -> anyhow::Result<PlotParams> {
    let json = read_file(params_path, "plot params")?;
    Ok(serde_json::from_str(&json)?)
}

/// Resolve the statement of every database curve and render them as JSON.
pub fn statement_report(params_path: &str, metadata: &str) -> anyhow::Result<String> {
    let params = load_params(params_path)?;
    let catalog = open_store(metadata)?.build_catalog()?;
    let date_range = parse_plot_date_range(&params.dates)?;
    let pattern = CurveTextPattern::for_plot_type(PlotType::Reliability)
        .ok_or_else(|| anyhow::anyhow!("no curve text pattern for reliability plots"))?;

    let mut resolved = Vec::new();
    for curve in params.curves.iter().filter(|c| !c.is_diff()) {
        let query = resolve_reliability_statement(curve, &date_range, &catalog)?;
        resolved.push(ResolvedStatement {
            label: curve.label.clone(),
            text: pattern.render(curve),
            model: query.model,
            statement: query.statement.render(),
            sql: query.statement.sql,
            binds: query.statement.binds,
            valid_times: query.valid_times,
        });
    }
    Ok(serde_json::to_string_pretty(&resolved)?)
}

/// Run a reliability plot request against recorded results and render the
/// plot result as JSON.
pub fn reliability_report(
    params_path: &str,
    metadata: &str,
    results_path: &str,
) -> anyhow::Result<String> {
    let params = load_params(params_path)?;
    let catalog = open_store(metadata)?.build_catalog()?;
    let executor = RecordedResults::from_json(&read_file(results_path, "query results")?)?;

    let plot = ReliabilityPlot::new(&catalog, &executor, SubtractSeries, SeriesCurveOptions);
    let payload = plot.run(&params, |result| serde_json::to_string_pretty(&result))??;
    if executor.remaining() > 0 {
        log::warn!(
            "[MATS] reliability: {} recorded results were not used",
            executor.remaining()
        );
    }
    Ok(payload)
}
