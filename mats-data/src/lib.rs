//! Plot data functions for the MATS ensemble app.
//!
//! [`ReliabilityPlot`] turns a reliability plot request into one statement
//! per database curve, runs them through an injected [`QueryExecutor`],
//! folds the results into axis extents and curve annotations, and hands the
//! assembled [`PlotResult`] to a plot function.
//!
//! ```rust
//! use mats_data::{QueryExecutor, QueryRequest, ReliabilityPlot, SeriesCurveOptions, SubtractSeries};
//! use mats_types::catalog::{Catalog, DateRangeLabel, ModelOptions};
//! use mats_types::plot_params::{CurveSpec, PlotParams};
//! use mats_types::series::{QueryResult, SeriesData};
//! use std::collections::BTreeMap;
//!
//! struct Fixed;
//!
//! impl QueryExecutor for Fixed {
//!     fn execute(&self, _request: &QueryRequest<'_>) -> anyhow::Result<QueryResult> {
//!         Ok(QueryResult::with_data(SeriesData::from_points(vec![0.1, 0.3], vec![0.2, 0.4])))
//!     }
//! }
//!
//! let mut catalog = Catalog::new();
//! catalog.insert("mv_gsl", "HRRR_OPS", ModelOptions {
//!     model: "HRRR".to_string(),
//!     regions: vec!["CONUS".to_string()],
//!     levels: vec!["SFC".to_string()],
//!     variables: vec!["APCP_06".to_string()],
//!     forecast_lengths: vec![],
//!     forecast_values: BTreeMap::new(),
//!     dates: DateRangeLabel {
//!         min_date: "01/01/2020 00:00".to_string(),
//!         max_date: "02/01/2020 00:00".to_string(),
//!     },
//! });
//!
//! let params = PlotParams::new(
//!     "2020-01-01 - 2020-02-01",
//!     vec![CurveSpec::new("Curve0", "mv_gsl", "HRRR_OPS", "APCP_06")],
//! );
//! let plot = ReliabilityPlot::new(&catalog, Fixed, SubtractSeries, SeriesCurveOptions);
//! let annotation = plot.run(&params, |result| result.dataset[0].annotation.clone()).unwrap();
//! assert_eq!(annotation, "Curve0- mean = 0.2000");
//! ```

pub mod aggregate;
pub mod bookkeeping;
pub mod collaborators;
pub mod curve_options;
pub mod diff;
pub mod error;
pub mod reliability;
pub mod statement;

pub use collaborators::{CurveOptionsBuilder, DiffCalculator, QueryExecutor, QueryRequest};
pub use curve_options::SeriesCurveOptions;
pub use diff::SubtractSeries;
pub use error::PlotError;
pub use reliability::{PlotResult, ReliabilityPlot, AXIS_KEY};
pub use statement::{resolve_reliability_statement, Statement};
