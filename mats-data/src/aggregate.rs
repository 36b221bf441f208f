//! Running axis extents and per-curve statistics.

use crate::error::PlotError;
use mats_types::series::{Extents, QueryResult, ResultStatus, SeriesData};

/// What the database reported about one curve's query.
#[derive(Debug, Clone, Copy)]
pub struct QueryContext<'a> {
    pub statistic: &'a str,
    pub variable: &'a str,
    pub model: &'a str,
    pub regions: &'a [String],
}

/// Statistics stamped onto one curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveStats {
    pub mean: Option<f64>,
    pub annotation: String,
    /// False when the query matched no rows.
    pub data_found: bool,
    pub record_count: usize,
}

/// Format like JavaScript's `Number.prototype.toPrecision`.
///
/// Fixed notation for decimal exponents in `[-6, digits)`, `d.ddde+N`
/// otherwise.
pub fn to_precision(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", digits - 1, 0.0);
    }

    let sci = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = match exponent.parse() {
        Ok(e) => e,
        Err(_) => return sci,
    };
    if exponent < -6 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{}", mantissa, sign, exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        format!("{:.*}", decimals, value)
    }
}

/// `"<label>- mean = <mean>"`, or `NoData` in place of the mean.
pub fn annotation(label: &str, mean: Option<f64>) -> String {
    match mean {
        Some(mean) => format!("{}- mean = {}", label, to_precision(mean, 4)),
        None => format!("{}- mean = NoData", label),
    }
}

/// Accumulates extents across the curves of one plot request.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    extents: Extents,
    data_found_for_any_curve: bool,
}

impl Aggregator {
    pub fn new() -> Self {
        Aggregator::default()
    }

    pub fn extents(&self) -> Extents {
        self.extents
    }

    /// True once any database curve returned rows. Difference curves don't count.
    pub fn data_found_for_any_curve(&self) -> bool {
        self.data_found_for_any_curve
    }

    /// Classify a database curve's result and fold it in.
    ///
    /// A no-data result is recorded without touching the extents; any other
    /// error aborts the request.
    pub fn record_curve_result(
        &mut self,
        label: &str,
        result: &QueryResult,
        statement: &str,
        context: &QueryContext<'_>,
    ) -> Result<CurveStats, PlotError> {
        let data_found = match result.status() {
            ResultStatus::Data => true,
            ResultStatus::NoData => false,
            ResultStatus::Error(error) => {
                if error.to_lowercase().contains("unknown column") {
                    return Err(PlotError::UnsupportedStatisticVariableCombo {
                        statistic: context.statistic.to_string(),
                        variable: context.variable.to_string(),
                        model: context.model.to_string(),
                        regions: context.regions.to_vec(),
                    });
                }
                return Err(PlotError::GenericQueryError {
                    error: error.to_string(),
                    statement: statement.to_string(),
                });
            }
        };

        if data_found {
            self.data_found_for_any_curve = true;
            self.extents.fold(&result.data.extents());
        } else {
            log::info!("[MATS] aggregate: no data found for {}", label);
        }
        Ok(self.stats(label, &result.data, data_found))
    }

    /// Fold in a difference curve. Its extents always count.
    pub fn record_diff_curve(&mut self, label: &str, data: &SeriesData) -> CurveStats {
        self.extents.fold(&data.extents());
        self.stats(label, data, true)
    }

    fn stats(&self, label: &str, data: &SeriesData, data_found: bool) -> CurveStats {
        let mean = data.mean();
        CurveStats {
            mean,
            annotation: annotation(label, mean),
            data_found,
            record_count: data.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: QueryContext<'static> = QueryContext {
        statistic: "None",
        variable: "APCP_06",
        model: "HRRR",
        regions: &[],
    };

    fn points(x: Vec<f64>, y: Vec<f64>) -> QueryResult {
        QueryResult::with_data(SeriesData::from_points(x, y))
    }

    #[test]
    fn to_precision_matches_javascript() {
        assert_eq!(to_precision(2.0, 4), "2.000");
        assert_eq!(to_precision(0.5, 4), "0.5000");
        assert_eq!(to_precision(-0.123456, 4), "-0.1235");
        assert_eq!(to_precision(123.456, 4), "123.5");
        assert_eq!(to_precision(12346.0, 4), "1.235e+4");
        assert_eq!(to_precision(0.0000001234, 4), "1.234e-7");
        assert_eq!(to_precision(0.000001234, 4), "0.000001234");
        assert_eq!(to_precision(9.99996, 4), "10.00");
        assert_eq!(to_precision(0.0, 4), "0.000");
        assert_eq!(to_precision(f64::NAN, 4), "NaN");
    }

    #[test]
    fn mean_annotation() {
        let mut aggregator = Aggregator::new();
        let result = QueryResult::with_data(SeriesData {
            x: vec![1.0, 2.0, 3.0],
            y: vec![0.0, 0.0, 0.0],
            sum: Some(6.0),
            ..Default::default()
        });
        let stats = aggregator
            .record_curve_result("Curve0", &result, "select 1;", &CONTEXT)
            .unwrap();
        assert_eq!(stats.annotation, "Curve0- mean = 2.000");
        assert_eq!(stats.mean, Some(2.0));
        assert_eq!(stats.record_count, 3);
    }

    #[test]
    fn no_data_leaves_extents_untouched() {
        let mut aggregator = Aggregator::new();
        aggregator
            .record_curve_result("A", &points(vec![0.1, 0.9], vec![0.2, 0.8]), "s", &CONTEXT)
            .unwrap();
        let before = aggregator.extents();

        let stats = aggregator
            .record_curve_result("B", &QueryResult::no_data(), "s", &CONTEXT)
            .unwrap();
        assert!(!stats.data_found);
        assert_eq!(stats.annotation, "B- mean = NoData");
        assert_eq!(aggregator.extents(), before);
        assert!(aggregator.data_found_for_any_curve());
    }

    #[test]
    fn only_no_data_means_nothing_found() {
        let mut aggregator = Aggregator::new();
        aggregator
            .record_curve_result("A", &QueryResult::no_data(), "s", &CONTEXT)
            .unwrap();
        assert!(!aggregator.data_found_for_any_curve());
        assert!(aggregator.extents().is_seeded());
    }

    #[test]
    fn extents_are_elementwise_min_max() {
        let mut aggregator = Aggregator::new();
        aggregator
            .record_curve_result("A", &points(vec![0.1, 0.5], vec![0.3, 0.4]), "s", &CONTEXT)
            .unwrap();
        aggregator
            .record_curve_result("B", &points(vec![0.2, 0.9], vec![0.1, 0.35]), "s", &CONTEXT)
            .unwrap();
        assert_eq!(
            aggregator.extents(),
            Extents { xmin: 0.1, xmax: 0.9, ymin: 0.1, ymax: 0.4 }
        );
    }

    #[test]
    fn diff_curves_always_fold() {
        let mut aggregator = Aggregator::new();
        let stats =
            aggregator.record_diff_curve("D", &SeriesData::from_points(vec![0.5], vec![-0.2]));
        assert_eq!(
            aggregator.extents(),
            Extents { xmin: 0.5, xmax: 0.5, ymin: -0.2, ymax: -0.2 }
        );
        assert!(!aggregator.data_found_for_any_curve());
        assert_eq!(stats.annotation, "D- mean = 0.5000");
    }

    #[test]
    fn unknown_column_is_unsupported_combo() {
        let mut aggregator = Aggregator::new();
        let regions = vec!["CONUS".to_string(), "EAST".to_string()];
        let context = QueryContext { regions: &regions, ..CONTEXT };
        let err = aggregator
            .record_curve_result("A", &QueryResult::failed("Unknown column 'foo'"), "s", &context)
            .unwrap_err();
        assert_eq!(
            err,
            PlotError::UnsupportedStatisticVariableCombo {
                statistic: "None".to_string(),
                variable: "APCP_06".to_string(),
                model: "HRRR".to_string(),
                regions,
            }
        );
    }

    #[test]
    fn other_errors_carry_the_statement() {
        let mut aggregator = Aggregator::new();
        let err = aggregator
            .record_curve_result("A", &QueryResult::failed("syntax error"), "select 1;", &CONTEXT)
            .unwrap_err();
        assert_eq!(
            err,
            PlotError::GenericQueryError {
                error: "syntax error".to_string(),
                statement: "select 1;".to_string(),
            }
        );
    }
}
