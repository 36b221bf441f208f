//! Curve text patterns used to build the descriptive text shown for a curve.
//!
//! A pattern is an ordered list of `(prefix, parameter, suffix)` parts. For
//! each part whose parameter has a value on the curve, `prefix + value +
//! suffix` is appended to the text.

use crate::app_params::PlotType;
use crate::plot_params::CurveSpec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPart {
    pub prefix: String,
    pub param: String,
    pub suffix: String,
}

impl TextPart {
    fn new(prefix: &str, param: &str, suffix: &str) -> Self {
        TextPart {
            prefix: prefix.to_string(),
            param: param.to_string(),
            suffix: suffix.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveTextPattern {
    pub plot_type: PlotType,
    pub text_pattern: Vec<TextPart>,
    /// Parameters shown in the curve's parameter summary, in order.
    pub display_params: Vec<String>,
    pub group_size: usize,
}

impl CurveTextPattern {
    fn build(plot_type: PlotType, parts: &[(&str, &str, &str)], display_params: &[&str]) -> Self {
        CurveTextPattern {
            plot_type,
            text_pattern: parts
                .iter()
                .map(|(prefix, param, suffix)| TextPart::new(prefix, param, suffix))
                .collect(),
            display_params: display_params.iter().map(|p| p.to_string()).collect(),
            group_size: 6,
        }
    }

    /// The patterns for every plot type the application offers.
    pub fn defaults() -> Vec<CurveTextPattern> {
        vec![
            Self::build(
                PlotType::TimeSeries,
                &[
                    ("", "label", ": "),
                    ("", "data-source", " in "),
                    ("", "region", ", "),
                    ("", "variable", " "),
                    ("", "statistic", ", "),
                    ("level: ", "pres-level", ", "),
                    ("fcst_len: ", "forecast-length", "h, "),
                    ("valid-time: ", "valid-time", ", "),
                    ("avg: ", "average", " "),
                ],
                &[
                    "label", "data-source", "region", "statistic", "variable", "valid-time",
                    "average", "forecast-length", "pres-level",
                ],
            ),
            Self::build(
                PlotType::Profile,
                &[
                    ("", "label", ": "),
                    ("", "data-source", " in "),
                    ("", "region", ", "),
                    ("", "variable", " "),
                    ("", "statistic", ", "),
                    ("level: ", "pres-level", ", "),
                    ("fcst_len: ", "forecast-length", "h, "),
                    ("valid-time: ", "valid-time", ", "),
                    ("", "curve-dates", ""),
                ],
                &[
                    "label", "data-source", "region", "statistic", "variable", "valid-time",
                    "forecast-length", "pres-level", "curve-dates",
                ],
            ),
            Self::build(
                PlotType::DieOff,
                &[
                    ("", "label", ": "),
                    ("", "data-source", " in "),
                    ("", "region", ", "),
                    ("", "variable", " "),
                    ("", "statistic", ", "),
                    ("level: ", "pres-level", ", "),
                    ("", "dieoff-forecast-length", ", "),
                    ("valid-time: ", "valid-time", ", "),
                    ("start utc: ", "utc-cycle-start", ", "),
                    ("", "curve-dates", ""),
                ],
                &[
                    "label", "data-source", "region", "statistic", "variable",
                    "dieoff-forecast-length", "valid-time", "utc-cycle-start", "pres-level",
                    "curve-dates",
                ],
            ),
            Self::build(
                PlotType::ValidTime,
                &[
                    ("", "label", ": "),
                    ("", "data-source", " in "),
                    ("", "region", ", "),
                    ("", "variable", " "),
                    ("", "statistic", ", "),
                    ("level: ", "pres-level", ", "),
                    ("fcst_len: ", "forecast-length", "h, "),
                    ("", "curve-dates", ""),
                ],
                &[
                    "label", "data-source", "region", "statistic", "variable", "forecast-length",
                    "pres-level", "curve-dates",
                ],
            ),
            Self::build(
                PlotType::Histogram,
                &[
                    ("", "label", ": "),
                    ("", "data-source", " in "),
                    ("", "region", ", "),
                    ("", "variable", " "),
                    ("", "statistic", ", "),
                    ("level: ", "pres-level", ", "),
                    ("fcst_len: ", "forecast-length", "h, "),
                    ("valid-time: ", "valid-time", ", "),
                    ("", "curve-dates", ""),
                ],
                &[
                    "label", "data-source", "region", "statistic", "variable", "valid-time",
                    "forecast-length", "pres-level", "curve-dates",
                ],
            ),
            Self::build(
                PlotType::Reliability,
                &[
                    ("", "label", ": "),
                    ("", "data-source", " in "),
                    ("", "region", ", "),
                    ("", "variable", ", "),
                    ("level: ", "level", ", "),
                    ("fcst_len: ", "forecast-length", "h, "),
                    ("valid-time: ", "valid-time", ""),
                ],
                &[
                    "label", "data-source", "region", "variable", "valid-time",
                    "forecast-length", "level",
                ],
            ),
        ]
    }

    pub fn for_plot_type(plot_type: PlotType) -> Option<CurveTextPattern> {
        Self::defaults()
            .into_iter()
            .find(|p| p.plot_type == plot_type)
    }

    pub fn render(&self, curve: &CurveSpec) -> String {
        let mut text = String::new();
        for part in &self.text_pattern {
            if let Some(value) = curve.param_text(&part.param) {
                text.push_str(&part.prefix);
                text.push_str(&value);
                text.push_str(&part.suffix);
            }
        }
        text
    }
}
