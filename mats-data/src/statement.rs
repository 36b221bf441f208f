//! Reliability statement resolution.
//!
//! Filter values are never spliced into the SQL text. Each one becomes a `?`
//! placeholder with a matching entry in [`Statement::binds`]; only the
//! database and table names are written into the text, after validation.
//! [`Statement::render`] produces the substituted text for bookkeeping and
//! error messages.

use crate::error::PlotError;
use mats_types::catalog::Catalog;
use mats_types::plot_params::{CurveSpec, Selection};
use mats_utils::dates::DateRangeSecs;
use serde::Serialize;
use std::fmt;

/// Line data table holding probability (reliability) lines.
pub const LINE_DATA_TYPE: &str = "line_data_pct";

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Int(i64),
    Text(String),
}

impl SqlValue {
    /// Integer when the text is one, text otherwise.
    pub fn parse(value: &str) -> SqlValue {
        value
            .trim()
            .parse()
            .map(SqlValue::Int)
            .unwrap_or_else(|_| SqlValue::Text(value.to_string()))
    }

    fn render(&self) -> String {
        match self {
            SqlValue::Int(v) => v.to_string(),
            SqlValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }
}

/// SQL text with `?` placeholders and the values bound to them, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<SqlValue>,
}

impl Statement {
    /// The statement with every placeholder replaced by its quoted value.
    pub fn render(&self) -> String {
        let mut binds = self.binds.iter().peekable();
        let mut out = String::with_capacity(self.sql.len() + self.binds.len() * 8);
        for c in self.sql.chars() {
            match (c, binds.next_if(|_| c == '?')) {
                (_, Some(value)) => out.push_str(&value.render()),
                (c, None) => out.push(c),
            }
        }
        out
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Everything the orchestrator needs to run one database curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCurveQuery {
    pub statement: Statement,
    /// Quoted, comma-joined valid hours (`'0','12'`), empty when unset.
    pub valid_times: String,
    /// Raw model value the data source resolved to.
    pub model: String,
    pub regions: Vec<String>,
}

fn identifier(name: &str) -> Result<&str, PlotError> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(name)
    } else {
        Err(PlotError::InvalidIdentifier(name.to_string()))
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}

fn in_clause(column: &str, values: &[SqlValue], binds: &mut Vec<SqlValue>) -> String {
    binds.extend(values.iter().cloned());
    format!("and {} IN({})", column, placeholders(values.len()))
}

fn texts(selection: &Selection) -> Vec<SqlValue> {
    selection
        .values()
        .iter()
        .map(|v| SqlValue::Text(v.clone()))
        .collect()
}

/// Build the reliability statement for one database curve.
///
/// Region, valid time and forecast length filters are left out when unset.
/// An unset level selection filters on every level the catalog knows for the
/// model instead of being left out.
pub fn resolve_reliability_statement(
    curve: &CurveSpec,
    date_range: &DateRangeSecs,
    catalog: &Catalog,
) -> Result<ResolvedCurveQuery, PlotError> {
    let database = identifier(&curve.database)?;
    let line_data = identifier(LINE_DATA_TYPE)?;
    let model = catalog
        .model(&curve.database, &curve.data_source)
        .ok_or_else(|| PlotError::UnknownDataSource {
            database: curve.database.clone(),
            data_source: curve.data_source.clone(),
        })?
        .to_string();

    let mut forecast_values = Vec::new();
    for fl in curve.forecast_length.values() {
        let raw = catalog
            .forecast_values(&curve.database, &curve.data_source, fl)
            .ok_or_else(|| PlotError::UnknownForecastLength {
                database: curve.database.clone(),
                data_source: curve.data_source.clone(),
                forecast_length: fl.clone(),
            })?;
        forecast_values.extend(raw.iter().map(|v| SqlValue::parse(v)));
    }

    let levels = if curve.level.is_empty() {
        match catalog.levels(&curve.database, &curve.data_source) {
            Some(levels) if !levels.is_empty() => {
                levels.iter().map(|l| SqlValue::Text(l.clone())).collect()
            }
            _ => {
                return Err(PlotError::UnknownLevels {
                    database: curve.database.clone(),
                    data_source: curve.data_source.clone(),
                })
            }
        }
    } else {
        texts(&curve.level)
    };

    let valid_hours: Vec<SqlValue> = curve
        .valid_time
        .values()
        .iter()
        .map(|v| SqlValue::parse(v))
        .collect();
    let valid_times = curve
        .valid_time
        .values()
        .iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(",");

    let mut binds = vec![SqlValue::Text(model.clone())];
    let mut filters = Vec::new();
    if !curve.region.is_empty() {
        filters.push(in_clause("h.vx_mask", &texts(&curve.region), &mut binds));
    }
    filters.push("and unix_timestamp(ld.fcst_valid_beg) >= ?".to_string());
    binds.push(SqlValue::Int(date_range.from_seconds));
    filters.push("and unix_timestamp(ld.fcst_valid_beg) <= ?".to_string());
    binds.push(SqlValue::Int(date_range.to_seconds));
    if !valid_hours.is_empty() {
        filters.push(in_clause(
            "floor(unix_timestamp(ld.fcst_valid_beg)%(24*3600)/3600)",
            &valid_hours,
            &mut binds,
        ));
    }
    if !forecast_values.is_empty() {
        filters.push(in_clause("ld.fcst_lead", &forecast_values, &mut binds));
    }
    filters.push("and h.fcst_var = ?".to_string());
    binds.push(SqlValue::Text(curve.variable.clone()));
    filters.push(in_clause("h.fcst_lev", &levels, &mut binds));

    let sql = format!(
        "select unix_timestamp(ld.fcst_valid_beg) as avtime, \
         count(distinct unix_timestamp(ld.fcst_valid_beg)) as N_times, \
         min(unix_timestamp(ld.fcst_valid_beg)) as min_secs, \
         max(unix_timestamp(ld.fcst_valid_beg)) as max_secs, \
         sum(ld.total) as N0, \
         ldt.i_value as bin_number, \
         ldt.thresh_i as threshold, \
         sum(ldt.oy_i) as oy_i, \
         sum(ldt.on_i) as on_i \
         from {db}.stat_header h, {db}.{ld} ld, {db}.{ld}_thresh ldt \
         where 1=1 \
         and h.model = ? \
         {filters} \
         and ld.stat_header_id = h.stat_header_id \
         and ld.line_data_id = ldt.line_data_id \
         group by avtime, bin_number, threshold \
         order by avtime;",
        db = database,
        ld = line_data,
        filters = filters.join(" "),
    );

    let statement = Statement { sql, binds };
    log::debug!("[MATS] statement: {} -> {}", curve.label, statement);
    Ok(ResolvedCurveQuery {
        statement,
        valid_times,
        model,
        regions: curve.region.values().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mats_types::catalog::{DateRangeLabel, ModelOptions};
    use std::collections::BTreeMap;

    fn sample_catalog() -> Catalog {
        let mut forecast_values = BTreeMap::new();
        forecast_values.insert("6".to_string(), vec!["60000".to_string(), "6".to_string()]);
        forecast_values.insert("12".to_string(), vec!["120000".to_string()]);
        let mut catalog = Catalog::new();
        catalog.insert(
            "mv_gsl",
            "HRRR_OPS",
            ModelOptions {
                model: "HRRR".to_string(),
                regions: vec!["CONUS".to_string(), "EAST".to_string()],
                levels: vec!["SFC".to_string(), "Z0".to_string()],
                variables: vec!["APCP_06".to_string()],
                forecast_lengths: vec!["6".to_string(), "12".to_string()],
                forecast_values,
                dates: DateRangeLabel {
                    min_date: "01/01/2020 00:00".to_string(),
                    max_date: "02/01/2020 00:00".to_string(),
                },
            },
        );
        catalog
    }

    const RANGE: DateRangeSecs = DateRangeSecs {
        from_seconds: 1577836800,
        to_seconds: 1580515200,
    };

    fn curve() -> CurveSpec {
        CurveSpec::new("Curve0", "mv_gsl", "HRRR_OPS", "APCP_06")
    }

    #[test]
    fn render_substitutes_in_order() {
        let statement = Statement {
            sql: "a = ? and b IN(?,?)".to_string(),
            binds: vec![
                SqlValue::Text("it's".to_string()),
                SqlValue::Int(3),
                SqlValue::Text("x".to_string()),
            ],
        };
        assert_eq!(statement.render(), "a = 'it''s' and b IN(3,'x')");
    }

    #[test]
    fn unset_filters_are_omitted() {
        let resolved = resolve_reliability_statement(&curve(), &RANGE, &sample_catalog()).unwrap();
        let sql = &resolved.statement.sql;
        assert!(!sql.contains("h.vx_mask"));
        assert!(!sql.contains("ld.fcst_lead"));
        assert!(!sql.contains("%(24*3600)"));
        assert_eq!(resolved.valid_times, "");
        assert_eq!(resolved.model, "HRRR");
        assert!(resolved.regions.is_empty());
    }

    #[test]
    fn unset_level_uses_every_known_level() {
        let resolved = resolve_reliability_statement(&curve(), &RANGE, &sample_catalog()).unwrap();
        assert!(resolved
            .statement
            .render()
            .contains("and h.fcst_lev IN('SFC','Z0')"));
    }

    #[test]
    fn selected_levels_replace_the_catalog_list() {
        let mut curve = curve();
        curve.level = Selection::new(["Z0"]);
        let resolved = resolve_reliability_statement(&curve, &RANGE, &sample_catalog()).unwrap();
        assert!(resolved.statement.render().contains("and h.fcst_lev IN('Z0')"));
    }

    #[test]
    fn model_without_levels_is_an_error() {
        let mut catalog = sample_catalog();
        if let Some(models) = catalog.models.get_mut("mv_gsl") {
            if let Some(options) = models.get_mut("HRRR_OPS") {
                options.levels.clear();
            }
        }
        assert_eq!(
            resolve_reliability_statement(&curve(), &RANGE, &catalog),
            Err(PlotError::UnknownLevels {
                database: "mv_gsl".to_string(),
                data_source: "HRRR_OPS".to_string(),
            })
        );
    }

    #[test]
    fn full_statement_renders() {
        let mut curve = curve();
        curve.region = Selection::new(["CONUS", "EAST"]);
        curve.forecast_length = Selection::new(["6", "12"]);
        curve.valid_time = Selection::new(["0", "12"]);
        let resolved = resolve_reliability_statement(&curve, &RANGE, &sample_catalog()).unwrap();
        assert_eq!(resolved.valid_times, "'0','12'");
        assert_eq!(resolved.regions, vec!["CONUS", "EAST"]);
        assert_eq!(
            resolved.statement.render(),
            "select unix_timestamp(ld.fcst_valid_beg) as avtime, \
             count(distinct unix_timestamp(ld.fcst_valid_beg)) as N_times, \
             min(unix_timestamp(ld.fcst_valid_beg)) as min_secs, \
             max(unix_timestamp(ld.fcst_valid_beg)) as max_secs, \
             sum(ld.total) as N0, \
             ldt.i_value as bin_number, \
             ldt.thresh_i as threshold, \
             sum(ldt.oy_i) as oy_i, \
             sum(ldt.on_i) as on_i \
             from mv_gsl.stat_header h, mv_gsl.line_data_pct ld, mv_gsl.line_data_pct_thresh ldt \
             where 1=1 \
             and h.model = 'HRRR' \
             and h.vx_mask IN('CONUS','EAST') \
             and unix_timestamp(ld.fcst_valid_beg) >= 1577836800 \
             and unix_timestamp(ld.fcst_valid_beg) <= 1580515200 \
             and floor(unix_timestamp(ld.fcst_valid_beg)%(24*3600)/3600) IN(0,12) \
             and ld.fcst_lead IN(60000,6,120000) \
             and h.fcst_var = 'APCP_06' \
             and h.fcst_lev IN('SFC','Z0') \
             and ld.stat_header_id = h.stat_header_id \
             and ld.line_data_id = ldt.line_data_id \
             group by avtime, bin_number, threshold \
             order by avtime;"
        );
        assert_eq!(
            resolved.statement.binds.len(),
            resolved.statement.sql.matches('?').count()
        );
    }

    #[test]
    fn unknown_lookups_fail() {
        let mut bad_source = curve();
        bad_source.data_source = "NAM".to_string();
        assert!(matches!(
            resolve_reliability_statement(&bad_source, &RANGE, &sample_catalog()),
            Err(PlotError::UnknownDataSource { .. })
        ));

        let mut bad_lead = curve();
        bad_lead.forecast_length = Selection::new(["9"]);
        assert!(matches!(
            resolve_reliability_statement(&bad_lead, &RANGE, &sample_catalog()),
            Err(PlotError::UnknownForecastLength { forecast_length, .. }) if forecast_length == "9"
        ));
    }

    #[test]
    fn database_name_must_be_an_identifier() {
        let mut curve = curve();
        curve.database = "mv_gsl; drop table x".to_string();
        assert_eq!(
            resolve_reliability_statement(&curve, &RANGE, &sample_catalog()),
            Err(PlotError::InvalidIdentifier("mv_gsl; drop table x".to_string()))
        );
    }
}
