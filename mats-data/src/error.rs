//! Error types for the plot data functions.

use thiserror::Error;

/// Errors that abort a whole plot request.
///
/// A curve whose query matched no rows is not an error; see
/// [`ResultStatus::NoData`](mats_types::series::ResultStatus::NoData).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    /// Every database curve came back empty.
    #[error("INFO:  No valid data for any curves.")]
    NoDataForAnyCurve,

    /// The query layer itself failed, as opposed to the database reporting an error.
    #[error("Error in queryDB: {message} for statement: {statement}")]
    QueryExecutionBug { message: String, statement: String },

    /// The database has no column for the requested statistic/variable.
    #[error(
        "INFO:  The statistic/variable combination [{statistic} and {variable}] is not supported by the database for the model/region [{model} and {}].",
        .regions.join(",")
    )]
    UnsupportedStatisticVariableCombo {
        statistic: String,
        variable: String,
        model: String,
        regions: Vec<String>,
    },

    /// Any other error reported by the database.
    #[error("Error from verification query: <br>{error}<br> query: <br>{statement}<br>")]
    GenericQueryError { error: String, statement: String },

    /// A difference curve names a curve that is not earlier in the request.
    #[error("curve '{label}' is a difference from '{diff_from}', which is not an earlier curve")]
    InvalidDiffReference { label: String, diff_from: String },

    #[error("duplicate curve label '{0}'")]
    DuplicateLabel(String),

    #[error("invalid plot date range '{dates}': {message}")]
    InvalidDateRange { dates: String, message: String },

    #[error("unknown data source '{data_source}' in database '{database}'")]
    UnknownDataSource { database: String, data_source: String },

    #[error("unknown forecast length '{forecast_length}' for '{data_source}' in database '{database}'")]
    UnknownForecastLength {
        database: String,
        data_source: String,
        forecast_length: String,
    },

    #[error("no levels known for '{data_source}' in database '{database}'")]
    UnknownLevels { database: String, data_source: String },

    /// A database or table name that cannot be placed in a statement.
    #[error("invalid SQL identifier '{0}'")]
    InvalidIdentifier(String),

    /// The difference collaborator failed.
    #[error("failed to compute difference curve '{label}': {message}")]
    DiffComputation { label: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_combo_lists_every_region() {
        let err = PlotError::UnsupportedStatisticVariableCombo {
            statistic: "None".to_string(),
            variable: "APCP_06".to_string(),
            model: "HRRR".to_string(),
            regions: vec!["CONUS".to_string(), "EAST".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "INFO:  The statistic/variable combination [None and APCP_06] is not supported by \
             the database for the model/region [HRRR and CONUS,EAST]."
        );
    }

    #[test]
    fn execution_bug_carries_statement() {
        let err = PlotError::QueryExecutionBug {
            message: "pool closed".to_string(),
            statement: "select 1;".to_string(),
        };
        assert_eq!(err.to_string(), "Error in queryDB: pool closed for statement: select 1;");
    }
}
