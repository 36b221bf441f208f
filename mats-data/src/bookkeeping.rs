//! Per-curve timing and statement records returned with a plot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Begin/finish timestamps of one processing step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub begin: String,
    pub finish: String,
    /// `"<seconds> seconds"`.
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<usize>,
}

impl Timing {
    fn new(begin: DateTime<Utc>, finish: DateTime<Utc>, record_count: Option<usize>) -> Self {
        let seconds = (finish - begin).num_milliseconds() as f64 / 1000.0;
        Timing {
            begin: begin.to_rfc3339(),
            finish: finish.to_rfc3339(),
            duration: format!("{} seconds", seconds),
            record_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataRequest {
    Statement(String),
    Timing(Timing),
}

/// The bookkeeping part of a plot result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookkeepingParams {
    pub data_requests: BTreeMap<String, DataRequest>,
    pub total_processing_start: DateTime<Utc>,
}

pub fn query_time_key(label: &str) -> String {
    format!("data retrieval (query) time - {}", label)
}

pub fn post_processing_key(label: &str) -> String {
    format!("post data retrieval (query) process time - {}", label)
}

#[derive(Debug, Clone)]
pub struct Bookkeeper {
    data_requests: BTreeMap<String, DataRequest>,
    total_processing_start: DateTime<Utc>,
}

impl Default for Bookkeeper {
    fn default() -> Self {
        Bookkeeper::new()
    }
}

impl Bookkeeper {
    /// Start the total processing clock.
    pub fn new() -> Self {
        Bookkeeper {
            data_requests: BTreeMap::new(),
            total_processing_start: Utc::now(),
        }
    }

    /// Record the rendered statement run for a curve.
    pub fn record_statement(&mut self, label: &str, statement: &str) {
        log::debug!("[MATS] bookkeeping: {} statement: {}", label, statement);
        self.data_requests
            .insert(label.to_string(), DataRequest::Statement(statement.to_string()));
    }

    pub fn record_query_time(
        &mut self,
        label: &str,
        begin: DateTime<Utc>,
        finish: DateTime<Utc>,
        record_count: usize,
    ) {
        let timing = Timing::new(begin, finish, Some(record_count));
        log::debug!(
            "[MATS] bookkeeping: {} query took {} for {} records",
            label,
            timing.duration,
            record_count
        );
        self.data_requests
            .insert(query_time_key(label), DataRequest::Timing(timing));
    }

    pub fn record_post_processing(
        &mut self,
        label: &str,
        begin: DateTime<Utc>,
        finish: DateTime<Utc>,
    ) {
        let timing = Timing::new(begin, finish, None);
        log::debug!("[MATS] bookkeeping: {} post-processing took {}", label, timing.duration);
        self.data_requests
            .insert(post_processing_key(label), DataRequest::Timing(timing));
    }

    #[cfg(test)]
    fn get(&self, key: &str) -> Option<&DataRequest> {
        self.data_requests.get(key)
    }

    pub fn into_params(self) -> BookkeepingParams {
        BookkeepingParams {
            data_requests: self.data_requests,
            total_processing_start: self.total_processing_start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn query_timing_has_duration_and_count() {
        let mut bookkeeper = Bookkeeper::new();
        let begin = Utc::now();
        bookkeeper.record_query_time("Curve0", begin, begin + TimeDelta::milliseconds(1500), 12);
        match bookkeeper.get("data retrieval (query) time - Curve0") {
            Some(DataRequest::Timing(timing)) => {
                assert_eq!(timing.duration, "1.5 seconds");
                assert_eq!(timing.record_count, Some(12));
            }
            other => panic!("unexpected entry {:?}", other),
        }
    }

    #[test]
    fn params_serialize_with_front_end_names() {
        let mut bookkeeper = Bookkeeper::new();
        let begin = Utc::now();
        bookkeeper.record_statement("Curve0", "select 1;");
        bookkeeper.record_post_processing("Curve0", begin, begin);

        let json = serde_json::to_value(bookkeeper.into_params()).unwrap();
        assert_eq!(json["dataRequests"]["Curve0"], "select 1;");
        let post = &json["dataRequests"]["post data retrieval (query) process time - Curve0"];
        assert_eq!(post["duration"], "0 seconds");
        assert!(post.get("recordCount").is_none());
        assert!(json["totalProcessingStart"].is_string());
    }
}
