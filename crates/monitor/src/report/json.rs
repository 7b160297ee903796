//! JSON report layout: a pretty-printed array of activity records.

use monitor_core::{Error, Result, TopicActivityInfo};

use crate::report::Reporter;

#[derive(Debug, Default)]
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for JsonReporter {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn report(&self, infos: &[TopicActivityInfo]) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(infos).map_err(|e| Error::report(e.to_string()))
    }
}
