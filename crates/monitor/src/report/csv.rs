//! CSV report layout.
//!
//! Header row then one row per topic:
//! `Topic,LastWriteTime,LastReadTime,PartitionNumber,Active`
//! Timestamps are RFC 3339 at second granularity; absent timestamps render as
//! empty fields. No quoting is needed: Kafka topic names are limited to
//! `[a-zA-Z0-9._-]`.

use chrono::{DateTime, SecondsFormat, Utc};
use monitor_core::{Error, Result, TopicActivityInfo};
use std::fmt::Write;

use crate::report::Reporter;

const HEADER: &str = "Topic,LastWriteTime,LastReadTime,PartitionNumber,Active";

#[derive(Debug, Default)]
pub struct CsvReporter;

impl CsvReporter {
    pub fn new() -> Self {
        Self
    }
}

fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

impl Reporter for CsvReporter {
    fn content_type(&self) -> &'static str {
        "text/csv"
    }

    fn report(&self, infos: &[TopicActivityInfo]) -> Result<Vec<u8>> {
        let mut out = String::with_capacity(64 * (infos.len() + 1));
        out.push_str(HEADER);
        out.push('\n');

        for info in infos {
            writeln!(
                out,
                "{},{},{},{},{}",
                info.topic_name,
                format_timestamp(info.last_write_time),
                format_timestamp(info.last_read_time),
                info.partition_number,
                info.active,
            )
            .map_err(|e| Error::report(e.to_string()))?;
        }

        Ok(out.into_bytes())
    }
}
