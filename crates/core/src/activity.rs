//! Per-topic activity records produced by one report cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Activity observed for one topic during one report cycle.
///
/// Built fresh every cycle and discarded once serialized. `active` is always
/// recomputed from the two timestamps and the configured inactivity window;
/// it is never carried over from a previous cycle.
///
/// Field names are serialized in PascalCase to match the report wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicActivityInfo {
    /// Broker topic identifier.
    pub topic_name: String,
    /// Timestamp of the newest record across all partitions.
    /// `None` means no records were observed.
    pub last_write_time: Option<DateTime<Utc>>,
    /// Most recent valid timestamp recovered from any consumer group's
    /// committed-offset metadata. `None` means nothing recoverable.
    pub last_read_time: Option<DateTime<Utc>>,
    /// Partition count observed for the topic.
    pub partition_number: usize,
    /// Whether the topic had activity within the inactivity window.
    pub active: bool,
}

impl TopicActivityInfo {
    pub fn new(topic_name: impl Into<String>) -> Self {
        Self {
            topic_name: topic_name.into(),
            last_write_time: None,
            last_read_time: None,
            partition_number: 0,
            active: false,
        }
    }
}
