//! Broker capability set required by the activity probe.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use monitor_core::Result;
use std::collections::HashMap;

/// Which end of a partition's offset range to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetPosition {
    Oldest,
    Newest,
}

/// A single record read from a partition.
#[derive(Debug, Clone)]
pub struct ConsumedRecord {
    /// Broker-assigned record timestamp, if present.
    pub timestamp: Option<DateTime<Utc>>,
    pub payload: Option<Vec<u8>>,
}

/// One consumer group's committed position on one partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedOffset {
    /// Committed offset; negative means no commit exists.
    pub offset: i64,
    /// Free-form metadata attached to the commit.
    pub metadata: String,
}

/// Broker-level primitives the monitor needs.
///
/// Implementations own the client connection; callers never see broker
/// handles directly. All calls are expected to complete within a bounded
/// timeout and surface failures as [`monitor_core::Error`].
#[async_trait]
pub trait BrokerGateway: Send + Sync {
    /// Lists all non-internal topics on the cluster.
    async fn list_topics(&self) -> Result<Vec<String>>;

    /// Lists the partition ids of one topic.
    async fn partitions(&self, topic: &str) -> Result<Vec<i32>>;

    /// Fetches the oldest or newest available offset of one partition.
    async fn fetch_offset(&self, topic: &str, partition: i32, position: OffsetPosition)
        -> Result<i64>;

    /// Consumes exactly one record at the given offset, blocking until it
    /// arrives or the consume deadline passes.
    async fn consume_at(&self, topic: &str, partition: i32, offset: i64)
        -> Result<ConsumedRecord>;

    /// Enumerates every consumer group known to the cluster.
    async fn list_groups(&self) -> Result<Vec<String>>;

    /// Looks up one group's committed offsets (with metadata) for the given
    /// partitions of one topic. Partitions without a commit may be absent or
    /// carry a negative offset.
    async fn committed_offsets(
        &self,
        group: &str,
        topic: &str,
        partitions: &[i32],
    ) -> Result<HashMap<i32, CommittedOffset>>;
}
