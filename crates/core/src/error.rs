//! Unified error types for the topic activity monitor.
//!
//! Variants map onto how the report cycle reacts to them:
//! - `Connection` aborts startup.
//! - `TopicListing` and `Report` abort one report cycle.
//! - `PartitionListing`, `GroupListing` and `CommittedOffsets` skip one topic.
//! - `OffsetLookup`, `Consume` and `Timeout` skip one partition.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the topic activity monitor.
#[derive(Debug, Error)]
pub enum Error {
    /// Broker connection could not be established at startup.
    #[error("broker connection failed: {0}")]
    Connection(String),

    /// Listing topics for a report cycle failed.
    #[error("failed to list topics: {0}")]
    TopicListing(String),

    /// Listing partitions for one topic failed.
    #[error("failed to list partitions for topic {topic}: {message}")]
    PartitionListing { topic: String, message: String },

    /// Enumerating consumer groups while probing one topic failed.
    #[error("failed to list consumer groups for topic {topic}: {message}")]
    GroupListing { topic: String, message: String },

    /// Committed-offset lookup for one group failed.
    #[error("failed to list offsets for group {group} on topic {topic}: {message}")]
    CommittedOffsets {
        group: String,
        topic: String,
        message: String,
    },

    /// Oldest/newest offset lookup for one partition failed.
    #[error("failed to get offset for {topic}/{partition}: {message}")]
    OffsetLookup {
        topic: String,
        partition: i32,
        message: String,
    },

    /// Consuming a single record from one partition failed.
    #[error("failed to consume from {topic}/{partition}: {message}")]
    Consume {
        topic: String,
        partition: i32,
        message: String,
    },

    /// A blocking broker call exceeded its deadline.
    #[error("broker call timed out: {0}")]
    Timeout(String),

    /// Serializing a finished report failed.
    #[error("report serialization failed: {0}")]
    Report(String),

    /// The coordinator worker is no longer accepting requests.
    #[error("report worker unavailable")]
    WorkerGone,

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn topic_listing(msg: impl Into<String>) -> Self {
        Self::TopicListing(msg.into())
    }

    pub fn partition_listing(topic: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::PartitionListing {
            topic: topic.into(),
            message: msg.into(),
        }
    }

    pub fn group_listing(topic: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::GroupListing {
            topic: topic.into(),
            message: msg.into(),
        }
    }

    pub fn committed_offsets(
        group: impl Into<String>,
        topic: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::CommittedOffsets {
            group: group.into(),
            topic: topic.into(),
            message: msg.into(),
        }
    }

    pub fn offset_lookup(topic: impl Into<String>, partition: i32, msg: impl Into<String>) -> Self {
        Self::OffsetLookup {
            topic: topic.into(),
            partition,
            message: msg.into(),
        }
    }

    pub fn consume(topic: impl Into<String>, partition: i32, msg: impl Into<String>) -> Self {
        Self::Consume {
            topic: topic.into(),
            partition,
            message: msg.into(),
        }
    }

    pub fn report(msg: impl Into<String>) -> Self {
        Self::Report(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error aborts a whole report cycle rather than one topic.
    pub fn is_cycle_fatal(&self) -> bool {
        matches!(self, Self::TopicListing(_) | Self::Report(_))
    }
}
