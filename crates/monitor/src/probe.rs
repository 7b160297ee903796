//! Per-topic activity probe.
//!
//! Derives a topic's last-write and last-read timestamps from broker
//! primitives. The probe is a pure function of broker state at the time of
//! the call; nothing is cached between cycles.

use chrono::{DateTime, Utc};
use kafka_gateway::{BrokerGateway, OffsetPosition};
use monitor_core::{Error, Result, TopicActivityInfo};
use tracing::{debug, warn};

/// Probes one topic and returns its activity info with `active` unset.
///
/// Partition or group listing failures fail the probe; a single unreadable
/// partition is only a warning. Callers are expected to log probe failures
/// and continue with the next topic.
pub async fn probe_topic(gateway: &dyn BrokerGateway, topic: &str) -> Result<TopicActivityInfo> {
    let partitions = gateway.partitions(topic).await?;

    let mut info = TopicActivityInfo::new(topic);
    info.partition_number = partitions.len();
    info.last_write_time = last_write(gateway, topic, &partitions).await;
    info.last_read_time = last_read(gateway, topic, &partitions).await?;

    Ok(info)
}

/// Maximum record timestamp across all non-empty partitions.
///
/// Empty partitions are a legitimate "no data yet" state, not an error, and
/// per-partition fetch failures (including timeouts) only skip the partition.
async fn last_write(
    gateway: &dyn BrokerGateway,
    topic: &str,
    partitions: &[i32],
) -> Option<DateTime<Utc>> {
    let mut last_write: Option<DateTime<Utc>> = None;

    for &partition in partitions {
        let newest = match partition_newest_timestamp(gateway, topic, partition).await {
            Ok(timestamp) => timestamp,
            Err(e) => {
                warn!(topic, partition, error = %e, "Skipping unreadable partition");
                continue;
            }
        };

        if let Some(ts) = newest {
            if last_write.is_none_or(|current| ts > current) {
                last_write = Some(ts);
            }
        }
    }

    last_write
}

/// Timestamp of the newest record in one partition, or `None` if empty.
async fn partition_newest_timestamp(
    gateway: &dyn BrokerGateway,
    topic: &str,
    partition: i32,
) -> Result<Option<DateTime<Utc>>> {
    let oldest = gateway
        .fetch_offset(topic, partition, OffsetPosition::Oldest)
        .await?;
    let newest = gateway
        .fetch_offset(topic, partition, OffsetPosition::Newest)
        .await?;

    if newest <= oldest {
        debug!(topic, partition, "Partition is empty");
        return Ok(None);
    }

    // The newest offset is the next offset to be written; the newest record
    // sits immediately before it.
    let record = gateway.consume_at(topic, partition, newest - 1).await?;
    Ok(record.timestamp)
}

/// Maximum timestamp recovered from committed-offset metadata across every
/// consumer group on the cluster.
///
/// Groups are cluster-wide, so this is an O(groups) scan per topic. Entries
/// without a commit or with unparsable metadata are skipped silently: the
/// timestamp-in-metadata convention is opportunistic, and unrelated consumers
/// may legitimately commit arbitrary strings.
async fn last_read(
    gateway: &dyn BrokerGateway,
    topic: &str,
    partitions: &[i32],
) -> Result<Option<DateTime<Utc>>> {
    let groups = gateway
        .list_groups()
        .await
        .map_err(|e| Error::group_listing(topic, e.to_string()))?;

    let mut last_read: Option<DateTime<Utc>> = None;

    for group in &groups {
        let committed = gateway.committed_offsets(group, topic, partitions).await?;

        for entry in committed.values() {
            // Negative offset means no commit exists for this partition.
            if entry.offset < 0 {
                continue;
            }

            if let Some(ts) = parse_offset_metadata(&entry.metadata) {
                if last_read.is_none_or(|current| ts > current) {
                    last_read = Some(ts);
                }
            }
        }
    }

    Ok(last_read)
}

/// Attempts to recover a timestamp from commit metadata.
///
/// Only a string that is exactly an RFC 3339 timestamp parses; anything else
/// (prefixes, JSON envelopes, epoch millis) yields `None`.
pub fn parse_offset_metadata(metadata: &str) -> Option<DateTime<Utc>> {
    if metadata.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(metadata)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
