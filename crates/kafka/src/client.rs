//! rdkafka-backed implementation of [`BrokerGateway`].
//!
//! librdkafka's `BaseConsumer` is synchronous, so every call runs inside
//! `spawn_blocking` with a bounded timeout. The metadata consumer is created
//! once and owned for the process lifetime; committed-offset lookups build a
//! throwaway consumer per group, because librdkafka only exposes committed
//! offsets for the `group.id` a consumer was configured with.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use monitor_core::{Error, Result};
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::message::Message;
use rdkafka::{Offset, TopicPartitionList};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::KafkaConfig;
use crate::gateway::{BrokerGateway, CommittedOffset, ConsumedRecord, OffsetPosition};

/// group.id used for metadata-only consumers; never joins a group or commits.
const ADMIN_GROUP_ID: &str = "topic-activity-monitor";

/// Production broker gateway over librdkafka.
pub struct KafkaGateway {
    config: KafkaConfig,
    consumer: Arc<BaseConsumer>,
}

impl KafkaGateway {
    /// Connects to the cluster and verifies it is reachable.
    ///
    /// A failed metadata round-trip here is fatal: the process cannot do
    /// anything useful without a broker connection.
    pub async fn connect(config: KafkaConfig) -> Result<Self> {
        let consumer = Arc::new(base_consumer(&config, ADMIN_GROUP_ID)?);

        let probe = consumer.clone();
        let timeout = config.request_timeout();
        let broker_count = tokio::task::spawn_blocking(move || {
            probe
                .fetch_metadata(None, timeout)
                .map(|metadata| metadata.brokers().len())
        })
        .await
        .map_err(|e| Error::internal(e.to_string()))?
        .map_err(|e| Error::connection(e.to_string()))?;

        info!(
            brokers = %config.brokers(),
            broker_count,
            "Connected to Kafka cluster"
        );

        Ok(Self { config, consumer })
    }
}

fn base_consumer(config: &KafkaConfig, group_id: &str) -> Result<BaseConsumer> {
    ClientConfig::new()
        .set("bootstrap.servers", config.brokers())
        .set("group.id", group_id)
        .set("enable.auto.commit", "false")
        .set("enable.partition.eof", "false")
        .create()
        .map_err(|e| Error::connection(e.to_string()))
}

#[async_trait]
impl BrokerGateway for KafkaGateway {
    async fn list_topics(&self) -> Result<Vec<String>> {
        let consumer = self.consumer.clone();
        let timeout = self.config.request_timeout();

        tokio::task::spawn_blocking(move || {
            let metadata = consumer
                .fetch_metadata(None, timeout)
                .map_err(|e| Error::topic_listing(e.to_string()))?;

            Ok(metadata
                .topics()
                .iter()
                .map(|t| t.name().to_string())
                .filter(|name| !name.starts_with("__"))
                .collect())
        })
        .await
        .map_err(|e| Error::internal(e.to_string()))?
    }

    async fn partitions(&self, topic: &str) -> Result<Vec<i32>> {
        let consumer = self.consumer.clone();
        let timeout = self.config.request_timeout();
        let topic = topic.to_string();

        tokio::task::spawn_blocking(move || {
            let metadata = consumer
                .fetch_metadata(Some(&topic), timeout)
                .map_err(|e| Error::partition_listing(&topic, e.to_string()))?;

            let found = metadata
                .topics()
                .iter()
                .find(|t| t.name() == topic)
                .ok_or_else(|| Error::partition_listing(&topic, "topic not in metadata"))?;

            if let Some(err) = found.error() {
                return Err(Error::partition_listing(&topic, format!("{err:?}")));
            }

            Ok(found.partitions().iter().map(|p| p.id()).collect())
        })
        .await
        .map_err(|e| Error::internal(e.to_string()))?
    }

    async fn fetch_offset(
        &self,
        topic: &str,
        partition: i32,
        position: OffsetPosition,
    ) -> Result<i64> {
        let consumer = self.consumer.clone();
        let timeout = self.config.request_timeout();
        let topic = topic.to_string();

        tokio::task::spawn_blocking(move || {
            let (low, high) = consumer
                .fetch_watermarks(&topic, partition, timeout)
                .map_err(|e| Error::offset_lookup(&topic, partition, e.to_string()))?;

            Ok(match position {
                OffsetPosition::Oldest => low,
                OffsetPosition::Newest => high,
            })
        })
        .await
        .map_err(|e| Error::internal(e.to_string()))?
    }

    async fn consume_at(
        &self,
        topic: &str,
        partition: i32,
        offset: i64,
    ) -> Result<ConsumedRecord> {
        let config = self.config.clone();
        let timeout = self.config.consume_timeout();
        let topic = topic.to_string();

        tokio::task::spawn_blocking(move || {
            // A dedicated consumer per fetch keeps the shared metadata
            // consumer free of partition assignments.
            let consumer = base_consumer(&config, ADMIN_GROUP_ID)?;

            let mut assignment = TopicPartitionList::new();
            assignment
                .add_partition_offset(&topic, partition, Offset::Offset(offset))
                .map_err(|e| Error::consume(&topic, partition, e.to_string()))?;
            consumer
                .assign(&assignment)
                .map_err(|e| Error::consume(&topic, partition, e.to_string()))?;

            let deadline = Instant::now() + timeout;
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(Error::Timeout(format!(
                        "no record at {topic}/{partition} offset {offset} within {timeout:?}"
                    )));
                }

                match consumer.poll(remaining) {
                    Some(Ok(message)) => {
                        let timestamp = message
                            .timestamp()
                            .to_millis()
                            .and_then(|ms| Utc.timestamp_millis_opt(ms).single());

                        debug!(
                            topic = %topic,
                            partition,
                            offset = message.offset(),
                            "Fetched record for last-write probe"
                        );

                        return Ok(ConsumedRecord {
                            timestamp,
                            payload: message.payload().map(|p| p.to_vec()),
                        });
                    }
                    Some(Err(e)) => {
                        return Err(Error::consume(&topic, partition, e.to_string()));
                    }
                    // Poll woke without a message; retry until the deadline.
                    None => continue,
                }
            }
        })
        .await
        .map_err(|e| Error::internal(e.to_string()))?
    }

    async fn list_groups(&self) -> Result<Vec<String>> {
        let consumer = self.consumer.clone();
        let timeout = self.config.request_timeout();

        tokio::task::spawn_blocking(move || {
            let groups = consumer
                .fetch_group_list(None, timeout)
                .map_err(|e| Error::internal(e.to_string()))?;

            Ok(groups
                .groups()
                .iter()
                .map(|g| g.name().to_string())
                .collect())
        })
        .await
        .map_err(|e| Error::internal(e.to_string()))?
    }

    async fn committed_offsets(
        &self,
        group: &str,
        topic: &str,
        partitions: &[i32],
    ) -> Result<HashMap<i32, CommittedOffset>> {
        let config = self.config.clone();
        let timeout = self.config.request_timeout();
        let group = group.to_string();
        let topic = topic.to_string();
        let partitions = partitions.to_vec();

        tokio::task::spawn_blocking(move || {
            // Committed offsets are scoped to the consumer's own group.id.
            let consumer = base_consumer(&config, &group)
                .map_err(|e| Error::committed_offsets(&group, &topic, e.to_string()))?;

            let mut request = TopicPartitionList::new();
            for partition in &partitions {
                request.add_partition(&topic, *partition);
            }

            let committed = consumer
                .committed_offsets(request, timeout)
                .map_err(|e| Error::committed_offsets(&group, &topic, e.to_string()))?;

            let mut offsets = HashMap::with_capacity(partitions.len());
            for elem in committed.elements() {
                let offset = match elem.offset() {
                    Offset::Offset(o) => o,
                    // Invalid (-1001) and friends all mean "no commit".
                    _ => -1,
                };
                offsets.insert(
                    elem.partition(),
                    CommittedOffset {
                        offset,
                        metadata: elem.metadata().to_string(),
                    },
                );
            }

            Ok(offsets)
        })
        .await
        .map_err(|e| Error::internal(e.to_string()))?
    }
}
