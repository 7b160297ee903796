//! In-memory broker gateway for unit tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kafka_gateway::{BrokerGateway, CommittedOffset, ConsumedRecord, OffsetPosition};
use monitor_core::{Error, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct TopicState {
    partitions: i32,
    /// Record timestamps per partition, in offset order.
    records: HashMap<i32, Vec<DateTime<Utc>>>,
}

#[derive(Default)]
struct State {
    /// Topics in listing order.
    topics: Vec<(String, TopicState)>,
    groups: Vec<String>,
    commits: HashMap<(String, String), HashMap<i32, CommittedOffset>>,
    fail_partitions: HashSet<String>,
    fail_consume: HashSet<(String, i32)>,
    fail_group_listing: bool,
    call_log: Vec<String>,
}

/// In-memory [`BrokerGateway`] with scriptable failures and a call log.
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<State>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_topic(&self, name: &str, partitions: i32) {
        self.state.lock().topics.push((
            name.to_string(),
            TopicState {
                partitions,
                records: HashMap::new(),
            },
        ));
    }

    /// Appends a record with the given timestamp to a partition.
    pub fn add_record(&self, topic: &str, partition: i32, timestamp: DateTime<Utc>) {
        let mut state = self.state.lock();
        let topic_state = state
            .topics
            .iter_mut()
            .find(|(name, _)| name == topic)
            .map(|(_, t)| t)
            .expect("unknown mock topic");
        topic_state
            .records
            .entry(partition)
            .or_default()
            .push(timestamp);
    }

    /// Registers a committed offset (with metadata) for a group.
    pub fn commit(&self, group: &str, topic: &str, partition: i32, offset: i64, metadata: &str) {
        let mut state = self.state.lock();
        if !state.groups.iter().any(|g| g == group) {
            state.groups.push(group.to_string());
        }
        state
            .commits
            .entry((group.to_string(), topic.to_string()))
            .or_default()
            .insert(
                partition,
                CommittedOffset {
                    offset,
                    metadata: metadata.to_string(),
                },
            );
    }

    pub fn fail_partitions(&self, topic: &str) {
        self.state.lock().fail_partitions.insert(topic.to_string());
    }

    pub fn fail_consume(&self, topic: &str, partition: i32) {
        self.state
            .lock()
            .fail_consume
            .insert((topic.to_string(), partition));
    }

    pub fn fail_group_listing(&self) {
        self.state.lock().fail_group_listing = true;
    }

    /// Topic-listing and partition-listing calls, in order.
    pub fn call_log(&self) -> Vec<String> {
        self.state.lock().call_log.clone()
    }
}

#[async_trait]
impl BrokerGateway for MockGateway {
    async fn list_topics(&self) -> Result<Vec<String>> {
        let mut state = self.state.lock();
        state.call_log.push("list_topics".to_string());
        Ok(state.topics.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn partitions(&self, topic: &str) -> Result<Vec<i32>> {
        let mut state = self.state.lock();
        state.call_log.push(format!("partitions:{topic}"));

        if state.fail_partitions.contains(topic) {
            return Err(Error::partition_listing(topic, "mock failure"));
        }

        state
            .topics
            .iter()
            .find(|(name, _)| name == topic)
            .map(|(_, t)| (0..t.partitions).collect())
            .ok_or_else(|| Error::partition_listing(topic, "unknown topic"))
    }

    async fn fetch_offset(
        &self,
        topic: &str,
        partition: i32,
        position: OffsetPosition,
    ) -> Result<i64> {
        let state = self.state.lock();
        let records = state
            .topics
            .iter()
            .find(|(name, _)| name == topic)
            .and_then(|(_, t)| t.records.get(&partition));

        Ok(match position {
            OffsetPosition::Oldest => 0,
            OffsetPosition::Newest => records.map(|r| r.len() as i64).unwrap_or(0),
        })
    }

    async fn consume_at(
        &self,
        topic: &str,
        partition: i32,
        offset: i64,
    ) -> Result<ConsumedRecord> {
        let state = self.state.lock();

        if state.fail_consume.contains(&(topic.to_string(), partition)) {
            return Err(Error::consume(topic, partition, "mock failure"));
        }

        let timestamp = state
            .topics
            .iter()
            .find(|(name, _)| name == topic)
            .and_then(|(_, t)| t.records.get(&partition))
            .and_then(|records| records.get(offset as usize))
            .copied()
            .ok_or_else(|| Error::consume(topic, partition, "offset out of range"))?;

        Ok(ConsumedRecord {
            timestamp: Some(timestamp),
            payload: None,
        })
    }

    async fn list_groups(&self) -> Result<Vec<String>> {
        let state = self.state.lock();
        if state.fail_group_listing {
            return Err(Error::internal("group listing unavailable"));
        }
        Ok(state.groups.clone())
    }

    async fn committed_offsets(
        &self,
        group: &str,
        topic: &str,
        partitions: &[i32],
    ) -> Result<HashMap<i32, CommittedOffset>> {
        let state = self.state.lock();
        let committed = state
            .commits
            .get(&(group.to_string(), topic.to_string()))
            .map(|offsets| {
                offsets
                    .iter()
                    .filter(|(partition, _)| partitions.contains(partition))
                    .map(|(partition, offset)| (*partition, offset.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(committed)
    }
}
