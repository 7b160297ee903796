//! Test-data generator for the topic activity monitor.
//!
//! Creates randomized topics, produces records with timestamps spread over a
//! date range, and commits consumer-group offsets whose metadata carries an
//! RFC 3339 timestamp, giving a development cluster both activity signals
//! the monitor looks for. Topics are committed selectively (every other one)
//! so reports show a mix of read and unread topics.
//!
//! Configured via environment:
//! - `GENDATA_BROKERS` (default `localhost:9092`)
//! - `GENDATA_TOPICS` (default 3)
//! - `GENDATA_MAX_PARTITIONS` (default 3, actual count random from 1)
//! - `GENDATA_MAX_MESSAGES` (default 100, actual count random from 1)
//! - `GENDATA_TOPIC_PREFIX` (default `test-topic-`)
//! - `GENDATA_START_DATE` / `GENDATA_END_DATE` (`YYYY-MM-DD`, default last 30 days)
//! - `GENDATA_GROUP` (default `test-consumer-group`)

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, SecondsFormat, Utc};
use rand::Rng;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{BaseConsumer, CommitMode, Consumer};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::error::KafkaError;
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::{Offset, TopicPartitionList};
use serde_json::json;
use tracing::{info, warn};

struct GenConfig {
    brokers: String,
    num_topics: usize,
    max_partitions: i32,
    max_messages: usize,
    topic_prefix: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    group: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing(telemetry::TracingConfig::new());

    let config = load_config()?;
    info!(
        brokers = %config.brokers,
        topics = config.num_topics,
        "Generating test data"
    );

    let admin: AdminClient<DefaultClientContext> = ClientConfig::new()
        .set("bootstrap.servers", &config.brokers)
        .create()
        .context("Failed to create admin client")?;

    let producer: FutureProducer = ClientConfig::new()
        .set("bootstrap.servers", &config.brokers)
        .set("message.timeout.ms", "30000")
        .create()
        .context("Failed to create producer")?;

    let mut rng = rand::thread_rng();

    for i in 0..config.num_topics {
        let topic = format!("{}{}", config.topic_prefix, i);
        let partitions = rng.gen_range(1..=config.max_partitions);

        create_topic(&admin, &topic, partitions).await?;

        let count = rng.gen_range(1..=config.max_messages);
        let last_timestamp = produce_messages(&producer, &config, &topic, count).await?;

        // Commit offsets for every other topic so the report shows both
        // read and unread topics.
        if i % 2 == 0 {
            commit_read_marker(&config, &topic, count as i64, last_timestamp)?;
        }
    }

    info!("Message generation completed successfully");
    Ok(())
}

fn load_config() -> Result<GenConfig> {
    let env = |key: &str, default: &str| {
        std::env::var(key).unwrap_or_else(|_| default.to_string())
    };

    let parse_date = |value: &str| -> Result<DateTime<Utc>> {
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .with_context(|| format!("invalid date {value:?} (use YYYY-MM-DD)"))?;
        Ok(date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc())
    };

    let now = Utc::now();
    let start_date = match std::env::var("GENDATA_START_DATE") {
        Ok(value) => parse_date(&value)?,
        Err(_) => now - ChronoDuration::days(30),
    };
    let end_date = match std::env::var("GENDATA_END_DATE") {
        Ok(value) => parse_date(&value)?,
        Err(_) => now,
    };

    if end_date < start_date {
        bail!("end date cannot be before start date");
    }

    Ok(GenConfig {
        brokers: env("GENDATA_BROKERS", "localhost:9092"),
        num_topics: env("GENDATA_TOPICS", "3").parse().context("GENDATA_TOPICS")?,
        max_partitions: env("GENDATA_MAX_PARTITIONS", "3")
            .parse()
            .context("GENDATA_MAX_PARTITIONS")?,
        max_messages: env("GENDATA_MAX_MESSAGES", "100")
            .parse()
            .context("GENDATA_MAX_MESSAGES")?,
        topic_prefix: env("GENDATA_TOPIC_PREFIX", "test-topic-"),
        start_date,
        end_date,
        group: env("GENDATA_GROUP", "test-consumer-group"),
    })
}

async fn create_topic(
    admin: &AdminClient<DefaultClientContext>,
    topic: &str,
    partitions: i32,
) -> Result<()> {
    let new_topic = NewTopic::new(topic, partitions, TopicReplication::Fixed(1));
    let results = admin
        .create_topics(&[new_topic], &AdminOptions::new())
        .await
        .context("Topic creation request failed")?;

    for result in results {
        match result {
            Ok(name) => info!(topic = %name, partitions, "Created topic"),
            Err((name, RDKafkaErrorCode::TopicAlreadyExists)) => {
                warn!(topic = %name, "Topic already exists, reusing");
            }
            Err((name, code)) => bail!("failed to create topic {name}: {code}"),
        }
    }

    Ok(())
}

/// Produces `count` records with ascending timestamps drawn from the
/// configured date range; returns the newest timestamp produced.
async fn produce_messages(
    producer: &FutureProducer,
    config: &GenConfig,
    topic: &str,
    count: usize,
) -> Result<DateTime<Utc>> {
    let range_secs = (config.end_date - config.start_date).num_seconds().max(1);

    let mut timestamps: Vec<DateTime<Utc>> = {
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| config.start_date + ChronoDuration::seconds(rng.gen_range(0..range_secs)))
            .collect()
    };
    timestamps.sort();

    for (i, timestamp) in timestamps.iter().enumerate() {
        let key = format!("{topic}-{i}");
        let payload = json!({
            "id": key,
            "timestamp": timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            "value": i,
        })
        .to_string();

        let record = FutureRecord::to(topic)
            .key(&key)
            .payload(&payload)
            .timestamp(timestamp.timestamp_millis());

        producer
            .send(record, Duration::from_secs(10))
            .await
            .map_err(|(e, _): (KafkaError, _)| e)
            .with_context(|| format!("failed to produce to {topic}"))?;
    }

    info!(topic, count, "Produced messages");
    Ok(*timestamps.last().expect("count is at least 1"))
}

/// Commits a consumer-group offset on partition 0 whose metadata is the
/// RFC 3339 timestamp of the newest consumed record, the convention the
/// monitor recovers last-read times from.
fn commit_read_marker(
    config: &GenConfig,
    topic: &str,
    offset: i64,
    read_at: DateTime<Utc>,
) -> Result<()> {
    let consumer: BaseConsumer = ClientConfig::new()
        .set("bootstrap.servers", &config.brokers)
        .set("group.id", &config.group)
        .set("enable.auto.commit", "false")
        .create()
        .context("Failed to create committing consumer")?;

    let mut tpl = TopicPartitionList::new();
    {
        let mut elem = tpl.add_partition(topic, 0);
        elem.set_offset(Offset::Offset(offset))
            .context("Failed to set commit offset")?;
        elem.set_metadata(read_at.to_rfc3339_opts(SecondsFormat::Secs, true));
    }

    consumer
        .commit(&tpl, CommitMode::Sync)
        .with_context(|| format!("failed to commit offsets for {topic}"))?;

    info!(topic, group = %config.group, offset, "Committed read marker");
    Ok(())
}
