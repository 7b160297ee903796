//! Single-flight report coordinator.
//!
//! One task owns the broker gateway and services report requests strictly
//! serially. Callers hand over a private oneshot slot through a capacity-1
//! channel and block until the coordinator writes the result back, so at most
//! one broker scan is ever in flight and requests are served in arrival
//! order without any locking.

use chrono::{Duration, Utc};
use kafka_gateway::BrokerGateway;
use monitor_core::{classifier, Error, Result, TopicActivityInfo};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::probe::probe_topic;
use crate::report::Reporter;

type ReportRequest = oneshot::Sender<Result<Vec<u8>>>;

/// Client side of the coordinator's rendezvous queue.
#[derive(Clone)]
pub struct ReportHandle {
    tx: mpsc::Sender<ReportRequest>,
    content_type: &'static str,
}

impl ReportHandle {
    /// Requests a freshly computed report and blocks until it is delivered.
    pub async fn request_report(&self) -> Result<Vec<u8>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tx
            .send(reply_tx)
            .await
            .map_err(|_| Error::WorkerGone)?;

        reply_rx.await.map_err(|_| Error::WorkerGone)?
    }

    /// Content type of the reports this coordinator produces.
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }
}

/// Owns the broker gateway and computes reports on demand.
pub struct ReportCoordinator {
    gateway: Arc<dyn BrokerGateway>,
    reporter: Arc<dyn Reporter>,
    inactivity_window: Duration,
    rx: mpsc::Receiver<ReportRequest>,
}

impl ReportCoordinator {
    pub fn new(
        gateway: Arc<dyn BrokerGateway>,
        reporter: Arc<dyn Reporter>,
        inactivity_days: i64,
    ) -> (Self, ReportHandle) {
        // Capacity 1: a second caller queues behind the request being
        // serviced, everyone later waits on the send.
        let (tx, rx) = mpsc::channel(1);
        let content_type = reporter.content_type();

        (
            Self {
                gateway,
                reporter,
                inactivity_window: Duration::days(inactivity_days),
                rx,
            },
            ReportHandle { tx, content_type },
        )
    }

    /// Services report requests until cancelled or all handles are dropped.
    ///
    /// Cancellation is cooperative and only observed between requests; a
    /// cycle already in progress runs to completion, bounded by the per-call
    /// broker timeouts.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!("Report coordinator started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown signal received, report coordinator stopping");
                    break;
                }
                request = self.rx.recv() => {
                    let Some(reply) = request else { break };

                    let result = self.run_cycle().await;
                    if let Err(e) = &result {
                        error!(error = %e, "Report cycle failed");
                    }

                    // The requester may have given up waiting; that is fine.
                    let _ = reply.send(result);
                }
            }
        }
    }

    /// Computes one full report: list, probe, classify, serialize.
    async fn run_cycle(&self) -> Result<Vec<u8>> {
        let topics = self.gateway.list_topics().await?;
        debug!(topic_count = topics.len(), "Starting report cycle");

        let mut infos: Vec<TopicActivityInfo> = Vec::with_capacity(topics.len());

        // Topics are probed sequentially, in listing order. This bounds
        // broker load to one scan at a time at the cost of cycle latency
        // growing linearly with topic count.
        for topic in &topics {
            match probe_topic(self.gateway.as_ref(), topic).await {
                Ok(mut info) => {
                    info.active = classifier::is_active_at(
                        Utc::now(),
                        info.last_write_time,
                        info.last_read_time,
                        self.inactivity_window,
                    );
                    infos.push(info);
                }
                Err(e) => {
                    warn!(topic, error = %e, "Skipping topic after probe failure");
                }
            }
        }

        self.reporter.report(&infos)
    }
}
