//! Kafka topic activity monitor.
//!
//! Answers "is topic T still in active use?" for every topic on the cluster:
//! - last write from the timestamp of the newest record per partition,
//! - last read from timestamps recovered out of committed-offset metadata,
//! - active/inactive classification against a configurable inactivity window,
//! exposed as a pull-based CSV or JSON report on `GET /topics`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

use api::{router, AppState};
use kafka_gateway::{KafkaConfig, KafkaGateway};
use monitor::{CsvReporter, JsonReporter, Reporter, ReportCoordinator};
use telemetry::{init_tracing, TracingConfig};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Days without writes or reads before a topic counts as inactive
    #[serde(default = "default_inactivity_days")]
    inactivity_days: i64,

    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    log_json: bool,

    /// Report serialization: "csv" or "json"
    #[serde(default = "default_report_format")]
    report_format: String,

    #[serde(default)]
    kafka: KafkaConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_inactivity_days() -> i64 {
    7
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_report_format() -> String {
    "csv".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            inactivity_days: default_inactivity_days(),
            log_level: default_log_level(),
            log_json: false,
            report_format: default_report_format(),
            kafka: KafkaConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = load_config()?;

    init_tracing(
        TracingConfig::new()
            .with_filter(config.log_level.clone())
            .with_json(config.log_json),
    );

    info!(
        "Starting topic activity monitor v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!(
        brokers = %config.kafka.brokers(),
        inactivity_days = config.inactivity_days,
        report_format = %config.report_format,
        "Loaded configuration"
    );

    // A broker connection is the one thing the process cannot run without.
    let gateway = KafkaGateway::connect(config.kafka.clone())
        .await
        .context("Failed to connect to Kafka cluster")?;

    let reporter: Arc<dyn Reporter> = match config.report_format.as_str() {
        "csv" => Arc::new(CsvReporter::new()),
        "json" => Arc::new(JsonReporter::new()),
        other => bail!("Unknown report format: {other} (expected \"csv\" or \"json\")"),
    };

    let (coordinator, reports) =
        ReportCoordinator::new(Arc::new(gateway), reporter, config.inactivity_days);

    let shutdown = CancellationToken::new();
    let worker = tokio::spawn(coordinator.run(shutdown.clone()));

    let app = router(AppState::new(reports));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down...");

    // Stop the coordinator and wait for it, so no broker call outlives the
    // connection the worker owns.
    shutdown.cancel();
    worker.await.context("Report coordinator panicked")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration: defaults < config file < environment < explicit
/// environment overrides.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("MONITOR")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // The comma-separated broker list needs a manual override; the config
    // crate's nested parsing does not split lists from the environment.
    if let Ok(brokers) = std::env::var("MONITOR_BOOTSTRAP_SERVERS") {
        config.kafka.bootstrap_servers =
            brokers.split(',').map(|s| s.trim().to_string()).collect();
    }
    if let Ok(days) = std::env::var("MONITOR_INACTIVITY_DAYS") {
        config.inactivity_days = days
            .parse()
            .context("MONITOR_INACTIVITY_DAYS must be an integer")?;
    }

    if config.kafka.bootstrap_servers.is_empty() {
        bail!("Empty bootstrap server list");
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
