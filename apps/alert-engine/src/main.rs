//! Alert Engine Binary
//!
//! Serves the alert webhook and order management API against Alpaca.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin alert-engine
//! ```
//!
//! # Environment Variables
//!
//! - `ALERT_ENGINE_CONFIG`: Path to the YAML config (default: `config.yaml`).
//!   When the file does not exist the bundled defaults are used.
//! - `ALPACA_KEY` / `ALPACA_SECRET`: Broker credentials, interpolated by the config
//! - `RUST_LOG`: Log filter, overrides `observability.logging.level`

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use alert_engine::application::use_cases::{
    CleanupOrphansUseCase, ManageOrdersUseCase, ProcessAlertUseCase, SystemStatusUseCase,
};
use alert_engine::config::{Config, ReconciliationConfig, load_config, load_config_from_string};
use alert_engine::infrastructure::broker::{ALPACA_BROKER_NAME, AlpacaBrokerAdapter};
use alert_engine::infrastructure::http::{AppState, create_router};
use alert_engine::telemetry::init_tracing;

/// Config used when no config file is present.
const DEFAULT_CONFIG_YAML: &str = include_str!("../config.yaml");

/// Application use cases wired together for dependency injection.
struct UseCases {
    process_alert: Arc<ProcessAlertUseCase<AlpacaBrokerAdapter>>,
    cleanup_orphans: Arc<CleanupOrphansUseCase<AlpacaBrokerAdapter>>,
    system_status: Arc<SystemStatusUseCase<AlpacaBrokerAdapter>>,
    manage_orders: Arc<ManageOrdersUseCase<AlpacaBrokerAdapter>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = read_config()?;
    init_tracing(&config.observability.logging).context("failed to initialize tracing")?;

    tracing::info!("Starting Alert Engine");
    log_config(&config);

    let broker = create_broker(&config)?;
    let use_cases = create_use_cases(&config, &broker);
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let reconcile_handle = config.reconciliation.enabled.then(|| {
        start_reconciliation(
            &config.reconciliation,
            Arc::clone(&use_cases.cleanup_orphans),
            shutdown_tx.subscribe(),
        )
    });

    let http_handle = start_http_server(&config, &use_cases, shutdown_tx.clone()).await?;

    tracing::info!("Alert engine ready");

    if let Err(e) = http_handle.await {
        tracing::error!(error = %e, "HTTP server task failed");
    }

    // The HTTP server may stop on its own; make sure the timer stops too.
    let _ = shutdown_tx.send(());
    if let Some(handle) = reconcile_handle {
        let _ = handle.await;
    }

    tracing::info!("Alert engine stopped");
    Ok(())
}

fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        load_dotenv_from_ancestors();
    }
}

/// Load .env file from any ancestor directory.
fn load_dotenv_from_ancestors() {
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

fn read_config() -> anyhow::Result<Config> {
    let path = std::env::var("ALERT_ENGINE_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    if Path::new(&path).exists() {
        load_config(Some(&path)).with_context(|| format!("failed to load config from {path}"))
    } else {
        // Tracing is not up yet.
        eprintln!("Config file '{path}' not found, using bundled defaults");
        load_config_from_string(DEFAULT_CONFIG_YAML).context("bundled default config is invalid")
    }
}

fn log_config(config: &Config) {
    tracing::info!(
        environment = %config.broker.environment,
        http_port = config.server.http_port,
        sizing_strategy = %config.sizing.resolve_strategy(),
        reconciliation_enabled = config.reconciliation.enabled,
        reconciliation_interval_secs = config.reconciliation.interval_secs,
        client_order_id_prefix = %config.client_order_id_prefix,
        "Configuration loaded"
    );
}

fn create_broker(config: &Config) -> anyhow::Result<Arc<AlpacaBrokerAdapter>> {
    let broker = AlpacaBrokerAdapter::new(&config.broker.to_alpaca_config())
        .context("ALPACA_KEY and ALPACA_SECRET must be set for the broker adapter")?;

    tracing::info!(
        environment = %config.broker.environment,
        live = broker.is_live(),
        "AlpacaBrokerAdapter initialized"
    );

    Ok(Arc::new(broker))
}

fn create_use_cases(config: &Config, broker: &Arc<AlpacaBrokerAdapter>) -> UseCases {
    UseCases {
        process_alert: Arc::new(ProcessAlertUseCase::new(
            Arc::clone(broker),
            config.pipeline_settings(),
        )),
        cleanup_orphans: Arc::new(CleanupOrphansUseCase::new(Arc::clone(broker))),
        system_status: Arc::new(SystemStatusUseCase::new(
            Arc::clone(broker),
            ALPACA_BROKER_NAME,
        )),
        manage_orders: Arc::new(ManageOrdersUseCase::new(Arc::clone(broker))),
    }
}

async fn start_http_server(
    config: &Config,
    use_cases: &UseCases,
    shutdown_tx: broadcast::Sender<()>,
) -> anyhow::Result<JoinHandle<()>> {
    let http_state = AppState {
        process_alert: Arc::clone(&use_cases.process_alert),
        cleanup_orphans: Arc::clone(&use_cases.cleanup_orphans),
        system_status: Arc::clone(&use_cases.system_status),
        manage_orders: Arc::clone(&use_cases.manage_orders),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let app = create_router(http_state);

    let http_addr: SocketAddr = config
        .server
        .listen_address()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server.listen_address()))?;

    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET    /health");
    tracing::info!("  POST   /webhook");
    tracing::info!("  POST   /cleanup");
    tracing::info!("  GET    /status");
    tracing::info!("  GET    /orders");
    tracing::info!("  GET    /orders/{{order_id}}");
    tracing::info!("  DELETE /orders/{{order_id}}");

    let listener = TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;
    let http_server =
        axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(shutdown_tx));

    let handle = tokio::spawn(async move {
        if let Err(e) = http_server.await {
            tracing::error!("HTTP server error: {e}");
        }
    });

    Ok(handle)
}

/// Run a cleanup pass every `interval_secs` until shutdown.
fn start_reconciliation(
    config: &ReconciliationConfig,
    cleanup: Arc<CleanupOrphansUseCase<AlpacaBrokerAdapter>>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    let period = config.interval();
    tracing::info!(interval_secs = period.as_secs(), "Periodic reconciliation enabled");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so startup stays quiet.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match cleanup.execute().await {
                        Ok(report) => tracing::info!(
                            cleaned_orders = report.cleaned_orders(),
                            failures = report.failures.len(),
                            "Scheduled reconciliation pass finished"
                        ),
                        Err(e) => tracing::warn!(
                            error = %e,
                            "Scheduled reconciliation pass failed"
                        ),
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Reconciliation timer stopped");
                    break;
                }
            }
        }
    })
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed. A process that cannot
/// observe termination signals should fail at startup.
#[allow(clippy::expect_used)]
async fn shutdown_signal(shutdown_tx: broadcast::Sender<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    let _ = shutdown_tx.send(());
    tracing::info!("Graceful shutdown started");
}
