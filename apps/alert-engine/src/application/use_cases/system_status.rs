//! System Status Use Case

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::ports::BrokerPort;

/// Overall service state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    /// Broker reachable and answering.
    Active,
    /// Broker unreachable or failing.
    Degraded,
}

/// Status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemStatus {
    /// Overall state.
    pub status: ServiceState,
    /// Whether every broker call succeeded.
    pub broker_connected: bool,
    /// Broker display name.
    pub broker_name: String,
    /// Open positions.
    pub positions_count: usize,
    /// Open orders.
    pub open_orders_count: usize,
    /// Account equity, zero when unknown.
    pub current_equity: Decimal,
    /// Uptime as `Xd Yh Zm`.
    pub uptime: String,
    /// Current server time.
    pub server_time: DateTime<Utc>,
}

/// Use case reporting broker reachability and account counters.
pub struct SystemStatusUseCase<B>
where
    B: BrokerPort,
{
    broker: Arc<B>,
    broker_name: String,
    started_at: Instant,
}

impl<B> SystemStatusUseCase<B>
where
    B: BrokerPort,
{
    /// Create a new SystemStatusUseCase. Uptime counts from now.
    pub fn new(broker: Arc<B>, broker_name: impl Into<String>) -> Self {
        Self {
            broker,
            broker_name: broker_name.into(),
            started_at: Instant::now(),
        }
    }

    /// Build a status snapshot. Broker failures degrade the status instead
    /// of failing the call.
    pub async fn execute(&self) -> SystemStatus {
        let mut status = SystemStatus {
            status: ServiceState::Degraded,
            broker_connected: false,
            broker_name: self.broker_name.clone(),
            positions_count: 0,
            open_orders_count: 0,
            current_equity: Decimal::ZERO,
            uptime: format_uptime(self.started_at.elapsed()),
            server_time: Utc::now(),
        };

        if !self.broker.connect().await {
            tracing::warn!("Broker unreachable, reporting degraded status");
            return status;
        }

        let snapshot = async {
            let account = self.broker.get_account_info().await?;
            let positions = self.broker.get_positions().await?;
            let orders = self.broker.get_orders().await?;
            Ok::<_, crate::application::ports::BrokerError>((account, positions, orders))
        };

        match snapshot.await {
            Ok((account, positions, orders)) => {
                status.status = ServiceState::Active;
                status.broker_connected = true;
                status.current_equity = account.equity;
                status.positions_count = positions.len();
                status.open_orders_count = orders.len();
            }
            Err(e) => {
                tracing::error!(error = %e, "Error collecting broker status");
            }
        }

        status
    }
}

/// Format a duration as `Xd Yh Zm`.
#[must_use]
pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    format!("{days}d {hours}h {minutes}m")
}
