//! Alpaca broker adapter implementing BrokerPort.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::application::ports::{BrokerError, BrokerPort};
use crate::domain::account::{AccountInfo, Position};
use crate::domain::orders::{BrokerOrder, OrderRequest};

use super::api_types::{
    AlpacaAccountResponse, AlpacaOrderRequest, AlpacaOrderResponse, AlpacaPositionResponse,
};
use super::config::{AlpacaConfig, AlpacaEnvironment};
use super::error::AlpacaError;
use super::http_client::AlpacaHttpClient;

/// Display name reported by the status endpoint.
pub const ALPACA_BROKER_NAME: &str = "Alpaca";

/// Largest page Alpaca returns from the order listing.
const ORDERS_PAGE_LIMIT: usize = 500;

/// Alpaca order ids are UUIDs. Anything else is refused before a request is
/// built.
fn checked_order_id(order_id: &str) -> Result<&str, BrokerError> {
    let valid = !order_id.is_empty()
        && order_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(order_id)
    } else {
        tracing::warn!(order_id, "Refusing malformed order id");
        Err(BrokerError::OrderNotFound {
            order_id: order_id.to_string(),
        })
    }
}

/// Alpaca Markets broker adapter.
///
/// Implements `BrokerPort` for the Alpaca Markets trading API.
#[derive(Debug, Clone)]
pub struct AlpacaBrokerAdapter {
    client: AlpacaHttpClient,
    environment: AlpacaEnvironment,
}

impl AlpacaBrokerAdapter {
    /// Create a new Alpaca broker adapter.
    pub fn new(config: &AlpacaConfig) -> Result<Self, AlpacaError> {
        let client = AlpacaHttpClient::new(config)?;
        if config.environment.is_live() {
            tracing::warn!("Using LIVE trading with Alpaca");
        } else {
            tracing::info!("Using PAPER trading with Alpaca");
        }
        Ok(Self {
            client,
            environment: config.environment,
        })
    }

    /// Check if we're in live trading mode.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.environment.is_live()
    }

    async fn fetch_account(&self) -> Result<AlpacaAccountResponse, AlpacaError> {
        self.client.get(&["v2", "account"]).await
    }
}

#[async_trait]
impl BrokerPort for AlpacaBrokerAdapter {
    async fn connect(&self) -> bool {
        match self.fetch_account().await {
            Ok(account) => {
                tracing::debug!(account_id = %account.id, "Connected to Alpaca account");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to Alpaca");
                false
            }
        }
    }

    async fn get_account_info(&self) -> Result<AccountInfo, BrokerError> {
        let account = self.fetch_account().await.map_err(BrokerError::from)?;
        Ok(account.to_account_info()?)
    }

    async fn place_market_order(&self, request: &OrderRequest) -> Result<BrokerOrder, BrokerError> {
        if self.is_live() {
            tracing::warn!(
                client_order_id = %request.client_order_id,
                symbol = %request.symbol,
                "Submitting LIVE order - this will execute real trades"
            );
        }

        let alpaca_request = AlpacaOrderRequest::market(request);

        tracing::info!(
            client_order_id = %alpaca_request.client_order_id,
            symbol = %alpaca_request.symbol,
            side = %alpaca_request.side,
            qty = %alpaca_request.qty,
            "Submitting market order to Alpaca"
        );

        let response: AlpacaOrderResponse = self
            .client
            .post(&["v2", "orders"], &alpaca_request)
            .await
            .map_err(BrokerError::from)?;

        tracing::info!(
            client_order_id = %alpaca_request.client_order_id,
            broker_order_id = %response.id,
            status = %response.status,
            "Order submitted successfully"
        );

        Ok(response.to_broker_order()?)
    }

    async fn get_order(&self, order_id: &str) -> Result<BrokerOrder, BrokerError> {
        let order_id = checked_order_id(order_id)?;
        let response: AlpacaOrderResponse = self
            .client
            .get(&["v2", "orders", order_id])
            .await
            .map_err(BrokerError::from)?;

        Ok(response.to_broker_order()?)
    }

    /// Fetch every open order. Pages are walked newest first, each one
    /// bounded by the creation time of the last order seen, until a short
    /// page or a page with nothing new comes back.
    async fn get_orders(&self) -> Result<Vec<BrokerOrder>, BrokerError> {
        let limit = ORDERS_PAGE_LIMIT.to_string();
        let mut orders = Vec::new();
        let mut seen = HashSet::new();
        let mut until: Option<String> = None;

        loop {
            let mut query = vec![
                ("status", "open"),
                ("limit", limit.as_str()),
                ("direction", "desc"),
            ];
            if let Some(until) = until.as_deref() {
                query.push(("until", until));
            }

            let page: Vec<AlpacaOrderResponse> = self
                .client
                .get_with_query(&["v2", "orders"], &query)
                .await
                .map_err(BrokerError::from)?;

            let mut added = 0_usize;
            for response in &page {
                if seen.insert(response.id.clone()) {
                    orders.push(response.to_broker_order()?);
                    added += 1;
                }
            }

            let next_until = page.last().and_then(|r| r.created_at.clone());
            match next_until {
                Some(next) if page.len() >= ORDERS_PAGE_LIMIT && added > 0 => {
                    tracing::debug!(
                        fetched = orders.len(),
                        until = %next,
                        "Fetching next page of open orders"
                    );
                    until = Some(next);
                }
                _ => break,
            }
        }

        Ok(orders)
    }

    async fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError> {
        let order_id = checked_order_id(order_id)?;
        tracing::info!(broker_order_id = %order_id, "Canceling order by broker ID");
        self.client
            .delete(&["v2", "orders", order_id])
            .await
            .map_err(BrokerError::from)
    }

    async fn get_positions(&self) -> Result<Vec<Position>, BrokerError> {
        let responses: Vec<AlpacaPositionResponse> = self
            .client
            .get(&["v2", "positions"])
            .await
            .map_err(BrokerError::from)?;

        responses
            .iter()
            .map(|r| r.to_position().map_err(BrokerError::from))
            .collect()
    }
}
