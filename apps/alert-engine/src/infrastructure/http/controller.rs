//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to application use cases.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::Value;

use crate::application::ports::BrokerPort;
use crate::application::use_cases::{
    CleanupOrphansUseCase, ManageOrdersUseCase, ProcessAlertUseCase, SystemStatusUseCase,
};

use super::request::ListOrdersParams;
use super::response::{
    ApiError, ApiResponse, CancelOrderResponse, CleanupResponse, HealthResponse, OrderResponse,
    WebhookResponse, order_page_response,
};

/// Application state shared across handlers.
pub struct AppState<B>
where
    B: BrokerPort,
{
    /// Use case for the alert pipeline.
    pub process_alert: Arc<ProcessAlertUseCase<B>>,
    /// Use case for orphaned order cleanup.
    pub cleanup_orphans: Arc<CleanupOrphansUseCase<B>>,
    /// Use case for the status snapshot.
    pub system_status: Arc<SystemStatusUseCase<B>>,
    /// Use case for order queries and cancellation.
    pub manage_orders: Arc<ManageOrdersUseCase<B>>,
    /// Application version.
    pub version: String,
}

impl<B> Clone for AppState<B>
where
    B: BrokerPort,
{
    fn clone(&self) -> Self {
        Self {
            process_alert: Arc::clone(&self.process_alert),
            cleanup_orphans: Arc::clone(&self.cleanup_orphans),
            system_status: Arc::clone(&self.system_status),
            manage_orders: Arc::clone(&self.manage_orders),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<B>(state: AppState<B>) -> Router
where
    B: BrokerPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/webhook", post(receive_alert))
        .route("/cleanup", post(cleanup_orphans))
        .route("/status", get(system_status))
        .route("/orders", get(list_orders))
        .route("/orders/{order_id}", get(get_order).delete(cancel_order))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<B>(State(state): State<AppState<B>>) -> impl IntoResponse
where
    B: BrokerPort,
{
    ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Alert webhook endpoint.
///
/// The body is read raw so a missing or malformed payload is reported as
/// `INVALID_PAYLOAD` rather than an extractor rejection.
async fn receive_alert<B>(
    State(state): State<AppState<B>>,
    body: Bytes,
) -> Result<ApiResponse<WebhookResponse>, ApiError>
where
    B: BrokerPort,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::invalid_payload("No JSON payload provided"));
    }
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Webhook body is not valid JSON");
        ApiError::invalid_payload("Request body is not valid JSON")
    })?;

    let receipt = state.process_alert.execute(&payload).await?;
    Ok(ApiResponse::ok(WebhookResponse::from(receipt)))
}

/// Orphaned order cleanup endpoint.
async fn cleanup_orphans<B>(
    State(state): State<AppState<B>>,
) -> Result<ApiResponse<CleanupResponse>, ApiError>
where
    B: BrokerPort,
{
    let report = state.cleanup_orphans.execute().await?;
    Ok(ApiResponse::ok(CleanupResponse::from(report)))
}

/// System status endpoint. Broker failures degrade the status, never the response.
async fn system_status<B>(State(state): State<AppState<B>>) -> impl IntoResponse
where
    B: BrokerPort,
{
    ApiResponse::ok(state.system_status.execute().await)
}

/// Open order listing endpoint.
async fn list_orders<B>(
    State(state): State<AppState<B>>,
    Query(params): Query<ListOrdersParams>,
) -> Result<impl IntoResponse, ApiError>
where
    B: BrokerPort,
{
    let page = state.manage_orders.list(&params.into_query()).await?;
    Ok(order_page_response(page))
}

/// Single order endpoint.
async fn get_order<B>(
    State(state): State<AppState<B>>,
    Path(order_id): Path<String>,
) -> Result<ApiResponse<OrderResponse>, ApiError>
where
    B: BrokerPort,
{
    let order = state.manage_orders.get(&order_id).await?;
    Ok(ApiResponse::ok(OrderResponse::from(order)))
}

/// Order cancellation endpoint.
async fn cancel_order<B>(
    State(state): State<AppState<B>>,
    Path(order_id): Path<String>,
) -> Result<ApiResponse<CancelOrderResponse>, ApiError>
where
    B: BrokerPort,
{
    state.manage_orders.cancel(&order_id).await?;
    Ok(ApiResponse::ok(CancelOrderResponse {
        order_id,
        canceled: true,
        message: "Order successfully canceled".to_string(),
    }))
}
