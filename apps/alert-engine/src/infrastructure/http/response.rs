//! HTTP response DTOs.
//!
//! Every endpoint answers with the same envelope: `{success: true, data}` on
//! success (plus `meta` for paginated lists) and
//! `{success: false, error: {code, message}}` on failure.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::{
    AlertReceipt, CancelFailure, CleanupReport, ErrorCode, OrderPage, PipelineError,
};
use crate::domain::classification::{AssetClass, TradeType};
use crate::domain::orders::{BrokerOrder, OrderSide, OrderType};

/// Response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
    /// Extra metadata (pagination).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

impl<T> ApiResponse<T> {
    /// Successful response.
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    /// Attach metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: ResponseMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Error body inside the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Wire error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

/// Response metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Pagination of a list response.
    pub pagination: Pagination,
}

/// Pagination block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Matching items before paging.
    pub total: usize,
    /// Page size.
    pub limit: usize,
    /// Items skipped.
    pub offset: usize,
}

/// Failed request, rendered as the error envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Wire error code, also decides the HTTP status.
    pub code: ErrorCode,
    /// Message returned to the caller.
    pub message: String,
}

impl ApiError {
    /// Create a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Body missing or not JSON.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPayload, message)
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        if let PipelineError::Unexpected(detail) = &err {
            tracing::error!(error = %detail, "Unexpected error while handling request");
        }
        Self::new(err.code(), err.public_message())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body: ApiResponse<()> = ApiResponse {
            success: false,
            data: None,
            error: Some(ApiErrorBody {
                code: self.code,
                message: self.message,
            }),
            meta: None,
        };
        (status, Json(body)).into_response()
    }
}

/// `POST /webhook` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Always true on success.
    pub received: bool,
    /// Broker order id.
    pub order_id: String,
    /// Client order id sent with the order.
    pub client_order_id: String,
    /// Traded symbol.
    pub symbol: String,
    /// Order type, always market.
    pub order_type: OrderType,
    /// Order side.
    pub side: OrderSide,
    /// Quantity after sizing and constraints.
    pub quantity: Decimal,
    /// Inferred asset class.
    pub asset_class: AssetClass,
    /// Inferred trade type.
    pub trade_type: TradeType,
    /// Receipt time in epoch milliseconds.
    pub timestamp: i64,
}

impl From<AlertReceipt> for WebhookResponse {
    fn from(receipt: AlertReceipt) -> Self {
        Self {
            received: true,
            order_id: receipt.order_id,
            client_order_id: receipt.client_order_id.to_string(),
            symbol: receipt.symbol,
            order_type: OrderType::Market,
            side: receipt.side,
            quantity: receipt.quantity,
            asset_class: receipt.asset_class,
            trade_type: receipt.trade_type,
            timestamp: receipt.received_at.timestamp_millis(),
        }
    }
}

/// `POST /cleanup` result.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    /// Orders cancelled in total.
    pub cleaned_orders: usize,
    /// Stop-loss orders cancelled.
    pub orphaned_sl_orders: usize,
    /// Take-profit orders cancelled.
    pub orphaned_tp_orders: usize,
    /// Cancellations that failed.
    pub failures: Vec<CancelFailure>,
    /// Completion time in epoch milliseconds.
    pub timestamp: i64,
}

impl From<CleanupReport> for CleanupResponse {
    fn from(report: CleanupReport) -> Self {
        Self {
            cleaned_orders: report.cleaned_orders(),
            orphaned_sl_orders: report.stop_loss_cancelled,
            orphaned_tp_orders: report.take_profit_cancelled,
            timestamp: report.completed_at.timestamp_millis(),
            failures: report.failures,
        }
    }
}

/// An order as returned by the order endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    /// Broker order id.
    pub id: String,
    /// Client order id, when one was set.
    pub client_order_id: Option<String>,
    /// Symbol.
    pub symbol: String,
    /// Side.
    pub side: OrderSide,
    /// Order type.
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Broker status string.
    pub status: String,
    /// Ordered quantity.
    pub qty: Option<Decimal>,
    /// Filled quantity.
    pub filled_qty: Decimal,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
}

impl From<BrokerOrder> for OrderResponse {
    fn from(order: BrokerOrder) -> Self {
        Self {
            id: order.id,
            client_order_id: order.client_order_id,
            symbol: order.symbol,
            side: order.side,
            order_type: order.order_type,
            status: order.status,
            qty: order.qty,
            filled_qty: order.filled_qty,
            created_at: order.created_at,
        }
    }
}

/// Build the paginated `GET /orders` response.
#[must_use]
pub fn order_page_response(page: OrderPage) -> ApiResponse<Vec<OrderResponse>> {
    let pagination = Pagination {
        total: page.total,
        limit: page.limit,
        offset: page.offset,
    };
    let orders = page.orders.into_iter().map(OrderResponse::from).collect();
    ApiResponse::ok(orders).with_meta(ResponseMeta { pagination })
}

/// `DELETE /orders/{id}` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOrderResponse {
    /// Cancelled order id.
    pub order_id: String,
    /// Always true on success.
    pub canceled: bool,
    /// Confirmation message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}
