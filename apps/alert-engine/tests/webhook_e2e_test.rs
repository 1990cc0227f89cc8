//! E2E Integration Tests for the HTTP API
//!
//! Drives the full flow from raw HTTP request → router → use cases → domain →
//! in-memory broker.

// Allow unwrap in tests - tests should panic on unexpected errors
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt;

use alert_engine::application::PipelineSettings;
use alert_engine::application::use_cases::{
    CleanupOrphansUseCase, ManageOrdersUseCase, ProcessAlertUseCase, SystemStatusUseCase,
};
use alert_engine::domain::account::{Position, PositionSide};
use alert_engine::domain::orders::{OrderSide, OrderType};
use alert_engine::domain::sizing::{AssetConstraints, BrokerConstraints, SizingStrategy};
use alert_engine::infrastructure::broker::InMemoryBroker;
use alert_engine::infrastructure::http::{AppState, create_router};

// =============================================================================
// Harness
// =============================================================================

fn app_with(broker: &Arc<InMemoryBroker>, settings: PipelineSettings) -> Router {
    create_router(AppState {
        process_alert: Arc::new(ProcessAlertUseCase::new(Arc::clone(broker), settings)),
        cleanup_orphans: Arc::new(CleanupOrphansUseCase::new(Arc::clone(broker))),
        system_status: Arc::new(SystemStatusUseCase::new(Arc::clone(broker), "InMemory")),
        manage_orders: Arc::new(ManageOrdersUseCase::new(Arc::clone(broker))),
        version: "test".to_string(),
    })
}

fn app(broker: &Arc<InMemoryBroker>) -> Router {
    app_with(broker, PipelineSettings::default())
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn btc_alert() -> Value {
    json!({
        "symbol": "BTCUSD",
        "strategy_order_id": "long",
        "strategy_order_action": "buy",
        "strategy_order_contracts": 0.1,
        "strategy_order_price": 65000,
        "time": 1_713_746_400_000_i64
    })
}

fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

// =============================================================================
// POST /webhook
// =============================================================================

#[tokio::test]
async fn webhook_places_market_order_for_signal_contracts() {
    let broker = Arc::new(InMemoryBroker::new());

    let (status, body) = send(app(&broker), "POST", "/webhook", Some(btc_alert())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["received"], true);
    assert_eq!(data["order_id"], "mem-1");
    assert_eq!(data["symbol"], "BTCUSD");
    assert_eq!(data["side"], "buy");
    assert_eq!(data["order_type"], "market");
    assert_eq!(data["asset_class"], "crypto");
    assert_eq!(data["trade_type"], "long_entry");
    assert_eq!(decimal(&data["quantity"]), dec!(0.1));
    assert!(data["client_order_id"].as_str().unwrap().starts_with("tv-"));

    let placed = broker.placed_orders();
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].symbol, "BTCUSD");
    assert_eq!(placed[0].side, OrderSide::Buy);
    assert_eq!(placed[0].quantity, dec!(0.1));
}

#[tokio::test]
async fn webhook_accepts_quoted_numbers() {
    let broker = Arc::new(InMemoryBroker::new());
    let alert = json!({
        "symbol": "AAPL",
        "strategy_order_id": "exit_long",
        "strategy_order_action": "SELL",
        "strategy_order_contracts": "3",
        "strategy_order_price": "189.5",
        "time": "1713746400000"
    });

    let (status, body) = send(app(&broker), "POST", "/webhook", Some(alert)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["trade_type"], "long_exit");
    assert_eq!(body["data"]["asset_class"], "equity");
    assert_eq!(broker.placed_orders()[0].quantity, dec!(3));
}

#[tokio::test]
async fn webhook_missing_price_is_validation_error_and_broker_untouched() {
    let broker = Arc::new(InMemoryBroker::new());
    let mut alert = btc_alert();
    alert.as_object_mut().unwrap().remove("strategy_order_price");

    let (status, body) = send(app(&broker), "POST", "/webhook", Some(alert)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("strategy_order_price")
    );
    assert_eq!(broker.call_count(), 0);
}

#[tokio::test]
async fn webhook_non_json_body_is_invalid_payload() {
    let broker = Arc::new(InMemoryBroker::new());
    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "text/plain")
        .body(Body::from("buy BTCUSD now"))
        .unwrap();

    let response = app(&broker).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "INVALID_PAYLOAD");
    assert_eq!(broker.call_count(), 0);
}

#[tokio::test]
async fn webhook_unreachable_broker_is_connection_failure() {
    let broker = Arc::new(InMemoryBroker::new().unreachable());

    let (status, body) = send(app(&broker), "POST", "/webhook", Some(btc_alert())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "BROKER_CONNECTION_FAILED");
    assert!(broker.placed_orders().is_empty());
}

#[tokio::test]
async fn webhook_rejected_order_is_broker_request_failure() {
    let broker = Arc::new(InMemoryBroker::new().rejecting_orders("insufficient buying power"));

    let (status, body) = send(app(&broker), "POST", "/webhook", Some(btc_alert())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "BROKER_REQUEST_FAILED");
}

#[tokio::test]
async fn webhook_percent_of_equity_respects_constraints() {
    let broker = Arc::new(InMemoryBroker::new().with_equity(dec!(50000)));
    let settings = PipelineSettings {
        strategy: SizingStrategy::PercentOfEquity,
        constraints: BrokerConstraints {
            equity: AssetConstraints::new(Decimal::ONE, Decimal::ONE).with_max(dec!(5)),
            ..BrokerConstraints::default()
        },
        ..PipelineSettings::default()
    };
    let alert = json!({
        "symbol": "AAPL",
        "strategy_order_id": "long",
        "strategy_order_action": "buy",
        "strategy_order_contracts": 1,
        "strategy_order_price": 100,
        "time": 1
    });

    // 2% of 50,000 at 100 is 10 shares, capped at 5.
    let (status, body) = send(app_with(&broker, settings), "POST", "/webhook", Some(alert)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["data"]["quantity"]), dec!(5));
}

#[tokio::test]
async fn repeated_alert_places_repeated_orders_with_distinct_ids() {
    let broker = Arc::new(InMemoryBroker::new());

    let (_, first) = send(app(&broker), "POST", "/webhook", Some(btc_alert())).await;
    let (_, second) = send(app(&broker), "POST", "/webhook", Some(btc_alert())).await;

    assert_eq!(broker.placed_orders().len(), 2);
    assert_ne!(
        first["data"]["client_order_id"],
        second["data"]["client_order_id"]
    );
}

// =============================================================================
// POST /cleanup
// =============================================================================

#[tokio::test]
async fn cleanup_cancels_only_orphaned_orders() {
    let broker = Arc::new(
        InMemoryBroker::new()
            .with_position(Position::new("AAPL", dec!(10), PositionSide::Long))
            .with_order(InMemoryBroker::open_order("1", "AAPL", OrderType::Stop))
            .with_order(InMemoryBroker::open_order("2", "TSLA", OrderType::Limit)),
    );

    let (status, body) = send(app(&broker), "POST", "/cleanup", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cleaned_orders"], 1);
    assert_eq!(body["data"]["orphaned_sl_orders"], 0);
    assert_eq!(body["data"]["orphaned_tp_orders"], 1);
    assert_eq!(broker.cancelled_orders(), vec!["2".to_string()]);
}

#[tokio::test]
async fn cleanup_reports_failures_and_continues() {
    let broker = Arc::new(
        InMemoryBroker::new()
            .with_order(InMemoryBroker::open_order("sl-1", "TSLA", OrderType::StopLimit))
            .with_order(InMemoryBroker::open_order("tp-1", "TSLA", OrderType::Limit))
            .failing_cancel("sl-1"),
    );

    let (status, body) = send(app(&broker), "POST", "/cleanup", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cleaned_orders"], 1);
    assert_eq!(body["data"]["failures"][0]["order_id"], "sl-1");
    assert_eq!(broker.cancelled_orders(), vec!["tp-1".to_string()]);
}

#[tokio::test]
async fn cleanup_with_unreachable_broker_fails() {
    let broker = Arc::new(InMemoryBroker::new().unreachable());

    let (status, body) = send(app(&broker), "POST", "/cleanup", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "BROKER_CONNECTION_FAILED");
}

// =============================================================================
// GET /status
// =============================================================================

#[tokio::test]
async fn status_reports_counts_and_equity() {
    let broker = Arc::new(
        InMemoryBroker::new()
            .with_equity(dec!(25000))
            .with_position(Position::new("AAPL", dec!(10), PositionSide::Long))
            .with_order(InMemoryBroker::open_order("1", "AAPL", OrderType::Stop)),
    );

    let (status, body) = send(app(&broker), "GET", "/status", None).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["status"], "active");
    assert_eq!(data["broker_connected"], true);
    assert_eq!(data["broker_name"], "InMemory");
    assert_eq!(data["positions_count"], 1);
    assert_eq!(data["open_orders_count"], 1);
    assert_eq!(decimal(&data["current_equity"]), dec!(25000));
}

#[tokio::test]
async fn status_degrades_when_broker_unreachable() {
    let broker = Arc::new(InMemoryBroker::new().unreachable());

    let (status, body) = send(app(&broker), "GET", "/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "degraded");
    assert_eq!(body["data"]["broker_connected"], false);
}

// =============================================================================
// /orders
// =============================================================================

fn broker_with_open_orders(count: usize) -> Arc<InMemoryBroker> {
    let mut broker = InMemoryBroker::new();
    for i in 0..count {
        broker = broker.with_order(InMemoryBroker::open_order(
            &format!("o-{i}"),
            "AAPL",
            OrderType::Limit,
        ));
    }
    Arc::new(broker)
}

#[tokio::test]
async fn list_orders_paginates() {
    let broker = broker_with_open_orders(5);

    let (status, body) = send(app(&broker), "GET", "/orders?limit=2&offset=1", None).await;

    assert_eq!(status, StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["id"], "o-1");
    assert_eq!(orders[0]["type"], "limit");
    assert_eq!(body["meta"]["pagination"]["total"], 5);
    assert_eq!(body["meta"]["pagination"]["limit"], 2);
    assert_eq!(body["meta"]["pagination"]["offset"], 1);
}

#[tokio::test]
async fn list_orders_normalizes_bad_paging() {
    let broker = broker_with_open_orders(3);

    let (status, body) = send(app(&broker), "GET", "/orders?limit=500&offset=-4", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["pagination"]["limit"], 50);
    assert_eq!(body["meta"]["pagination"]["offset"], 0);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn list_orders_filters_by_status() {
    let broker = broker_with_open_orders(2);

    let (_, body) = send(app(&broker), "GET", "/orders?status=accepted", None).await;
    assert_eq!(body["meta"]["pagination"]["total"], 0);

    let (_, body) = send(app(&broker), "GET", "/orders?status=NEW", None).await;
    assert_eq!(body["meta"]["pagination"]["total"], 2);
}

#[tokio::test]
async fn get_and_cancel_order() {
    let broker = broker_with_open_orders(1);

    let (status, body) = send(app(&broker), "GET", "/orders/o-0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["symbol"], "AAPL");

    let (status, body) = send(app(&broker), "DELETE", "/orders/o-0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order_id"], "o-0");
    assert_eq!(body["data"]["canceled"], true);
    assert_eq!(broker.cancelled_orders(), vec!["o-0".to_string()]);

    let (status, body) = send(app(&broker), "DELETE", "/orders/o-0", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "BROKER_REQUEST_FAILED");
}
