// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Alert Engine - Rust Core Library
//!
//! Turns inbound trading-signal alerts into broker market orders and cancels
//! protective orders left behind when a position closes.
//!
//! # Architecture (Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure logic, no I/O
//!   - `alert`: payload validation and type coercion
//!   - `classification`: asset class and trade type inference
//!   - `sizing`: sizing strategies and broker constraints
//!   - `reconciliation`: orphaned stop-loss / take-profit detection
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `BrokerPort`, the broker gateway contract
//!   - `use_cases`: `ProcessAlert`, `CleanupOrphans`, `SystemStatus`, `ManageOrders`
//!   - `error`: `PipelineError` and the wire error codes
//!
//! - **Infrastructure**: Adapters
//!   - `broker`: Alpaca and in-memory `BrokerPort` implementations
//!   - `http`: axum REST adapter
//!
//! `config` and `telemetry` hold the ambient configuration and logging setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Hexagonal Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Configuration loading and validation.
pub mod config;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::alert::{NormalizedAlert, ValidationError, validate};
pub use domain::classification::{AssetClass, ClassifiedAlert, TradeType, classify};
pub use domain::orders::{BrokerOrder, ClientOrderId, OrderRequest, OrderSide, OrderType};
pub use domain::reconciliation::{OrphanSet, find_orphans};
pub use domain::sizing::{
    AssetConstraints, BrokerConstraints, SizingParams, SizingStrategy, apply_constraints,
    calculate_size,
};

// Application re-exports
pub use application::ports::{BrokerError, BrokerPort};
pub use application::use_cases::{
    CleanupOrphansUseCase, ManageOrdersUseCase, PipelineSettings, ProcessAlertUseCase,
    SystemStatusUseCase,
};
pub use application::{ErrorCode, PipelineError};

// Infrastructure re-exports
pub use infrastructure::broker::{
    AlpacaBrokerAdapter, AlpacaConfig, AlpacaEnvironment, AlpacaError, InMemoryBroker,
};
pub use infrastructure::http::{AppState, create_router};
