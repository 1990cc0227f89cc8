//! Order Sizing
//!
//! Strategies that turn an alert into a raw quantity and the per-asset-class
//! constraints that adjust it.

pub mod calculator;
pub mod constraints;
pub mod strategy;

pub use calculator::{apply_constraints, calculate_size};
pub use constraints::{AssetConstraints, BrokerConstraints};
pub use strategy::{SizingParams, SizingStrategy};
