//! Domain Layer
//!
//! Pure alert-to-order logic with no I/O:
//!
//! - [`alert`]: payload validation and type coercion
//! - [`classification`]: asset class and trade type inference
//! - [`sizing`]: sizing strategies and broker constraints
//! - [`orders`]: order value objects and broker order records
//! - [`account`]: account and position snapshots
//! - [`reconciliation`]: orphaned protective order detection

pub mod account;
pub mod alert;
pub mod classification;
pub mod orders;
pub mod reconciliation;
pub mod sizing;
