//! Alert Validation
//!
//! Turns an untyped webhook payload into a [`NormalizedAlert`] or a
//! [`ValidationError`] naming the offending field.

pub mod errors;
pub mod normalized;
pub mod validator;

pub use errors::ValidationError;
pub use normalized::NormalizedAlert;
pub use validator::validate;
