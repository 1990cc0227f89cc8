//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for interacting with the broker
//! - **Use Cases**: The alert pipeline, orphan cleanup, status and order management
//! - **Errors**: The pipeline error model and wire codes

pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::{ErrorCode, PipelineError};
pub use ports::*;
pub use use_cases::*;
