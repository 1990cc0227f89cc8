//! Application Use Cases
//!
//! Use cases orchestrate domain logic against the broker port.

mod cleanup_orphans;
mod manage_orders;
mod process_alert;
mod system_status;

pub use cleanup_orphans::{CancelFailure, CleanupOrphansUseCase, CleanupReport};
pub use manage_orders::{
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, ManageOrdersUseCase, OrderPage, OrderQuery,
};
pub use process_alert::{AlertReceipt, PipelineSettings, ProcessAlertUseCase};
pub use system_status::{ServiceState, SystemStatus, SystemStatusUseCase, format_uptime};
