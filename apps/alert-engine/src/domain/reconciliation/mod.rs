//! Orphan Reconciliation
//!
//! Pure detection of protective orders left behind by closed positions.
//! Cancellation happens in the application layer.

pub mod orphan;

pub use orphan::{OrphanSet, find_orphans};
