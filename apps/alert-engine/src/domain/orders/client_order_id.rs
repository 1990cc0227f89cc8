//! Client order identifiers.
//!
//! Every alert gets its own id, sent to the broker for correlation. The id is
//! `{prefix}-{unix_millis}-{uuid}` where the UUID is a full v4 value, so two
//! alerts arriving in the same millisecond still get distinct ids.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length the broker accepts for a client order id.
pub const MAX_CLIENT_ORDER_ID_LEN: usize = 128;

/// Caller-assigned correlation id attached to an order request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientOrderId(String);

impl ClientOrderId {
    /// Wrap an existing id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id for an alert received at `timestamp_ms`.
    #[must_use]
    pub fn generate(prefix: &str, timestamp_ms: i64) -> Self {
        let tail = format!("-{timestamp_ms}-{}", Uuid::new_v4().simple());
        let budget = MAX_CLIENT_ORDER_ID_LEN.saturating_sub(tail.len());

        // Oversized prefixes are cut on a char boundary; the unique tail stays.
        let mut head = String::with_capacity(budget);
        for c in prefix.chars() {
            if head.len() + c.len_utf8() > budget {
                break;
            }
            head.push(c);
        }

        Self(head + &tail)
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_id_has_prefix_and_timestamp() {
        let id = ClientOrderId::generate("tv", 1_713_746_400_000);
        assert!(id.as_str().starts_with("tv-1713746400000-"));
        assert_eq!(id.as_str().len(), "tv-1713746400000-".len() + 32);
    }

    #[test]
    fn ids_generated_in_same_millisecond_differ() {
        let a = ClientOrderId::generate("tv", 1);
        let b = ClientOrderId::generate("tv", 1);
        assert_ne!(a, b);
    }

    #[test]
    fn oversized_prefix_is_truncated_to_fit() {
        let prefix = "p".repeat(200);
        let id = ClientOrderId::generate(&prefix, 42);
        assert_eq!(id.as_str().len(), MAX_CLIENT_ORDER_ID_LEN);
        assert!(id.as_str().contains("-42-"));
    }
}
