//! HTTP request DTOs.

use serde::{Deserialize, Serialize};

use crate::application::OrderQuery;

/// Query string of `GET /orders`.
///
/// Numbers are kept as raw text: an unparseable `limit` or `offset` falls
/// back to its default instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOrdersParams {
    /// Case-insensitive status filter.
    pub status: Option<String>,
    /// Page size, 1..=100.
    pub limit: Option<String>,
    /// Orders to skip.
    pub offset: Option<String>,
}

impl ListOrdersParams {
    /// Convert into a normalized query.
    #[must_use]
    pub fn into_query(self) -> OrderQuery {
        OrderQuery::new(
            self.status,
            parse_integer(self.limit.as_deref()),
            parse_integer(self.offset.as_deref()),
        )
    }
}

fn parse_integer(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
    use test_case::test_case;

    fn params(limit: Option<&str>, offset: Option<&str>) -> ListOrdersParams {
        ListOrdersParams {
            status: None,
            limit: limit.map(str::to_string),
            offset: offset.map(str::to_string),
        }
    }

    #[test_case(None, DEFAULT_PAGE_LIMIT ; "absent")]
    #[test_case(Some("abc"), DEFAULT_PAGE_LIMIT ; "garbage")]
    #[test_case(Some("0"), DEFAULT_PAGE_LIMIT ; "zero")]
    #[test_case(Some("101"), DEFAULT_PAGE_LIMIT ; "above max")]
    #[test_case(Some("100"), MAX_PAGE_LIMIT ; "max")]
    #[test_case(Some(" 7 "), 7 ; "padded")]
    fn limit_parsing(raw: Option<&str>, expected: usize) {
        assert_eq!(params(raw, None).into_query().limit, expected);
    }

    #[test_case(Some("-3"), 0 ; "negative")]
    #[test_case(Some("x"), 0 ; "garbage")]
    #[test_case(Some("12"), 12 ; "valid")]
    fn offset_parsing(raw: Option<&str>, expected: usize) {
        assert_eq!(params(None, raw).into_query().offset, expected);
    }

    #[test]
    fn blank_status_is_no_filter() {
        let query = ListOrdersParams {
            status: Some("  ".to_string()),
            ..ListOrdersParams::default()
        }
        .into_query();
        assert_eq!(query.status, None);
    }
}
