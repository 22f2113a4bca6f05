//! Pagination types and arithmetic
//!
//! Pages are 1-indexed on the wire. A zero limit falls back to the
//! configured default; a non-positive page means "no offset".

use serde::{Deserialize, Serialize};

use super::UserView;

/// Listing parameters as supplied by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListUsersRequest {
    /// Rows per page; `0` selects the configured default
    pub limit: i64,
    /// Page number (1-indexed); `0` or below means the first rows
    pub page: i64,
}

/// Derived page metadata, never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Row count across the whole table
    pub total_data: i64,
    /// Number of pages at the effective limit
    pub total_page: i64,
}

impl PageMeta {
    pub fn new(total_data: i64, limit: i64) -> Self {
        Self {
            total_data,
            total_page: total_pages(total_data, limit),
        }
    }
}

/// One page of users plus metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    pub users: Vec<UserView>,
    pub meta: PageMeta,
}

/// Resolve the limit used for the page query.
///
/// No upper bound is enforced.
pub fn effective_limit(requested: i64, default_limit: i64) -> i64 {
    if requested == 0 {
        default_limit
    } else {
        requested
    }
}

/// Translate a 1-indexed page into a zero-based row offset.
pub fn offset_for(page: i64, limit: i64) -> i64 {
    if page > 0 {
        (page - 1).saturating_mul(limit)
    } else {
        0
    }
}

/// Ceiling division of `count` by `limit`; `0` when `limit` is not positive.
pub fn total_pages(count: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    let mut pages = count / limit;
    if count % limit != 0 {
        pages += 1;
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_calculation() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[test]
    fn total_pages_zero_limit() {
        assert_eq!(total_pages(0, 0), 0);
        assert_eq!(total_pages(42, 0), 0);
    }

    #[test]
    fn offset_calculation() {
        assert_eq!(offset_for(0, 20), 0);
        assert_eq!(offset_for(-4, 20), 0);
        assert_eq!(offset_for(1, 20), 0);
        assert_eq!(offset_for(3, 20), 40);
    }

    #[test]
    fn default_limit_fallback() {
        assert_eq!(effective_limit(0, 25), 25);
        assert_eq!(effective_limit(7, 25), 7);
        assert_eq!(effective_limit(10_000, 25), 10_000);
    }

    #[test]
    fn page_meta_serializes_camel_case() {
        let meta = PageMeta::new(11, 10);
        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(json, serde_json::json!({ "totalData": 11, "totalPage": 2 }));
    }
}
