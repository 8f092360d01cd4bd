//! Pagination parameters and metadata.

use serde::{Deserialize, Serialize};

/// Page size used when the request does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest page size [`PageQuery::safe_size`] will return.
pub const MAX_SAFE_SIZE_LIMIT: u64 = 500;

/// Raw paging parameters as they arrive in a query string.
///
/// Values are kept as strings so that junk input degrades to defaults
/// instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// Page number, starting at 1
    #[serde(default)]
    pub page: Option<String>,

    /// Records per page, 20 by default
    #[serde(default)]
    pub size: Option<String>,
}

impl PageQuery {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page: Some(page.to_string()),
            size: Some(size.to_string()),
        }
    }

    /// Page number, at least 1. Invalid values become 1.
    pub fn safe_page(&self) -> u64 {
        parse_or(self.page.as_deref(), 1).max(1)
    }

    /// Page size, capped at [`MAX_SAFE_SIZE_LIMIT`].
    pub fn safe_size(&self) -> u64 {
        self.safe_size_unlimited().min(MAX_SAFE_SIZE_LIMIT)
    }

    /// Page size without the cap, for internal batch jobs.
    pub fn safe_size_unlimited(&self) -> u64 {
        parse_or(self.size.as_deref(), DEFAULT_PAGE_SIZE)
    }

    /// Number of records to skip.
    pub fn offset(&self) -> u64 {
        (self.safe_page() - 1).saturating_mul(self.safe_size())
    }
}

fn parse_or(value: Option<&str>, default: u64) -> u64 {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Paging metadata returned alongside a page of items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Page number, starting at 1
    pub page: Option<u64>,

    /// Records per page
    pub size: Option<u64>,

    /// Total record count; may be omitted by expensive queries
    pub total: Option<u64>,

    /// Link to the next page, when the endpoint supports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl PageInfo {
    pub fn new(page: Option<u64>, size: Option<u64>, total: Option<u64>) -> Self {
        Self {
            page,
            size,
            total,
            next: None,
        }
    }

    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }
}

/// A page of items with its paging metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageData<C> {
    pub pager: PageInfo,
    pub items: Vec<C>,
}
