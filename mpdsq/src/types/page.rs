//! Pagination types.

use serde_json::Value;

use super::Format;

/// Wire parameter carrying the serialized query.
pub const PARAM_QUERY: &str = "q";
/// Wire parameter carrying the format selector.
pub const PARAM_FORMAT: &str = "fmt";
/// Wire parameter carrying the page size.
pub const PARAM_PAGE_SIZE: &str = "pagesize";
/// Wire parameter carrying the zero-based page index.
pub const PARAM_PAGE: &str = "page";

/// Total matches and pages reported by the count request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageCounts {
    /// Total number of matching entries.
    pub count: u64,
    /// Total number of pages for the page size used.
    pub npages: u64,
}

impl PageCounts {
    /// Number of real entries on `page`.
    ///
    /// Every page holds `page_size` entries except the last one, which holds
    /// `count - page * page_size`. The server may pad the last page, so
    /// anything beyond this number is discarded.
    #[must_use]
    pub fn entries_on_page(&self, page: u64, page_size: u32) -> u64 {
        let page_size = u64::from(page_size);
        let start = page.saturating_mul(page_size);
        self.count.saturating_sub(start).min(page_size)
    }
}

/// Parameters of a single GET request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestParams<'a> {
    /// The query, already serialized to JSON.
    pub query: &'a str,
    pub format: Format,
    pub page_size: u32,
    /// `None` for the count request.
    pub page: Option<u64>,
}

impl<'a> RequestParams<'a> {
    /// The count request: JSON format, no page index.
    #[must_use]
    pub const fn count(query: &'a str, page_size: u32) -> Self {
        Self {
            query,
            format: Format::Json,
            page_size,
            page: None,
        }
    }

    /// A request for one page.
    #[must_use]
    pub const fn page(query: &'a str, format: Format, page_size: u32, page: u64) -> Self {
        Self {
            query,
            format,
            page_size,
            page: Some(page),
        }
    }

    /// Query-string pairs in wire order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (PARAM_QUERY, self.query.to_owned()),
            (PARAM_FORMAT, self.format.as_str().to_owned()),
            (PARAM_PAGE_SIZE, self.page_size.to_string()),
        ];
        if let Some(page) = self.page {
            pairs.push((PARAM_PAGE, page.to_string()));
        }
        pairs
    }
}

/// Every page of a query, fetched eagerly.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate {
    /// All JSON entries in server order, truncated to `count`.
    Json {
        count: u64,
        npages: u64,
        out: Vec<Value>,
    },
    /// The raw text of every page, concatenated.
    Cif(String),
}
