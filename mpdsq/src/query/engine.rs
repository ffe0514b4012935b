//! Query engine implementation.
//!
//! The `QueryEngine` turns a `Query` into paginated GET requests:
//! - `count_and_pages` asks for the totals (JSON, no page index)
//! - `find` streams records, requesting pages lazily
//! - `fetch_all` requests every page up front
//!
//! # Invariants
//! - The count request and every page request of one call use the same page size.
//! - The API key only ever leaves the process as the `Key` header.

use super::decode;
use super::stream::ResultStream;
use super::views::{Properties, Structures};
use crate::config::{ClientConfig, ConfigError};
use crate::error::QueryError;
use crate::transport::{HttpTransport, Transport};
use crate::types::{Aggregate, Format, PageCounts, Query, RequestParams};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "Key";

/// Issues paginated queries against the MPDS API.
///
/// Configuration and transport are fixed at construction; every call is
/// independent of every other.
#[derive(Debug)]
pub struct QueryEngine<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl QueryEngine<HttpTransport> {
    /// Create an engine that talks HTTP.
    ///
    /// # Errors
    /// Returns `QueryError::Transport` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, QueryError> {
        Ok(Self::with_transport(config, HttpTransport::new()?))
    }

    /// Create an HTTP engine configured from the environment.
    ///
    /// # Errors
    /// Returns `QueryError::Configuration` if `MPDS_KEY` is missing or another
    /// variable is invalid.
    pub fn from_env() -> Result<Self, QueryError> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> QueryEngine<T> {
    /// Create an engine on top of any transport.
    pub const fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// The structures collection.
    #[must_use]
    pub const fn structures(&self) -> Structures<'_, T> {
        Structures::new(self)
    }

    /// The properties collection.
    #[must_use]
    pub const fn properties(&self) -> Properties<'_, T> {
        Properties::new(self)
    }

    /// Send one request and return the body of a successful response.
    ///
    /// # Errors
    /// - `QueryError::Transport` if no response was received
    /// - `QueryError::RequestFailure` if the status is not 2xx
    pub fn request(&self, params: &RequestParams<'_>) -> Result<String, QueryError> {
        tracing::debug!(
            fmt = %params.format,
            page = ?params.page,
            pagesize = params.page_size,
            "sending request"
        );

        let headers = [(API_KEY_HEADER, self.config.api_key())];
        let response = self
            .transport
            .get(self.config.url(), &params.to_pairs(), &headers)?;

        if !response.is_success() {
            let message = response.error_message();
            tracing::debug!(status = response.status, %message, "request failed");
            return Err(QueryError::RequestFailure {
                status: response.status,
                message,
            });
        }

        tracing::debug!(bytes = response.body.len(), "received response");
        Ok(response.body)
    }

    /// Total matches and pages for `query` at the configured page size.
    ///
    /// # Errors
    /// - `QueryError::RequestFailure` / `QueryError::Transport` from the request
    /// - `QueryError::ResponseFormat` if `count` or `npages` is missing
    pub fn count_and_pages(&self, query: &Query) -> Result<PageCounts, QueryError> {
        self.count_and_pages_with_page_size(query, self.config.page_size())
    }

    /// Total matches and pages for `query` at an explicit page size.
    ///
    /// # Errors
    /// Same as `count_and_pages`, plus `QueryError::Configuration` for a zero
    /// page size.
    pub fn count_and_pages_with_page_size(
        &self,
        query: &Query,
        page_size: u32,
    ) -> Result<PageCounts, QueryError> {
        if page_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "page_size".to_string(),
                message: "must be greater than zero".to_string(),
            }
            .into());
        }

        let query_json = query.to_json();
        let body = self.request(&RequestParams::count(&query_json, page_size))?;
        let counts = decode::decode_counts(&body)?;

        tracing::info!(
            count = counts.count,
            npages = counts.npages,
            pagesize = page_size,
            "query matched"
        );
        Ok(counts)
    }

    /// Stream every record matching `query` in `format`.
    ///
    /// The totals are requested before this returns; pages are requested
    /// only as the stream is consumed. Stopping early fetches nothing more.
    ///
    /// # Errors
    /// Errors from the count request. Page errors are yielded by the stream.
    pub fn find(&self, query: &Query, format: Format) -> Result<ResultStream<'_, T>, QueryError> {
        let page_size = self.config.page_size();
        let counts = self.count_and_pages_with_page_size(query, page_size)?;
        Ok(ResultStream::new(
            self,
            query.to_json(),
            format,
            page_size,
            counts,
        ))
    }

    /// `find` with the configured default format.
    ///
    /// # Errors
    /// Same as `find`.
    pub fn find_default(&self, query: &Query) -> Result<ResultStream<'_, T>, QueryError> {
        self.find(query, self.config.format())
    }

    /// Fetch every page of `query` before returning.
    ///
    /// JSON pages are truncated exactly like `find` truncates them, so
    /// `out.len() == count`. Text pages are concatenated verbatim.
    ///
    /// # Errors
    /// Any failing request discards everything fetched so far.
    pub fn fetch_all(&self, query: &Query, format: Format) -> Result<Aggregate, QueryError> {
        let page_size = self.config.page_size();
        let counts = self.count_and_pages_with_page_size(query, page_size)?;
        let query_json = query.to_json();

        match format {
            Format::Json => {
                let mut out = Vec::new();
                for page in 0..counts.npages {
                    let params = RequestParams::page(&query_json, format, page_size, page);
                    let body = self.request(&params)?;
                    out.extend(decode::decode_json_page(&body, page, counts, page_size)?);
                }
                Ok(Aggregate::Json {
                    count: counts.count,
                    npages: counts.npages,
                    out,
                })
            }
            Format::Cif => {
                let mut text = String::new();
                for page in 0..counts.npages {
                    let params = RequestParams::page(&query_json, format, page_size, page);
                    text.push_str(&self.request(&params)?);
                }
                Ok(Aggregate::Cif(text))
            }
        }
    }

    /// `fetch_all` with a format selector string (`"json"` or `"cif"`).
    ///
    /// # Errors
    /// Returns `QueryError::UnsupportedFormat` before any request is sent if
    /// the selector is unknown.
    pub fn fetch_all_str(&self, query: &Query, selector: &str) -> Result<Aggregate, QueryError> {
        let format: Format = selector.parse()?;
        self.fetch_all(query, format)
    }
}
