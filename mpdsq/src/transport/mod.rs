//! HTTP transport abstraction.
//!
//! The query engine only needs one operation: a GET with query-string
//! parameters and headers, returning the status and the text body. Putting it
//! behind a trait lets tests and simulations answer requests in memory.
//!
//! # Invariants
//! - A `TransportError` means no response was received. A response with a
//!   non-success status is still `Ok(HttpResponse)`.

mod http;

use std::fmt;

use serde::Deserialize;

pub use http::HttpTransport;

/// A blocking HTTP GET.
pub trait Transport {
    /// Send one GET request to `url`.
    ///
    /// # Errors
    /// Returns `TransportError` if no response could be obtained.
    fn get(
        &self,
        url: &str,
        params: &[(&'static str, String)],
        headers: &[(&'static str, &str)],
    ) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(
        &self,
        url: &str,
        params: &[(&'static str, String)],
        headers: &[(&'static str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        (**self).get(url, params, headers)
    }
}

/// Status and body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// The `error` field of a JSON body, or the raw body otherwise.
    #[must_use]
    pub fn error_message(&self) -> String {
        serde_json::from_str::<ErrorBody>(&self.body)
            .map_or_else(|_| self.body.trim().to_owned(), |body| body.error)
    }
}

/// Error returned when a request produces no response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The HTTP client could not be built.
    Client(String),
    /// The request could not be sent or no response arrived.
    Request(String),
    /// The response body could not be read.
    Body(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(reason) => write!(f, "client error: {reason}"),
            Self::Request(reason) => write!(f, "request error: {reason}"),
            Self::Body(reason) => write!(f, "body error: {reason}"),
        }
    }
}

impl std::error::Error for TransportError {}
