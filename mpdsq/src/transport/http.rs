//! Blocking HTTP transport backed by `reqwest`.

use std::time::Duration;

use super::{HttpResponse, Transport, TransportError};

/// Sends requests with a blocking `reqwest` client.
///
/// One call is one request: no retries, no caching, no connection tricks
/// beyond the client's own keep-alive pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Time allowed for a whole request, body included.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    /// Create a transport with the default timeout.
    ///
    /// # Errors
    /// Returns `TransportError::Client` if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom timeout.
    ///
    /// # Errors
    /// Returns `TransportError::Client` if the TLS backend cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mpdsq/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(
        &self,
        url: &str,
        params: &[(&'static str, String)],
        headers: &[(&'static str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        let mut request = self.client.get(url).query(params);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
