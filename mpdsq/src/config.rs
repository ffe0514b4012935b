//! Client configuration module.
//!
//! This module provides configuration for the MPDS query client, built from
//! explicit arguments or from environment variables.
//!
//! # Environment Variables
//!
//! - `MPDS_KEY`: API key sent with every request (required unless passed explicitly)
//! - `MPDS_URL`: API endpoint (default: `https://api.mpds.io/v0/download/facet`)
//! - `MPDS_PAGE_SIZE`: Entries requested per page (default: `1000`)
//!
//! # Invariants
//!
//! - `api_key` is never empty
//! - `page_size` is never zero
//! - A `ClientConfig` is immutable once built; every builder returns a new value

use std::fmt;

use crate::types::Format;

/// Client configuration.
///
/// Contains everything the query engine needs besides the transport.
///
/// # Post-conditions
///
/// - `api_key()` is non-empty
/// - `page_size()` is at least 1
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Endpoint every request is sent to.
    url: String,
    /// Static credential attached as the `Key` header.
    api_key: String,
    /// Entries per page, shared by the count request and every page request.
    page_size: u32,
    /// Format used when a caller does not pick one.
    format: Format,
}

/// Error returned when building configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No API key was passed and the environment variable is not set.
    MissingApiKey,
    /// A configuration value is invalid.
    InvalidValue { name: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(
                f,
                "API key not supplied and {} environment variable not set",
                ClientConfig::API_KEY_ENV_VAR
            ),
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ClientConfig {
    /// Default API endpoint.
    pub const DEFAULT_URL: &'static str = "https://api.mpds.io/v0/download/facet";
    /// Default number of entries per page.
    pub const DEFAULT_PAGE_SIZE: u32 = 1000;
    /// Environment variable holding the API key.
    pub const API_KEY_ENV_VAR: &'static str = "MPDS_KEY";
    /// Environment variable overriding the endpoint.
    pub const URL_ENV_VAR: &'static str = "MPDS_URL";
    /// Environment variable overriding the page size.
    pub const PAGE_SIZE_ENV_VAR: &'static str = "MPDS_PAGE_SIZE";

    /// Build a configuration with default endpoint, page size and format.
    ///
    /// An explicit `api_key` wins. Otherwise the key is read from `MPDS_KEY`.
    /// No network access happens here.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingApiKey` if neither source provides a
    /// non-empty key.
    pub fn new(api_key: Option<String>) -> Result<Self, ConfigError> {
        Self::resolve(api_key, |name| std::env::var(name).ok())
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `MPDS_KEY` is not set or is empty
    /// - `MPDS_PAGE_SIZE` is set but is not a positive integer
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the API key from an explicit value or the given lookup.
    fn resolve(
        api_key: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = match api_key {
            Some(key) => key,
            None => lookup(Self::API_KEY_ENV_VAR).ok_or(ConfigError::MissingApiKey)?,
        };
        Self::with_api_key(api_key)
    }

    /// Load every setting through the given lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::resolve(None, &lookup)?;

        if let Some(url) = lookup(Self::URL_ENV_VAR) {
            config = config.with_url(url)?;
        }

        if let Some(value) = lookup(Self::PAGE_SIZE_ENV_VAR) {
            let page_size = value.parse::<u32>().map_err(|_| ConfigError::InvalidValue {
                name: Self::PAGE_SIZE_ENV_VAR.to_string(),
                message: format!("'{value}' is not a valid page size"),
            })?;
            config = config.with_page_size(page_size)?;
        }

        Ok(config)
    }

    fn with_api_key(api_key: String) -> Result<Self, ConfigError> {
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(Self {
            url: Self::DEFAULT_URL.to_string(),
            api_key,
            page_size: Self::DEFAULT_PAGE_SIZE,
            format: Format::default(),
        })
    }

    /// Use a different endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `url` is empty.
    pub fn with_url(self, url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(Self { url, ..self })
    }

    /// Use a different page size.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `page_size` is zero.
    pub fn with_page_size(self, page_size: u32) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "page_size".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(Self { page_size, ..self })
    }

    /// Use a different default format.
    #[must_use]
    pub fn with_format(self, format: Format) -> Self {
        Self { format, ..self }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }
}

// The API key must never end up in logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("format", &self.format)
            .finish()
    }
}
