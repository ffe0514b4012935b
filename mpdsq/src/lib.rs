// Life of a query:
// 1. Filters are collected into a `Query` and serialized into the `q` parameter
// 2. One JSON request discovers the total count and page count
// 3. Pages are requested one at a time, only when the consumer asks for more
// 4. Each page is decoded as JSON entries or as `data_`-delimited text blocks
// 5. The structures / properties views filter the decoded stream client-side
//
// System components:
//  - Configuration (API key, endpoint, page size, default format)
//  - Transport (blocking HTTP GET behind a trait)
//  - Query engine (counting, lazy pagination, eager aggregation)

//! Client for the MPDS materials database API.
//!
//! ```no_run
//! use mpdsq::{ClientConfig, Query, QueryEngine};
//!
//! # fn main() -> Result<(), mpdsq::QueryError> {
//! let engine = QueryEngine::new(ClientConfig::new(None)?)?;
//! let query = Query::new().with("elements", "Ti-O").with("sgs", 136);
//!
//! for record in engine.structures().find(&query, None)? {
//!     println!("{:?}", record?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod query;
pub mod transport;
pub mod types;

#[cfg(test)]
mod e2e_tests;

pub use config::{ClientConfig, ConfigError};
pub use error::QueryError;
pub use query::{FilteredStream, Properties, QueryEngine, ResultStream, Structures};
pub use transport::{HttpResponse, HttpTransport, Transport, TransportError};
pub use types::{Aggregate, Format, ObjectType, PageCounts, Query, QueryValue, Record};
