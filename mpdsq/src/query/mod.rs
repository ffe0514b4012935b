//! Query execution against the MPDS API.
//!
//! This module provides:
//! - `QueryEngine` - counting, lazy pagination and eager aggregation
//! - `ResultStream` - a pull-based cursor that fetches one page at a time
//! - `Structures` / `Properties` - filtered views over `find`
//!
//! # Example
//!
//! ```ignore
//! let engine = QueryEngine::new(ClientConfig::new(None)?)?;
//! let query = Query::new().with("elements", "Ti-O").with("sgs", 136);
//!
//! let counts = engine.count_and_pages(&query)?;
//! for record in engine.find(&query, Format::Json)?.take(10) {
//!     println!("{:?}", record?);
//! }
//! ```

mod decode;
pub mod engine;
pub mod stream;
pub mod views;

pub use decode::TextBlocks;
pub use engine::QueryEngine;
pub use stream::ResultStream;
pub use views::{FilteredStream, Properties, Structures};
