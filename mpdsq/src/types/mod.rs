pub mod format;
pub mod page;
pub mod query;
pub mod record;

pub use format::Format;
pub use page::{Aggregate, PageCounts, RequestParams};
pub use query::{Query, QueryValue};
pub use record::{ERROR_SENTINEL_PREFIX, ObjectType, Record, SENTINEL_PREFIX};
