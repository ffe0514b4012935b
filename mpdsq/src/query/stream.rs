//! Lazy, page-at-a-time result stream.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use super::decode;
use super::engine::QueryEngine;
use crate::error::QueryError;
use crate::transport::Transport;
use crate::types::{Format, PageCounts, Record, RequestParams};

/// Records of one `find` call, fetched as the consumer advances.
///
/// A page is requested only when every record of the previous page has been
/// yielded. The stream cannot be restarted: call `find` again for a fresh one.
///
/// # Invariants
/// - Pages are requested in order `0..npages`, each at most once.
/// - After an error or the last page the stream yields `None` forever.
/// - In JSON format at most `counts().count` records are yielded.
pub struct ResultStream<'a, T> {
    engine: &'a QueryEngine<T>,
    /// The serialized query sent with every page request.
    query: String,
    format: Format,
    /// Page size used by the count request; pages must use the same one.
    page_size: u32,
    counts: PageCounts,
    next_page: u64,
    buffer: VecDeque<Record>,
    finished: bool,
}

impl<'a, T: Transport> ResultStream<'a, T> {
    pub(super) const fn new(
        engine: &'a QueryEngine<T>,
        query: String,
        format: Format,
        page_size: u32,
        counts: PageCounts,
    ) -> Self {
        Self {
            engine,
            query,
            format,
            page_size,
            counts,
            next_page: 0,
            buffer: VecDeque::new(),
            finished: false,
        }
    }

    /// Totals reported by the count request.
    #[must_use]
    pub const fn counts(&self) -> PageCounts {
        self.counts
    }

    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Number of pages requested so far.
    #[must_use]
    pub const fn pages_fetched(&self) -> u64 {
        self.next_page
    }

    fn fetch_page(&self, page: u64) -> Result<Vec<Record>, QueryError> {
        let params = RequestParams::page(&self.query, self.format, self.page_size, page);
        let body = self.engine.request(&params)?;

        let records = match self.format {
            Format::Json => decode::decode_json_page(&body, page, self.counts, self.page_size)?
                .into_iter()
                .map(Record::Json)
                .collect(),
            Format::Cif => decode::decode_cif_page(&body, page),
        };

        tracing::debug!(
            page,
            npages = self.counts.npages,
            records = records.len(),
            "decoded page"
        );
        Ok(records)
    }
}

impl<T: Transport> Iterator for ResultStream<'_, T> {
    type Item = Result<Record, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Some(Ok(record));
            }

            if self.finished || self.next_page >= self.counts.npages {
                self.finished = true;
                return None;
            }

            let page = self.next_page;
            self.next_page += 1;

            match self.fetch_page(page) {
                Ok(records) => self.buffer.extend(records),
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<T: Transport> FusedIterator for ResultStream<'_, T> {}

impl<T> std::fmt::Debug for ResultStream<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultStream")
            .field("query", &self.query)
            .field("format", &self.format)
            .field("page_size", &self.page_size)
            .field("counts", &self.counts)
            .field("next_page", &self.next_page)
            .field("buffered", &self.buffer.len())
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
