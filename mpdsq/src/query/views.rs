//! Structures and properties collections.
//!
//! Both are read-only filters over `QueryEngine::find`. The API mixes record
//! kinds in one result set; the views keep only the kind they stand for.

use std::iter::FusedIterator;

use super::engine::QueryEngine;
use super::stream::ResultStream;
use crate::error::QueryError;
use crate::transport::Transport;
use crate::types::{Format, ObjectType, PageCounts, Query, Record};

/// Structure records.
///
/// JSON: entries tagged `object_type == "S"`. Text: every block whose first
/// line does not start with `data_error`.
#[derive(Debug)]
pub struct Structures<'a, T> {
    engine: &'a QueryEngine<T>,
}

impl<'a, T: Transport> Structures<'a, T> {
    pub(super) const fn new(engine: &'a QueryEngine<T>) -> Self {
        Self { engine }
    }

    /// Stream the structures matching `query`.
    ///
    /// `format` defaults to the engine's configured format.
    ///
    /// # Errors
    /// Errors from the count request.
    pub fn find(
        &self,
        query: &Query,
        format: Option<Format>,
    ) -> Result<FilteredStream<'a, T>, QueryError> {
        let format = format.unwrap_or_else(|| self.engine.config().format());
        let stream = self.engine.find(query, format)?;
        Ok(FilteredStream::new(stream, is_structure))
    }
}

/// Property records: JSON entries tagged `object_type == "P"`.
#[derive(Debug)]
pub struct Properties<'a, T> {
    engine: &'a QueryEngine<T>,
}

impl<'a, T: Transport> Properties<'a, T> {
    pub(super) const fn new(engine: &'a QueryEngine<T>) -> Self {
        Self { engine }
    }

    /// Stream the properties matching `query`. Always uses JSON.
    ///
    /// # Errors
    /// Errors from the count request.
    pub fn find(&self, query: &Query) -> Result<FilteredStream<'a, T>, QueryError> {
        let stream = self.engine.find(query, Format::Json)?;
        Ok(FilteredStream::new(stream, is_property))
    }
}

fn is_structure(record: &Record) -> bool {
    match record {
        Record::Json(_) => record.object_type() == Some(ObjectType::Structure),
        Record::Cif(_) => !record.is_error_block(),
    }
}

fn is_property(record: &Record) -> bool {
    record.object_type() == Some(ObjectType::Property)
}

/// A `ResultStream` with records of other kinds skipped.
///
/// Errors are never filtered out.
pub struct FilteredStream<'a, T> {
    inner: ResultStream<'a, T>,
    keep: fn(&Record) -> bool,
}

impl<'a, T: Transport> FilteredStream<'a, T> {
    const fn new(inner: ResultStream<'a, T>, keep: fn(&Record) -> bool) -> Self {
        Self { inner, keep }
    }

    /// Totals of the unfiltered result set.
    #[must_use]
    pub const fn counts(&self) -> PageCounts {
        self.inner.counts()
    }

    /// Number of pages requested so far.
    #[must_use]
    pub const fn pages_fetched(&self) -> u64 {
        self.inner.pages_fetched()
    }
}

impl<T: Transport> Iterator for FilteredStream<'_, T> {
    type Item = Result<Record, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(record) if !(self.keep)(&record) => {}
                item => return Some(item),
            }
        }
    }
}

impl<T: Transport> FusedIterator for FilteredStream<'_, T> {}

impl<T> std::fmt::Debug for FilteredStream<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilteredStream")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
