//! Page decoding for both response formats.

use std::str::Lines;

use serde::Deserialize;
use serde_json::Value;

use crate::error::QueryError;
use crate::types::{PageCounts, Record, SENTINEL_PREFIX};

/// Body of the count request. Only the counters are read.
#[derive(Deserialize)]
struct CountBody {
    count: Option<u64>,
    npages: Option<u64>,
    error: Option<String>,
}

/// Body of a JSON page. Only `out` is read.
#[derive(Deserialize)]
struct PageBody {
    out: Option<Vec<Value>>,
}

fn parse<'de, B: Deserialize<'de>>(body: &'de str) -> Result<B, QueryError> {
    serde_json::from_str(body)
        .map_err(|e| QueryError::ResponseFormat(format!("body is not valid JSON: {e}")))
}

/// Read `count` and `npages` from the count request's body.
pub fn decode_counts(body: &str) -> Result<PageCounts, QueryError> {
    let parsed: CountBody = parse(body)?;

    let missing = |field: &str| match &parsed.error {
        Some(error) => QueryError::ResponseFormat(format!(
            "missing '{field}' field, server reported: {error}"
        )),
        None => QueryError::ResponseFormat(format!("missing '{field}' field")),
    };

    let count = parsed.count.ok_or_else(|| missing("count"))?;
    let npages = parsed.npages.ok_or_else(|| missing("npages"))?;

    Ok(PageCounts { count, npages })
}

/// Read the real entries of JSON page `page`.
///
/// Entries past `counts.entries_on_page(page, page_size)` are padding and are
/// dropped. A page with fewer entries than that is malformed.
pub fn decode_json_page(
    body: &str,
    page: u64,
    counts: PageCounts,
    page_size: u32,
) -> Result<Vec<Value>, QueryError> {
    let parsed: PageBody = parse(body)?;
    let mut out = parsed
        .out
        .ok_or_else(|| QueryError::ResponseFormat(format!("page {page} is missing 'out'")))?;

    let expected = usize::try_from(counts.entries_on_page(page, page_size)).map_err(|_| {
        QueryError::ResponseFormat(format!("page {page} is too large for this platform"))
    })?;

    if out.len() < expected {
        return Err(QueryError::ResponseFormat(format!(
            "page {page} has {} entries, expected {expected}",
            out.len()
        )));
    }

    if out.len() > expected {
        tracing::debug!(
            page,
            padding = out.len() - expected,
            "dropping padding entries from page"
        );
        out.truncate(expected);
    }

    Ok(out)
}

/// Split one text page into blocks.
pub fn decode_cif_page(body: &str, page: u64) -> Vec<Record> {
    let blocks = TextBlocks::new(body);
    if blocks.discarded_lines() > 0 {
        tracing::warn!(
            page,
            lines = blocks.discarded_lines(),
            "discarding text before the first data_ line"
        );
    }
    blocks.map(Record::Cif).collect()
}

/// Iterator over the `data_`-delimited blocks of a text body.
///
/// A line starting with `data_` opens a block; every following line up to the
/// next `data_` line (or the end of input) belongs to it. Lines are rejoined
/// with `\n`. Lines before the first `data_` line belong to no block and are
/// dropped.
///
/// ```
/// use mpdsq::query::TextBlocks;
///
/// let text = "preamble\ndata_a\n_x 1\ndata_b\n_y 2\n";
/// let blocks: Vec<String> = TextBlocks::new(text).collect();
/// assert_eq!(blocks, vec!["data_a\n_x 1", "data_b\n_y 2"]);
/// ```
#[derive(Debug)]
pub struct TextBlocks<'a> {
    lines: Lines<'a>,
    /// Sentinel line of the next block, already consumed from `lines`.
    pending: Option<&'a str>,
    /// Non-blank lines dropped before the first sentinel.
    discarded: usize,
}

impl<'a> TextBlocks<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let mut lines = text.lines();
        let mut pending = None;
        let mut discarded = 0;

        for line in lines.by_ref() {
            if line.starts_with(SENTINEL_PREFIX) {
                pending = Some(line);
                break;
            }
            if !line.trim().is_empty() {
                discarded += 1;
            }
        }

        Self {
            lines,
            pending,
            discarded,
        }
    }

    /// Number of non-blank lines dropped before the first block.
    #[must_use]
    pub const fn discarded_lines(&self) -> usize {
        self.discarded
    }
}

impl Iterator for TextBlocks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let header = self.pending.take()?;
        let mut block = header.to_owned();

        for line in self.lines.by_ref() {
            if line.starts_with(SENTINEL_PREFIX) {
                self.pending = Some(line);
                break;
            }
            block.push('\n');
            block.push_str(line);
        }

        Some(block)
    }
}

impl std::iter::FusedIterator for TextBlocks<'_> {}
