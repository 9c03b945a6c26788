//! Page and cursor types for the paginated landlord collection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque token identifying another page of the collection.
///
/// The server hands these out as URLs; nothing outside the HTTP layer should
/// look inside one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a page is addressed when it is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// Zero-based page index.
    Index(usize),
    /// A cursor returned by a previous fetch.
    Cursor(Cursor),
}

impl PageRequest {
    pub fn first() -> Self {
        PageRequest::Index(0)
    }
}

/// One fetched batch of records plus pagination metadata.
///
/// Deserializes straight from the `{ results, count, next, previous }`
/// envelope the collection endpoint returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(rename = "results")]
    records: Vec<T>,
    #[serde(default)]
    next: Option<Cursor>,
    #[serde(default)]
    previous: Option<Cursor>,
    #[serde(rename = "count", default)]
    total_count: u64,
}

impl<T> Page<T> {
    pub fn new(records: Vec<T>, total_count: u64) -> Self {
        Self {
            records,
            next: None,
            previous: None,
            total_count,
        }
    }

    pub fn with_next(mut self, cursor: Cursor) -> Self {
        self.next = Some(cursor);
        self
    }

    pub fn with_previous(mut self, cursor: Cursor) -> Self {
        self.previous = Some(cursor);
        self
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    pub fn next(&self) -> Option<&Cursor> {
        self.next.as_ref()
    }

    pub fn previous(&self) -> Option<&Cursor> {
        self.previous.as_ref()
    }

    /// Total number of records in the whole collection, as reported by the
    /// server on this page.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
