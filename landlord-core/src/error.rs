//! Error types for collection operations

use crate::RecordId;
use thiserror::Error;

/// Failures surfaced by page loads and record lookups.
///
/// Neither variant is retried automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollectionError {
    /// Fetch failed, the server answered non-2xx, or the body was unreadable.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Landlord {id} not found")]
    NotFound { id: RecordId },
}

impl CollectionError {
    pub fn network(message: impl Into<String>) -> Self {
        CollectionError::Network(message.into())
    }
}
