//! Cross-page record lookup.
//!
//! A record that is not on the loaded page is found by walking the collection
//! forward from its first page, one round trip per page.

use crate::collection::PageSource;
use crate::entities::HasRecordId;
use crate::error::CollectionError;
use crate::page::PageRequest;
use crate::RecordId;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// A record found by [`RecordLocator::locate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<T> {
    pub record: T,
    /// Zero-based index of the page the record was found on.
    pub page_index: usize,
    pub pages_visited: usize,
}

pub struct RecordLocator<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S> RecordLocator<'a, S>
where
    S: PageSource + ?Sized,
    S::Record: HasRecordId,
{
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Walks forward from the first page until `target_id` is found or the
    /// next cursors run out.
    ///
    /// Visits each page at most once: a `next` cursor that was already
    /// followed ends the walk as if there were no more pages. A fetch
    /// failure aborts the walk.
    pub async fn locate(&self, target_id: RecordId) -> Result<Located<S::Record>, CollectionError> {
        let mut request = PageRequest::first();
        let mut page_index = 0;
        let mut followed = HashSet::new();

        loop {
            let page = self.source.fetch_page(&request).await?;
            debug!(target_id, page_index, records = page.len(), "scanning page");

            let next = page.next().cloned();
            if let Some(record) = page
                .into_records()
                .into_iter()
                .find(|record| record.record_id() == target_id)
            {
                info!(target_id, page_index, "record located");
                return Ok(Located {
                    record,
                    page_index,
                    pages_visited: page_index + 1,
                });
            }

            match next {
                Some(cursor) if followed.insert(cursor.clone()) => {
                    request = PageRequest::Cursor(cursor);
                    page_index += 1;
                }
                Some(cursor) => {
                    warn!(target_id, %cursor, "next cursor repeats an earlier page, stopping");
                    return Err(CollectionError::NotFound { id: target_id });
                }
                None => {
                    info!(target_id, pages_visited = page_index + 1, "record not found");
                    return Err(CollectionError::NotFound { id: target_id });
                }
            }
        }
    }
}
