//! Paged collection controller.
//!
//! Holds exactly one loaded page of a remote collection, the paging position
//! derived from it, and a page-local sort order. Every page transition goes
//! through [`PagedCollection::begin_load`] / [`PagedCollection::finish_load`]
//! (or the combined [`PagedCollection::load_page`]).

use crate::entities::HasRecordId;
use crate::error::CollectionError;
use crate::page::{Page, PageRequest};
use crate::paging::PagingState;
use crate::sort::{sort_indices, SortState, Sortable};
use crate::RecordId;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Capability to fetch one page of a remote collection.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Record: Send;

    async fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> Result<Page<Self::Record>, CollectionError>;
}

#[derive(Debug, Clone)]
pub struct PagedCollection<T: Sortable> {
    page_size: usize,
    page: Option<Page<T>>,
    /// Indices into the loaded page's records, in display order.
    order: Vec<usize>,
    paging: PagingState,
    sort: SortState<T::Column>,
    in_flight: usize,
    error: Option<String>,
}

impl<T: Sortable> PagedCollection<T> {
    /// `page_size` is the configured server page size used to derive the
    /// page count.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            page: None,
            order: Vec::new(),
            paging: PagingState::default(),
            sort: SortState::default(),
            in_flight: 0,
            error: None,
        }
    }

    // ------------------------------------------------------------------------
    // Page transitions
    // ------------------------------------------------------------------------

    /// Marks a load of `page_index` as in flight and returns the request to
    /// issue for it.
    ///
    /// Loads are neither deduplicated nor cancelled; whichever result reaches
    /// [`finish_load`](Self::finish_load) last is what stays loaded.
    pub fn begin_load(&mut self, page_index: usize) -> PageRequest {
        self.in_flight += 1;
        debug!(page_index, in_flight = self.in_flight, "page load started");
        PageRequest::Index(page_index)
    }

    /// Applies the outcome of a load started with `begin_load`.
    ///
    /// On success the page, paging state and sort state are replaced
    /// wholesale and any stored error is cleared. On failure only the error
    /// message changes.
    pub fn finish_load(
        &mut self,
        page_index: usize,
        result: Result<Page<T>, CollectionError>,
    ) -> Result<(), CollectionError> {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(page) => {
                info!(
                    page_index,
                    records = page.len(),
                    total_count = page.total_count(),
                    "page loaded"
                );
                self.apply_page(page_index, page);
                Ok(())
            }
            Err(err) => {
                warn!(page_index, error = %err, "page load failed");
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn load_page<S>(&mut self, source: &S, page_index: usize) -> Result<(), CollectionError>
    where
        S: PageSource<Record = T> + ?Sized,
    {
        let request = self.begin_load(page_index);
        let result = source.fetch_page(&request).await;
        self.finish_load(page_index, result)
    }

    fn apply_page(&mut self, page_index: usize, page: Page<T>) {
        self.paging = PagingState::new(page_index, page.total_count(), self.page_size);
        self.order = (0..page.len()).collect();
        self.page = Some(page);
        self.sort = SortState::default();
        self.error = None;
    }

    /// Target index for moving forward `step` pages, clamped to the last
    /// page.
    ///
    /// `None` when the last fetch had no next cursor or the move would not
    /// go forward.
    pub fn advance(&self, step: usize) -> Option<usize> {
        if !self.has_next() {
            return None;
        }
        let current = self.paging.current_page_index;
        let target = self.paging.clamp(current.saturating_add(step));
        (target > current).then_some(target)
    }

    /// Target index for moving back `step` pages, clamped at zero.
    ///
    /// `None` when the last fetch had no previous cursor or the move would
    /// not go back.
    pub fn retreat(&self, step: usize) -> Option<usize> {
        if !self.has_previous() {
            return None;
        }
        let current = self.paging.current_page_index;
        let target = self.paging.clamp(current.saturating_sub(step));
        (target < current).then_some(target)
    }

    // ------------------------------------------------------------------------
    // Sorting
    // ------------------------------------------------------------------------

    /// Sorts the loaded page by `column`, toggling direction on repeated
    /// calls with the same column.
    pub fn sort_by(&mut self, column: T::Column) -> SortState<T::Column> {
        self.sort = self.sort.toggled(column);
        if let Some(page) = &self.page {
            sort_indices(page.records(), &mut self.order, column, self.sort.direction);
        }
        debug!(?column, direction = ?self.sort.direction, "page sorted");
        self.sort
    }

    pub fn sort_state(&self) -> SortState<T::Column> {
        self.sort
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    /// Records of the loaded page in display order.
    pub fn rows(&self) -> impl Iterator<Item = &T> + '_ {
        let records = self.page.as_ref().map(Page::records).unwrap_or(&[]);
        self.order.iter().filter_map(move |&index| records.get(index))
    }

    /// Record at display position `position`.
    pub fn row(&self, position: usize) -> Option<&T> {
        let index = *self.order.get(position)?;
        self.page.as_ref()?.records().get(index)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn page(&self) -> Option<&Page<T>> {
        self.page.as_ref()
    }

    pub fn paging(&self) -> PagingState {
        self.paging
    }

    pub fn current_page_index(&self) -> usize {
        self.paging.current_page_index
    }

    pub fn total_pages(&self) -> usize {
        self.paging.total_pages
    }

    pub fn total_count(&self) -> u64 {
        self.page.as_ref().map(Page::total_count).unwrap_or(0)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_next(&self) -> bool {
        self.page.as_ref().is_some_and(|page| page.next().is_some())
    }

    pub fn has_previous(&self) -> bool {
        self.page.as_ref().is_some_and(|page| page.previous().is_some())
    }

    pub fn is_loaded(&self) -> bool {
        self.page.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

impl<T: Sortable + HasRecordId> PagedCollection<T> {
    /// Display position of the record with `id` on the loaded page.
    pub fn position_of(&self, id: RecordId) -> Option<usize> {
        self.rows().position(|record| record.record_id() == id)
    }
}
