//! Paging position derived from the last loaded page.

/// `ceil(total_count / page_size)`, or zero for an empty collection.
pub fn total_pages(total_count: u64, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size as u64) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PagingState {
    pub current_page_index: usize,
    pub total_pages: usize,
}

impl PagingState {
    /// The page count always covers `current_page_index`: a page the server
    /// delivered exists even when the configured page size disagrees with
    /// the server's.
    pub fn new(current_page_index: usize, total_count: u64, page_size: usize) -> Self {
        let counted = total_pages(total_count, page_size);
        let total_pages = if counted == 0 {
            0
        } else {
            counted.max(current_page_index + 1)
        };
        Self {
            current_page_index,
            total_pages,
        }
    }

    /// Highest valid page index. Zero when the collection is empty.
    pub fn last_index(&self) -> usize {
        self.total_pages.saturating_sub(1)
    }

    pub fn clamp(&self, index: usize) -> usize {
        index.min(self.last_index())
    }

    /// One-based page number for display and for the upstream `page` query.
    pub fn page_number(&self) -> usize {
        self.current_page_index + 1
    }
}
