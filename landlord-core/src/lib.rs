//! Landlord Core - Records and Paged Collection State
//!
//! Entity types for the landlord API, the page/cursor model, and the two
//! state machines that sit on top of it: the paged collection controller and
//! the cross-page record locator. Nothing here performs I/O directly; fetching
//! goes through the [`PageSource`] seam.

pub mod collection;
pub mod entities;
pub mod error;
pub mod locator;
pub mod page;
pub mod paging;
pub mod sort;

pub use collection::{PageSource, PagedCollection};
pub use entities::{HasRecordId, Landlord, LandlordColumn, Message, MessageList, Property};
pub use error::CollectionError;
pub use locator::{Located, RecordLocator};
pub use page::{Cursor, Page, PageRequest};
pub use paging::{total_pages, PagingState};
pub use sort::{FieldValue, SortDirection, SortState, Sortable};

/// Identifier type used by the upstream API for every record.
pub type RecordId = i64;
