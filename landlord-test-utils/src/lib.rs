//! Landlord Desk Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - An in-memory page source that records every request
//! - Proptest generators for landlord entities and collections
//! - Fixtures for common scenarios

pub use landlord_core::{
    CollectionError, Cursor, HasRecordId, Landlord, LandlordColumn, Message, Page, PageRequest,
    PageSource, Property, RecordId,
};

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

// ============================================================================
// MOCK PAGE SOURCE
// ============================================================================

const CURSOR_PREFIX: &str = "mock://page/";

/// In-memory paginated collection.
///
/// Records are split into pages of `page_size`; next/previous cursors look
/// like `mock://page/<index>`. Every request is logged so tests can assert on
/// the exact fetch sequence.
#[derive(Debug)]
pub struct MockPageSource<T> {
    records: Vec<T>,
    page_size: usize,
    fail_at: HashSet<usize>,
    requests: Mutex<Vec<PageRequest>>,
}

impl<T: Clone> MockPageSource<T> {
    pub fn new(records: Vec<T>, page_size: usize) -> Self {
        Self {
            records,
            page_size: page_size.max(1),
            fail_at: HashSet::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Make fetches of page `index` fail with a network error.
    pub fn with_failure_at(mut self, index: usize) -> Self {
        self.fail_at.insert(index);
        self
    }

    pub fn cursor_for(index: usize) -> Cursor {
        Cursor::new(format!("{}{}", CURSOR_PREFIX, index))
    }

    pub fn page_count(&self) -> usize {
        self.records.len().div_ceil(self.page_size).max(1)
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn fetch_count(&self) -> usize {
        self.requests().len()
    }

    pub fn page(&self, index: usize) -> Page<T> {
        let start = (index * self.page_size).min(self.records.len());
        let end = (start + self.page_size).min(self.records.len());
        let mut page = Page::new(self.records[start..end].to_vec(), self.records.len() as u64);
        if index + 1 < self.page_count() {
            page = page.with_next(Self::cursor_for(index + 1));
        }
        if index > 0 {
            page = page.with_previous(Self::cursor_for(index - 1));
        }
        page
    }

    fn resolve(request: &PageRequest) -> Result<usize, CollectionError> {
        match request {
            PageRequest::Index(index) => Ok(*index),
            PageRequest::Cursor(cursor) => cursor
                .as_str()
                .strip_prefix(CURSOR_PREFIX)
                .and_then(|index| index.parse().ok())
                .ok_or_else(|| CollectionError::network(format!("bad cursor {}", cursor))),
        }
    }
}

#[async_trait]
impl<T> PageSource for MockPageSource<T>
where
    T: Clone + Send + Sync,
{
    type Record = T;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<T>, CollectionError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let index = Self::resolve(request)?;
        if self.fail_at.contains(&index) {
            return Err(CollectionError::network("HTTP 503: service unavailable"));
        }
        if index >= self.page_count() {
            return Err(CollectionError::network("HTTP 404: Invalid page."));
        }
        Ok(self.page(index))
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for landlord entities.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_property(property_id: RecordId) -> impl Strategy<Value = Property> {
        (
            proptest::option::of(1i64..1000),
            proptest::option::of(0i64..8),
            prop::sample::select(vec!["Apartment", "Villa", "Townhouse", "Office"]),
            "[A-Z]?[0-9]{1,4}",
        )
            .prop_map(move |(p_number, no_room, property_type, unit_no)| Property {
                property_id,
                p_number,
                no_room,
                property_type: property_type.to_string(),
                unit_no,
                area: "Marina".to_string(),
                building_name: "Tower A".to_string(),
                project: "Harbour".to_string(),
                state: "Dubai".to_string(),
            })
    }

    /// A landlord with the given id and arbitrary display fields.
    ///
    /// Names and message counts are drawn from small pools so that sorting
    /// sees plenty of ties.
    pub fn arb_landlord(landlord_id: RecordId) -> impl Strategy<Value = Landlord> {
        (
            prop::sample::select(vec!["amal", "Amal", "bilal", "Chen", "dara", "Eve"]),
            0i64..4,
            0usize..3,
        )
            .prop_flat_map(move |(name, messages_count, property_count)| {
                proptest::collection::vec(arb_property(landlord_id * 100), property_count)
                    .prop_map(move |properties| Landlord {
                        landlord_id,
                        full_name: name.to_string(),
                        email: format!("landlord{}@example.com", landlord_id),
                        phone_1: format!("+9715{:08}", landlord_id),
                        messages_count,
                        properties,
                    })
            })
    }

    /// Between `min` and `max` landlords with unique ids `1..=n`.
    pub fn arb_landlords(min: usize, max: usize) -> impl Strategy<Value = Vec<Landlord>> {
        (min..=max).prop_flat_map(|count| {
            (1..=count as i64)
                .map(arb_landlord)
                .collect::<Vec<_>>()
        })
    }

    pub fn arb_page_size() -> impl Strategy<Value = usize> {
        1usize..8
    }

    pub fn arb_column() -> impl Strategy<Value = LandlordColumn> {
        prop::sample::select(LandlordColumn::all().to_vec())
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records for common scenarios.

    use super::*;

    pub fn landlord(landlord_id: RecordId, full_name: &str) -> Landlord {
        Landlord {
            landlord_id,
            full_name: full_name.to_string(),
            email: format!("landlord{}@example.com", landlord_id),
            phone_1: format!("+9715{:08}", landlord_id),
            messages_count: 0,
            properties: Vec::new(),
        }
    }

    /// Landlords with ids `1..=count`, named "Landlord <id>".
    pub fn landlords(count: usize) -> Vec<Landlord> {
        (1..=count as i64)
            .map(|id| landlord(id, &format!("Landlord {}", id)))
            .collect()
    }

    pub fn property(property_id: RecordId) -> Property {
        Property {
            property_id,
            p_number: Some(property_id * 10),
            no_room: Some(2),
            property_type: "Apartment".to_string(),
            unit_no: format!("{}", 100 + property_id),
            area: "Marina".to_string(),
            building_name: "Tower A".to_string(),
            project: "Harbour".to_string(),
            state: "Dubai".to_string(),
        }
    }

    pub fn message(message_id: RecordId, landlord: RecordId, text: &str) -> Message {
        Message {
            message_id,
            message: text.to_string(),
            timestamp: "2024-03-01T10:15:00Z".to_string(),
            landlord,
        }
    }

    /// The twelve-landlord, five-per-page collection: three pages, the last
    /// holding two records.
    pub fn twelve_by_five() -> MockPageSource<Landlord> {
        MockPageSource::new(landlords(12), 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_split_with_cursors() {
        let source = fixtures::twelve_by_five();
        assert_eq!(source.page_count(), 3);

        let first = source.page(0);
        assert_eq!(first.len(), 5);
        assert_eq!(first.total_count(), 12);
        assert_eq!(first.next(), Some(&MockPageSource::<Landlord>::cursor_for(1)));
        assert!(first.previous().is_none());

        let last = source.page(2);
        assert_eq!(last.len(), 2);
        assert!(last.next().is_none());
        assert_eq!(last.previous(), Some(&MockPageSource::<Landlord>::cursor_for(1)));
    }

    #[test]
    fn test_empty_source_has_one_empty_page() {
        let source = MockPageSource::<Landlord>::new(Vec::new(), 5);
        assert_eq!(source.page_count(), 1);
        assert!(source.page(0).is_empty());
        assert!(source.page(0).next().is_none());
    }

    #[test]
    fn test_resolve_rejects_foreign_cursor() {
        let request = PageRequest::Cursor(Cursor::new("https://elsewhere/?page=2"));
        assert!(MockPageSource::<Landlord>::resolve(&request).is_err());
    }
}
