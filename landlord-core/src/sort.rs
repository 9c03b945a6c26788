//! Page-local sorting.
//!
//! Sorting only ever reorders the records of the page that is currently
//! loaded; it never triggers a fetch and is reset when a new page arrives.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A comparable value extracted from one column of a record.
///
/// Numbers order before text. Text compares case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Number(i64),
    Text(&'a str),
}

impl Ord for FieldValue<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase)),
            (FieldValue::Number(_), FieldValue::Text(_)) => Ordering::Less,
            (FieldValue::Text(_), FieldValue::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for FieldValue<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Records that expose sortable columns.
pub trait Sortable {
    type Column: Copy + Eq + std::fmt::Debug;

    fn sort_value(&self, column: Self::Column) -> FieldValue<'_>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::None => "",
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Which column the current page is sorted by, and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<C> {
    pub column: Option<C>,
    pub direction: SortDirection,
}

impl<C> Default for SortState<C> {
    fn default() -> Self {
        Self {
            column: None,
            direction: SortDirection::None,
        }
    }
}

impl<C: Copy + Eq> SortState<C> {
    /// Transition for a click on `column`.
    ///
    /// Same column flips ascending/descending; a different column starts
    /// ascending.
    pub fn toggled(self, column: C) -> Self {
        let direction = match (self.column, self.direction) {
            (Some(current), SortDirection::Ascending) if current == column => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        Self {
            column: Some(column),
            direction,
        }
    }

    pub fn is_sorted_by(&self, column: C) -> bool {
        self.column == Some(column) && self.direction != SortDirection::None
    }
}

/// Stably reorders `order` (indices into `records`) by `column`.
///
/// Ties keep the relative order they had in `order` before the call.
pub fn sort_indices<T: Sortable>(
    records: &[T],
    order: &mut [usize],
    column: T::Column,
    direction: SortDirection,
) {
    match direction {
        SortDirection::None => {}
        SortDirection::Ascending => order.sort_by(|&a, &b| {
            records[a]
                .sort_value(column)
                .cmp(&records[b].sort_value(column))
        }),
        SortDirection::Descending => order.sort_by(|&a, &b| {
            records[b]
                .sort_value(column)
                .cmp(&records[a].sort_value(column))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Col {
        A,
        B,
    }

    struct Row {
        n: i64,
        s: &'static str,
    }

    impl Sortable for Row {
        type Column = Col;

        fn sort_value(&self, column: Col) -> FieldValue<'_> {
            match column {
                Col::A => FieldValue::Number(self.n),
                Col::B => FieldValue::Text(self.s),
            }
        }
    }

    #[test]
    fn test_toggle_cycle() {
        let state = SortState::<Col>::default();
        let state = state.toggled(Col::A);
        assert_eq!(state.direction, SortDirection::Ascending);
        let state = state.toggled(Col::A);
        assert_eq!(state.direction, SortDirection::Descending);
        let state = state.toggled(Col::A);
        assert_eq!(state.direction, SortDirection::Ascending);
        let state = state.toggled(Col::B);
        assert_eq!(state.column, Some(Col::B));
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_text_compares_case_insensitively() {
        assert_eq!(
            FieldValue::Text("alpha").cmp(&FieldValue::Text("Beta")),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Text("ABC").cmp(&FieldValue::Text("abc")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_numbers_before_text() {
        assert!(FieldValue::Number(i64::MAX) < FieldValue::Text(""));
    }

    #[test]
    fn test_sort_indices_stable_descending() {
        let rows = vec![
            Row { n: 1, s: "x" },
            Row { n: 2, s: "y" },
            Row { n: 1, s: "z" },
        ];
        let mut order = vec![0, 1, 2];
        sort_indices(&rows, &mut order, Col::A, SortDirection::Descending);
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn test_sort_indices_none_is_noop() {
        let rows = vec![Row { n: 3, s: "a" }, Row { n: 1, s: "b" }];
        let mut order = vec![0, 1];
        sort_indices(&rows, &mut order, Col::A, SortDirection::None);
        assert_eq!(order, vec![0, 1]);
    }
}
