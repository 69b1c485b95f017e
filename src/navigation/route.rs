//! Navigation requests and the views they open.

use super::search::SearchHit;
use crate::domain::{BookSummary, TimeBucket};
use crate::storage::SavedBookRecord;

/// A request from the home screen to open another view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationRequest {
    /// Detail card of one book.
    BookDetail(BookSummary),
    /// Books saved within a time bucket's window.
    TimeFiltered(TimeBucket),
    /// Search results for a query.
    Search(String),
}

/// A view on the navigation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    BookDetail(BookSummary),
    TimeFiltered {
        bucket: TimeBucket,
        /// `None` until the worker answers.
        records: Option<Vec<SavedBookRecord>>,
        selected: usize,
        /// Set when the worker could not read the saved books.
        error: Option<String>,
    },
    Search {
        query: String,
        hits: Vec<SearchHit>,
        selected: usize,
    },
}

impl Route {
    /// Title shown in the header while the route is on top.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::Home => "Shelfview".to_string(),
            Self::BookDetail(book) => book.title.clone(),
            Self::TimeFiltered { bucket, .. } => format!("Saved {}", bucket.label),
            Self::Search { query, .. } => format!("Search: {query}"),
        }
    }

    /// Number of rows of a list route, zero for the others.
    #[must_use]
    pub fn list_len(&self) -> usize {
        match self {
            Self::TimeFiltered { records, .. } => records.as_ref().map_or(0, Vec::len),
            Self::Search { hits, .. } => hits.len(),
            Self::Home | Self::BookDetail(_) => 0,
        }
    }

    /// Book under the cursor of a list route.
    #[must_use]
    pub fn selected_book(&self) -> Option<&BookSummary> {
        match self {
            Self::TimeFiltered {
                records: Some(records),
                selected,
                ..
            } => records.get(*selected).map(|record| &record.book),
            Self::Search { hits, selected, .. } => hits.get(*selected).map(|hit| &hit.book),
            _ => None,
        }
    }

    fn selected_mut(&mut self) -> Option<&mut usize> {
        match self {
            Self::TimeFiltered { selected, .. } | Self::Search { selected, .. } => Some(selected),
            Self::Home | Self::BookDetail(_) => None,
        }
    }

    /// Moves the cursor of a list route, wrapping around at both ends.
    pub(super) fn move_selection(&mut self, down: bool) -> bool {
        let len = self.list_len();
        let Some(selected) = self.selected_mut() else {
            return false;
        };
        if len == 0 {
            return false;
        }
        *selected = if down {
            (*selected + 1) % len
        } else if *selected == 0 {
            len - 1
        } else {
            *selected - 1
        };
        true
    }
}
