//! Storage record models for the saved-books library.
//!
//! Records wrap the domain [`BookSummary`] with the bookkeeping the store
//! needs, keeping persistence details out of the domain types.

use crate::domain::BookSummary;
use serde::{Deserialize, Serialize};

/// A book the user added to their list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBookRecord {
    /// Display summary captured when the book was saved.
    pub book: BookSummary,

    /// Unix timestamp of when the book was saved.
    pub saved_at: i64,
}

impl SavedBookRecord {
    /// Creates a record saved at the given time.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfview::domain::BookSummary;
    /// use shelfview::storage::SavedBookRecord;
    ///
    /// let record = SavedBookRecord::new(BookSummary::new("OL1W", "Dune"), 1_700_000_000);
    /// assert_eq!(record.key(), "OL1W");
    /// ```
    #[must_use]
    pub const fn new(book: BookSummary, saved_at: i64) -> Self {
        Self { book, saved_at }
    }

    /// Creates a record saved now.
    #[must_use]
    pub fn now(book: BookSummary) -> Self {
        Self::new(book, chrono::Utc::now().timestamp())
    }

    /// Catalog key of the saved book.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.book.key
    }
}
