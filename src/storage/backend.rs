//! Storage backend abstraction.
//!
//! The [`Storage`] trait covers exactly what the worker needs from the
//! saved-books library: listing recent saves, toggling a book and answering
//! time-window queries for the filtered views.

use crate::domain::error::Result;
use crate::domain::BookSummary;
use crate::storage::models::SavedBookRecord;

/// Abstraction over persistent saved-books backends.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use shelfview::storage::{JsonStorage, Storage};
/// use std::path::PathBuf;
///
/// let storage = JsonStorage::new(PathBuf::from("/tmp/library.json"))?;
/// let recent = storage.recent_books()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// All saved books, most recently saved first.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn recent_books(&self) -> Result<Vec<BookSummary>>;

    /// Saves the book if it is not saved, removes it otherwise.
    ///
    /// Returns the new saved state.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    fn toggle_saved(&mut self, book: &BookSummary, timestamp: i64) -> Result<bool>;

    /// Whether a book with this key is saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn is_saved(&self, key: &str) -> Result<bool>;

    /// Saved records with `saved_at >= cutoff`, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn saved_since(&self, cutoff: i64) -> Result<Vec<SavedBookRecord>>;
}
