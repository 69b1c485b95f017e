//! JSON file-based storage backend.
//!
//! Keeps the whole library in memory and rewrites the file on every change,
//! using a temporary file and a rename so a crash never leaves a half-written
//! library behind.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - loads entire file into memory once
//! - **Write**: O(n) - serializes and writes entire dataset
//! - **Best for**: personal reading lists of a few thousand books

use crate::domain::error::{Result, ShelfError};
use crate::domain::BookSummary;
use crate::storage::backend::Storage;
use crate::storage::models::SavedBookRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const LIBRARY_VERSION: u32 = 1;

/// JSON storage container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LibraryData {
    /// Version of the storage format for future migrations.
    version: u32,

    /// Saved books, indexed by catalog key.
    #[serde(default)]
    books: HashMap<String, SavedBookRecord>,
}

impl Default for LibraryData {
    fn default() -> Self {
        Self {
            version: LIBRARY_VERSION,
            books: HashMap::new(),
        }
    }
}

impl LibraryData {
    /// Records sorted newest first; ties are broken by key so the order is
    /// stable across loads.
    fn sorted_records(&self) -> Vec<&SavedBookRecord> {
        let mut records: Vec<&SavedBookRecord> = self.books.values().collect();
        records.sort_by(|a, b| {
            b.saved_at
                .cmp(&a.saved_at)
                .then_with(|| a.key().cmp(b.key()))
        });
        records
    }
}

/// JSON file storage backend.
///
/// This type is `Send` but not `Sync`; it lives on the worker thread.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "books": {
///     "OL893415W": {
///       "book": { "key": "OL893415W", "title": "Dune", "author": "Frank Herbert" },
///       "saved_at": 1700000000
///     }
///   }
/// }
/// ```
pub struct JsonStorage {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory data cache, loaded on creation.
    data: LibraryData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage backend.
    ///
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing library storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty library");
            LibraryData::default()
        };

        tracing::debug!(book_count = data.books.len(), "library initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    fn load_from_file(path: &Path) -> Result<LibraryData> {
        let contents = std::fs::read_to_string(path)?;
        let data: LibraryData = serde_json::from_str(&contents)
            .map_err(|e| ShelfError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version > LIBRARY_VERSION {
            return Err(ShelfError::Storage(format!(
                "library version {} is newer than supported version {LIBRARY_VERSION}",
                data.version
            )));
        }

        tracing::debug!(version = data.version, books = data.books.len(), "loaded library");
        Ok(data)
    }

    /// Writes the library with a temp file and rename.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the write or the rename fails.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| ShelfError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "library saved");
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn recent_books(&self) -> Result<Vec<BookSummary>> {
        let _span = tracing::debug_span!("json_recent_books").entered();

        let books: Vec<BookSummary> = self
            .data
            .sorted_records()
            .into_iter()
            .map(|record| record.book.clone())
            .collect();

        tracing::debug!(count = books.len(), "retrieved recent books");
        Ok(books)
    }

    fn toggle_saved(&mut self, book: &BookSummary, timestamp: i64) -> Result<bool> {
        let _span = tracing::debug_span!("json_toggle_saved", key = %book.key).entered();

        let saved = if self.data.books.remove(&book.key).is_some() {
            false
        } else {
            self.data
                .books
                .insert(book.key.clone(), SavedBookRecord::new(book.clone(), timestamp));
            true
        };

        self.dirty = true;
        self.save_to_file()?;

        tracing::debug!(saved = saved, "saved state toggled");
        Ok(saved)
    }

    fn is_saved(&self, key: &str) -> Result<bool> {
        Ok(self.data.books.contains_key(key))
    }

    fn saved_since(&self, cutoff: i64) -> Result<Vec<SavedBookRecord>> {
        let _span = tracing::debug_span!("json_saved_since", cutoff = cutoff).entered();

        let records: Vec<SavedBookRecord> = self
            .data
            .sorted_records()
            .into_iter()
            .filter(|record| record.saved_at >= cutoff)
            .cloned()
            .collect();

        tracing::debug!(count = records.len(), "retrieved saved books in window");
        Ok(records)
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_in(dir: &TempDir) -> JsonStorage {
        JsonStorage::new(dir.path().join("library.json")).unwrap()
    }

    #[test]
    fn toggling_twice_removes_the_book() {
        let dir = TempDir::new().unwrap();
        let mut storage = storage_in(&dir);
        let dune = BookSummary::new("OL1W", "Dune");

        assert!(storage.toggle_saved(&dune, 100).unwrap());
        assert!(storage.is_saved("OL1W").unwrap());
        assert!(!storage.toggle_saved(&dune, 200).unwrap());
        assert!(!storage.is_saved("OL1W").unwrap());
    }

    #[test]
    fn saved_books_survive_reopening() {
        let dir = TempDir::new().unwrap();
        {
            let mut storage = storage_in(&dir);
            storage
                .toggle_saved(&BookSummary::new("OL1W", "Dune").with_author("Frank Herbert"), 100)
                .unwrap();
        }

        let reopened = storage_in(&dir);
        let books = reopened.recent_books().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].author_line(), "Frank Herbert");
    }

    #[test]
    fn recent_books_are_newest_first() {
        let dir = TempDir::new().unwrap();
        let mut storage = storage_in(&dir);
        storage.toggle_saved(&BookSummary::new("old", "Old"), 100).unwrap();
        storage.toggle_saved(&BookSummary::new("new", "New"), 300).unwrap();
        storage.toggle_saved(&BookSummary::new("mid", "Mid"), 200).unwrap();

        let keys: Vec<String> = storage
            .recent_books()
            .unwrap()
            .into_iter()
            .map(|book| book.key)
            .collect();
        assert_eq!(keys, vec!["new", "mid", "old"]);
    }

    #[test]
    fn saved_since_filters_by_cutoff() {
        let dir = TempDir::new().unwrap();
        let mut storage = storage_in(&dir);
        storage.toggle_saved(&BookSummary::new("a", "A"), 100).unwrap();
        storage.toggle_saved(&BookSummary::new("b", "B"), 500).unwrap();

        let records = storage.saved_since(200).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key(), "b");
    }

    #[test]
    fn invalid_json_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(JsonStorage::new(path), Err(ShelfError::Storage(_))));
    }

    #[test]
    fn newer_library_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(&path, r#"{ "version": 99, "books": {} }"#).unwrap();

        assert!(matches!(JsonStorage::new(path), Err(ShelfError::Storage(_))));
    }
}
