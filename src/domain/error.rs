//! Error types for the Shelfview plugin.
//!
//! This module defines the centralized error type [`ShelfError`], the
//! [`Result`] alias used across the crate, and [`RefreshFailure`], the
//! non-fatal outcome of a refresh that could not assemble a complete snapshot.
//! All errors are implemented using the `thiserror` crate.

use thiserror::Error;

/// The main error type for Shelfview plugin operations.
///
/// Most variants carry a description of what went wrong. I/O errors convert
/// automatically through `#[from]`.
///
/// # Examples
///
/// ```
/// use shelfview::ShelfError;
///
/// fn read_catalog() -> Result<(), ShelfError> {
///     Err(ShelfError::Catalog("missing `books` array".to_string()))
/// }
/// assert!(read_catalog().is_err());
/// ```
#[derive(Debug, Error)]
pub enum ShelfError {
    /// Storage operation failed.
    ///
    /// Occurs when the saved-books library cannot be read, parsed or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The top-books catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(String),
}

/// A refresh could not build a complete snapshot.
///
/// Never surfaced to the user: the previously displayed snapshot stays on
/// screen. Partial snapshots are never applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RefreshFailure {
    /// The top-books list has not been loaded yet, or loading failed.
    #[error("top books are not available yet")]
    TopBooksUnavailable,

    /// The saved-books store has not produced a list yet.
    #[error("recent books are not available yet")]
    RecentBooksUnavailable,
}

/// A specialized `Result` type for Shelfview operations.
pub type Result<T> = std::result::Result<T, ShelfError>;
