//! Domain layer for the Shelfview plugin.
//!
//! Core types that do not depend on Zellij or on the storage format:
//!
//! - [`error`]: Error types and result aliases
//! - [`book`]: Book summaries, cover references and time buckets
//! - [`catalog`]: Top-books catalog file format
//! - [`item`]: Section identifiers and the row item union
//!
//! # Examples
//!
//! ```
//! use shelfview::domain::{BookSummary, Item, Section};
//!
//! let item = Item::from(BookSummary::new("OL45883W", "Dune").with_author("Frank Herbert"));
//! assert!(item.as_book().is_some());
//! assert!(Section::RecentBooks.is_toggleable());
//! ```

pub mod book;
pub mod catalog;
pub mod error;
pub mod item;

pub use book::{BookSummary, CoverRef, TimeBucket};
pub use catalog::parse_catalog;
pub use error::{RefreshFailure, Result, ShelfError};
pub use item::{Item, ItemId, Section};
