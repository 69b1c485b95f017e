//! Section identifiers and row items of the home screen.
//!
//! The screen has exactly three sections in a fixed order. Every row is an
//! [`Item`]: either a time bucket or a book summary, never both. Diffing and
//! selection work on [`ItemId`], the stable identity of an item.

use super::book::{BookSummary, TimeBucket};
use serde::{Deserialize, Serialize};

/// The three fixed sections of the home screen, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    Time,
    TopBooks,
    RecentBooks,
}

impl Section {
    /// All sections in display order.
    pub const ALL: [Self; 3] = [Self::Time, Self::TopBooks, Self::RecentBooks];

    /// Whether the section can switch between rail and grid presentation.
    #[must_use]
    pub const fn is_toggleable(self) -> bool {
        !matches!(self, Self::Time)
    }

    /// Human-readable section title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Time => "Browse by Time",
            Self::TopBooks => "Top Books",
            Self::RecentBooks => "Recent Books",
        }
    }

    /// Position of the section in [`Section::ALL`].
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Time => 0,
            Self::TopBooks => 1,
            Self::RecentBooks => 2,
        }
    }

    /// The next section in display order, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Time => Some(Self::TopBooks),
            Self::TopBooks => Some(Self::RecentBooks),
            Self::RecentBooks => None,
        }
    }

    /// The previous section in display order, if any.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Time => None,
            Self::TopBooks => Some(Self::Time),
            Self::RecentBooks => Some(Self::TopBooks),
        }
    }
}

/// Stable identity of a row, used for diffing and selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemId {
    /// Time bucket, identified by its position.
    Time(usize),
    /// Book, identified by its catalog key.
    Book(String),
}

/// A row of the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Item {
    Time(TimeBucket),
    Book(BookSummary),
}

impl Item {
    /// Identity of the row.
    ///
    /// ```
    /// use shelfview::domain::{BookSummary, Item, ItemId};
    ///
    /// let item = Item::Book(BookSummary::new("OL45883W", "Dune"));
    /// assert_eq!(item.id(), ItemId::Book("OL45883W".to_string()));
    /// ```
    #[must_use]
    pub fn id(&self) -> ItemId {
        match self {
            Self::Time(bucket) => ItemId::Time(bucket.index),
            Self::Book(book) => ItemId::Book(book.key.clone()),
        }
    }

    /// The book payload, if this row is a book.
    #[must_use]
    pub const fn as_book(&self) -> Option<&BookSummary> {
        match self {
            Self::Book(book) => Some(book),
            Self::Time(_) => None,
        }
    }

}

impl From<TimeBucket> for Item {
    fn from(bucket: TimeBucket) -> Self {
        Self::Time(bucket)
    }
}

impl From<BookSummary> for Item {
    fn from(book: BookSummary) -> Self {
        Self::Book(book)
    }
}
