//! The ordered, sectioned list of rows shown on the home screen.

use crate::domain::{BookSummary, Item, ItemId, RefreshFailure, Section, TimeBucket};
use std::collections::HashSet;

/// Rows of one section, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSection {
    pub section: Section,
    pub items: Vec<Item>,
}

/// Sectioned list of rows.
///
/// A built snapshot always holds the three sections in [`Section::ALL`]
/// order. Only [`Snapshot::empty`] holds none, which is what the screen shows
/// before the first successful refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    sections: Vec<SnapshotSection>,
}

impl Snapshot {
    /// Snapshot with no sections at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Builds a complete snapshot from the three sources.
    ///
    /// Fails without building anything if either book list is absent. A
    /// present but empty list is valid and yields an empty section. A book
    /// listed twice in the same section keeps its first position.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshFailure`] naming the first missing list.
    ///
    /// ```
    /// use shelfview::domain::{BookSummary, RefreshFailure, TimeBucket};
    /// use shelfview::snapshot::Snapshot;
    ///
    /// let time = TimeBucket::defaults();
    /// let top = vec![BookSummary::new("OL1W", "Dune")];
    ///
    /// assert_eq!(
    ///     Snapshot::build(&time, Some(&top), None),
    ///     Err(RefreshFailure::RecentBooksUnavailable)
    /// );
    /// let snapshot = Snapshot::build(&time, Some(&top), Some(&[])).unwrap();
    /// assert_eq!(snapshot.len(), 4);
    /// ```
    pub fn build(
        time: &[TimeBucket],
        top: Option<&[BookSummary]>,
        recent: Option<&[BookSummary]>,
    ) -> Result<Self, RefreshFailure> {
        let top = top.ok_or(RefreshFailure::TopBooksUnavailable)?;
        let recent = recent.ok_or(RefreshFailure::RecentBooksUnavailable)?;

        let sections = vec![
            SnapshotSection {
                section: Section::Time,
                items: time.iter().cloned().map(Item::from).collect(),
            },
            SnapshotSection {
                section: Section::TopBooks,
                items: Self::book_items(Section::TopBooks, top),
            },
            SnapshotSection {
                section: Section::RecentBooks,
                items: Self::book_items(Section::RecentBooks, recent),
            },
        ];

        Ok(Self { sections })
    }

    fn book_items(section: Section, books: &[BookSummary]) -> Vec<Item> {
        let mut seen = HashSet::new();
        books
            .iter()
            .filter(|book| {
                let fresh = seen.insert(book.key.as_str());
                if !fresh {
                    tracing::debug!(section = ?section, key = %book.key, "dropping duplicate book");
                }
                fresh
            })
            .cloned()
            .map(Item::from)
            .collect()
    }

    /// Sections in display order.
    #[must_use]
    pub fn sections(&self) -> &[SnapshotSection] {
        &self.sections
    }

    /// Rows of a section; empty if the section is absent.
    #[must_use]
    pub fn items(&self, section: Section) -> &[Item] {
        self.sections
            .get(section.position())
            .filter(|s| s.section == section)
            .map(|s| s.items.as_slice())
            .unwrap_or(&[])
    }

    /// Row at a position.
    #[must_use]
    pub fn item(&self, section: Section, index: usize) -> Option<&Item> {
        self.items(section).get(index)
    }

    /// Position of a row by identity.
    #[must_use]
    pub fn position_of(&self, section: Section, id: &ItemId) -> Option<usize> {
        self.items(section).iter().position(|item| &item.id() == id)
    }

    /// Identities of a section's rows, in order.
    #[must_use]
    pub fn ids(&self, section: Section) -> Vec<ItemId> {
        self.items(section).iter().map(Item::id).collect()
    }

    /// Whether the snapshot holds any sections.
    #[must_use]
    pub fn has_sections(&self) -> bool {
        !self.sections.is_empty()
    }

    /// Total number of rows across all sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn books(keys: &[&str]) -> Vec<BookSummary> {
        keys.iter().map(|k| BookSummary::new(*k, k.to_uppercase())).collect()
    }

    #[test]
    fn sections_are_built_in_fixed_order() {
        let snapshot =
            Snapshot::build(&TimeBucket::defaults(), Some(&books(&["a"])), Some(&books(&["b"])))
                .unwrap();
        let order: Vec<Section> = snapshot.sections().iter().map(|s| s.section).collect();
        assert_eq!(order, Section::ALL.to_vec());
    }

    #[test]
    fn missing_top_books_is_reported_first() {
        assert_eq!(
            Snapshot::build(&TimeBucket::defaults(), None, None),
            Err(RefreshFailure::TopBooksUnavailable)
        );
    }

    #[test]
    fn duplicate_keys_keep_first_position() {
        let snapshot = Snapshot::build(&[], Some(&books(&["a", "b", "a"])), Some(&[])).unwrap();
        assert_eq!(
            snapshot.ids(Section::TopBooks),
            vec![ItemId::Book("a".into()), ItemId::Book("b".into())]
        );
    }

    #[test]
    fn same_book_may_appear_in_both_book_sections() {
        let shared = books(&["a"]);
        let snapshot = Snapshot::build(&[], Some(&shared), Some(&shared)).unwrap();
        assert_eq!(snapshot.position_of(Section::TopBooks, &ItemId::Book("a".into())), Some(0));
        assert_eq!(snapshot.position_of(Section::RecentBooks, &ItemId::Book("a".into())), Some(0));
    }
}
