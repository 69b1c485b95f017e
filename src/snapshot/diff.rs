//! Identity-based diff between two snapshots.
//!
//! Rows are matched per section by [`ItemId`]; payload changes (a corrected
//! title, a new cover) are not reported. A book that changes section counts
//! as removed from the old section and inserted into the new one.
//!
//! Moves are kept minimal: among the rows present in both versions of a
//! section, the longest run that is already in increasing old-index order
//! stays put and every other common row is reported as moved. When several
//! runs of the same length exist, the one made of the lowest old positions
//! wins, so rows that were nearest the start of the section stay put.

use super::model::Snapshot;
use crate::domain::{ItemId, Section};
use std::collections::HashMap;

/// A row position in one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowChange {
    pub section: Section,
    pub index: usize,
    pub id: ItemId,
}

/// A row present in both snapshots whose relative order changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMove {
    pub section: Section,
    pub id: ItemId,
    pub from: usize,
    pub to: usize,
}

/// Changes needed to go from one snapshot to another.
///
/// Removed positions refer to the old snapshot; inserted and moved target
/// positions refer to the new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub inserted: Vec<RowChange>,
    pub removed: Vec<RowChange>,
    pub moved: Vec<RowMove>,
}

impl SnapshotDiff {
    /// Whether the two snapshots show the same rows in the same order.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }

    /// Whether a row of the new snapshot was inserted by this diff.
    #[must_use]
    pub fn is_inserted(&self, section: Section, id: &ItemId) -> bool {
        self.inserted
            .iter()
            .any(|change| change.section == section && &change.id == id)
    }

    /// Whether a row of the new snapshot was moved by this diff.
    #[must_use]
    pub fn is_moved(&self, section: Section, id: &ItemId) -> bool {
        self.moved
            .iter()
            .any(|change| change.section == section && &change.id == id)
    }
}

/// Computes the identity diff from `old` to `new`.
///
/// ```
/// use shelfview::domain::{Section, TimeBucket};
/// use shelfview::snapshot::{diff, Snapshot};
///
/// let new = Snapshot::build(&TimeBucket::defaults(), Some(&[]), Some(&[])).unwrap();
/// let changes = diff(&Snapshot::empty(), &new);
/// assert_eq!(changes.inserted.len(), 3);
/// assert!(changes.inserted.iter().all(|c| c.section == Section::Time));
/// ```
#[must_use]
pub fn diff(old: &Snapshot, new: &Snapshot) -> SnapshotDiff {
    let _span = tracing::debug_span!("snapshot_diff", old_rows = old.len(), new_rows = new.len())
        .entered();

    let mut result = SnapshotDiff::default();
    for section in Section::ALL {
        diff_section(section, &old.ids(section), &new.ids(section), &mut result);
    }

    tracing::debug!(
        inserted = result.inserted.len(),
        removed = result.removed.len(),
        moved = result.moved.len(),
        "snapshot diff computed"
    );
    result
}

fn diff_section(section: Section, old: &[ItemId], new: &[ItemId], out: &mut SnapshotDiff) {
    let old_positions: HashMap<&ItemId, usize> =
        old.iter().enumerate().map(|(i, id)| (id, i)).collect();
    let new_positions: HashMap<&ItemId, usize> =
        new.iter().enumerate().map(|(i, id)| (id, i)).collect();

    out.removed.extend(
        old.iter()
            .enumerate()
            .filter(|(_, id)| !new_positions.contains_key(id))
            .map(|(index, id)| RowChange {
                section,
                index,
                id: id.clone(),
            }),
    );

    // (new index, old index) of rows present in both, in new order.
    let mut common = Vec::new();
    for (index, id) in new.iter().enumerate() {
        match old_positions.get(id) {
            Some(&from) => common.push((index, from)),
            None => out.inserted.push(RowChange {
                section,
                index,
                id: id.clone(),
            }),
        }
    }

    let old_order: Vec<usize> = common.iter().map(|&(_, from)| from).collect();
    let stable = longest_increasing_run(&old_order);

    for (position, &(to, from)) in common.iter().enumerate() {
        if !stable[position] {
            out.moved.push(RowMove {
                section,
                id: new[to].clone(),
                from,
                to,
            });
        }
    }
}

/// Marks the members of one longest strictly increasing subsequence.
///
/// Patience sorting: `tails[k]` is the position of the smallest value that
/// ends an increasing run of length `k + 1`. Replacing a tail whenever a
/// smaller value arrives makes the chosen run the one with the lowest values.
fn longest_increasing_run(values: &[usize]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut parent: Vec<Option<usize>> = vec![None; values.len()];

    for (i, &value) in values.iter().enumerate() {
        let slot = tails.partition_point(|&t| values[t] < value);
        parent[i] = slot.checked_sub(1).map(|prev| tails[prev]);
        if slot == tails.len() {
            tails.push(i);
        } else {
            tails[slot] = i;
        }
    }

    let mut members = vec![false; values.len()];
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        members[i] = true;
        cursor = parent[i];
    }
    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookSummary, TimeBucket};

    fn snapshot(top: &[&str], recent: &[&str]) -> Snapshot {
        let to_books = |keys: &[&str]| -> Vec<BookSummary> {
            keys.iter().map(|k| BookSummary::new(*k, *k)).collect()
        };
        Snapshot::build(&TimeBucket::defaults(), Some(&to_books(top)), Some(&to_books(recent)))
            .unwrap()
    }

    fn book(key: &str) -> ItemId {
        ItemId::Book(key.to_string())
    }

    #[test]
    fn identical_snapshots_produce_no_changes() {
        let a = snapshot(&["a", "b"], &["c"]);
        assert!(diff(&a, &a.clone()).is_empty());
    }

    #[test]
    fn first_refresh_with_empty_book_lists_inserts_only_time_rows() {
        let changes = diff(&Snapshot::empty(), &snapshot(&[], &[]));
        assert_eq!(changes.inserted.len(), 3);
        assert!(changes.inserted.iter().all(|c| c.section == Section::Time));
        assert!(changes.removed.is_empty());
        assert!(changes.moved.is_empty());
    }

    #[test]
    fn payload_changes_are_not_reported() {
        let old = snapshot(&["a"], &[]);
        let renamed = vec![BookSummary::new("a", "A, revised")];
        let new = Snapshot::build(&TimeBucket::defaults(), Some(&renamed), Some(&[])).unwrap();
        assert!(diff(&old, &new).is_empty());
    }

    #[test]
    fn insert_and_remove_positions_refer_to_their_snapshot() {
        let changes = diff(&snapshot(&[], &["a", "b", "c"]), &snapshot(&[], &["x", "a", "c"]));
        assert_eq!(
            changes.removed,
            vec![RowChange { section: Section::RecentBooks, index: 1, id: book("b") }]
        );
        assert_eq!(
            changes.inserted,
            vec![RowChange { section: Section::RecentBooks, index: 0, id: book("x") }]
        );
        assert!(changes.moved.is_empty());
    }

    #[test]
    fn moving_one_row_to_the_front_reports_a_single_move() {
        let changes = diff(&snapshot(&["a", "b", "c", "d"], &[]), &snapshot(&["d", "a", "b", "c"], &[]));
        assert_eq!(
            changes.moved,
            vec![RowMove { section: Section::TopBooks, id: book("d"), from: 3, to: 0 }]
        );
    }

    #[test]
    fn swap_tie_break_keeps_the_formerly_first_row_stable() {
        let changes = diff(&snapshot(&["a", "b"], &[]), &snapshot(&["b", "a"], &[]));
        assert_eq!(
            changes.moved,
            vec![RowMove { section: Section::TopBooks, id: book("b"), from: 1, to: 0 }]
        );
        assert!(!changes.is_moved(Section::TopBooks, &book("a")));
    }

    #[test]
    fn changing_section_is_remove_plus_insert() {
        let changes = diff(&snapshot(&["a"], &[]), &snapshot(&[], &["a"]));
        assert_eq!(changes.removed[0].section, Section::TopBooks);
        assert_eq!(changes.inserted[0].section, Section::RecentBooks);
        assert!(changes.is_inserted(Section::RecentBooks, &book("a")));
    }

    #[test]
    fn increasing_run_handles_edge_inputs() {
        assert!(longest_increasing_run(&[]).is_empty());
        assert_eq!(longest_increasing_run(&[2, 0, 1]), vec![false, true, true]);
        assert_eq!(longest_increasing_run(&[0, 1, 2]), vec![true, true, true]);
    }
}
