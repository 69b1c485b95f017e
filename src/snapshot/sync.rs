//! Snapshot synchronizer: owns the displayed snapshot and its transitions.
//!
//! A refresh builds a new snapshot, diffs it against the displayed one and
//! starts an animated transition. The transition is advanced by timer ticks
//! carrying its generation. A refresh that arrives while a transition is
//! still running replaces it outright: the superseded target is never
//! committed, ticks for its generation are ignored, and the new diff is taken
//! against what was actually on screen.

use super::diff::{diff, SnapshotDiff};
use super::model::Snapshot;
use crate::domain::{BookSummary, RefreshFailure, TimeBucket};

/// An in-flight change from the displayed snapshot to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub generation: u64,
    pub target: Snapshot,
    pub diff: SnapshotDiff,
    pub frames_left: u32,
}

/// What a successful refresh did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Generation of the started transition, `None` if applied immediately.
    pub generation: Option<u64>,
    /// Generation of the transition that was replaced, if any.
    pub superseded: Option<u64>,
    /// Number of inserted, removed and moved rows.
    pub changes: usize,
}

/// Result of a timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belongs to no running transition.
    Stale,
    /// The transition advanced and still has frames left.
    Advanced { frames_left: u32 },
    /// The transition finished and its target is now displayed.
    Committed,
}

/// Owner of the displayed snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotSynchronizer {
    displayed: Snapshot,
    transition: Option<Transition>,
    next_generation: u64,
    frames: u32,
}

impl SnapshotSynchronizer {
    /// Creates a synchronizer showing the empty snapshot.
    ///
    /// `frames` is the number of ticks a transition lasts; zero applies every
    /// refresh immediately.
    #[must_use]
    pub const fn new(frames: u32) -> Self {
        Self {
            displayed: Snapshot::empty(),
            transition: None,
            next_generation: 1,
            frames,
        }
    }

    /// The snapshot that was last fully applied.
    #[must_use]
    pub const fn displayed(&self) -> &Snapshot {
        &self.displayed
    }

    /// The running transition, if any.
    #[must_use]
    pub const fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// The snapshot the screen is showing or moving towards.
    ///
    /// Rendering and selection use this so the screen never shows a row that
    /// is about to disappear.
    #[must_use]
    pub fn visible(&self) -> &Snapshot {
        self.transition
            .as_ref()
            .map_or(&self.displayed, |transition| &transition.target)
    }

    /// Whether at least one complete snapshot has been produced.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.visible().has_sections()
    }

    /// Rebuilds the snapshot from the three sources.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshFailure`] when a book list is absent; the displayed
    /// snapshot and any running transition are left untouched.
    pub fn refresh(
        &mut self,
        time: &[TimeBucket],
        top: Option<&[BookSummary]>,
        recent: Option<&[BookSummary]>,
    ) -> Result<RefreshOutcome, RefreshFailure> {
        let _span = tracing::debug_span!("snapshot_refresh").entered();

        let target = Snapshot::build(time, top, recent).map_err(|failure| {
            tracing::debug!(reason = %failure, "refresh aborted, keeping current snapshot");
            failure
        })?;

        let superseded = self.transition.take().map(|old| {
            tracing::debug!(generation = old.generation, "superseding running transition");
            old.generation
        });

        let changes = diff(&self.displayed, &target);
        let change_count = changes.inserted.len() + changes.removed.len() + changes.moved.len();

        if changes.is_empty() || self.frames == 0 {
            self.displayed = target;
            return Ok(RefreshOutcome {
                generation: None,
                superseded,
                changes: change_count,
            });
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        self.transition = Some(Transition {
            generation,
            target,
            diff: changes,
            frames_left: self.frames,
        });

        tracing::debug!(generation = generation, changes = change_count, "transition started");
        Ok(RefreshOutcome {
            generation: Some(generation),
            superseded,
            changes: change_count,
        })
    }

    /// Advances the transition of the given generation by one frame.
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        let Some(transition) = self.transition.as_mut() else {
            return TickOutcome::Stale;
        };
        if transition.generation != generation {
            tracing::trace!(
                tick_generation = generation,
                running_generation = transition.generation,
                "ignoring stale tick"
            );
            return TickOutcome::Stale;
        }

        transition.frames_left = transition.frames_left.saturating_sub(1);
        if transition.frames_left == 0 {
            self.finish();
            TickOutcome::Committed
        } else {
            TickOutcome::Advanced {
                frames_left: transition.frames_left,
            }
        }
    }

    /// Commits the running transition immediately, if any.
    pub fn finish(&mut self) {
        if let Some(transition) = self.transition.take() {
            tracing::debug!(generation = transition.generation, "transition committed");
            self.displayed = transition.target;
        }
    }
}

impl Default for SnapshotSynchronizer {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Section;

    fn books(keys: &[&str]) -> Vec<BookSummary> {
        keys.iter().map(|k| BookSummary::new(*k, *k)).collect()
    }

    #[test]
    fn failed_refresh_keeps_displayed_snapshot() {
        let mut sync = SnapshotSynchronizer::new(0);
        sync.refresh(&TimeBucket::defaults(), Some(&books(&["a"])), Some(&[]))
            .unwrap();
        let before = sync.displayed().clone();

        let result = sync.refresh(&TimeBucket::defaults(), None, Some(&books(&["b"])));

        assert_eq!(result, Err(RefreshFailure::TopBooksUnavailable));
        assert_eq!(sync.displayed(), &before);
    }

    #[test]
    fn failed_refresh_leaves_running_transition_alone() {
        let mut sync = SnapshotSynchronizer::new(2);
        let started = sync
            .refresh(&TimeBucket::defaults(), Some(&[]), Some(&[]))
            .unwrap();
        assert!(sync.refresh(&TimeBucket::defaults(), Some(&[]), None).is_err());
        assert_eq!(sync.transition().map(|t| t.generation), started.generation);
    }

    #[test]
    fn transition_commits_after_configured_frames() {
        let mut sync = SnapshotSynchronizer::new(2);
        let outcome = sync
            .refresh(&TimeBucket::defaults(), Some(&books(&["a"])), Some(&[]))
            .unwrap();
        let generation = outcome.generation.unwrap();

        assert!(!sync.displayed().has_sections());
        assert_eq!(sync.visible().items(Section::TopBooks).len(), 1);
        assert_eq!(sync.tick(generation), TickOutcome::Advanced { frames_left: 1 });
        assert_eq!(sync.tick(generation), TickOutcome::Committed);
        assert!(sync.transition().is_none());
        assert_eq!(sync.displayed().items(Section::TopBooks).len(), 1);
    }

    #[test]
    fn unchanged_refresh_applies_without_transition() {
        let mut sync = SnapshotSynchronizer::new(0);
        sync.refresh(&TimeBucket::defaults(), Some(&books(&["a"])), Some(&[]))
            .unwrap();
        sync.frames = 3;
        let outcome = sync
            .refresh(&TimeBucket::defaults(), Some(&books(&["a"])), Some(&[]))
            .unwrap();
        assert_eq!(outcome.generation, None);
        assert_eq!(outcome.changes, 0);
    }

    #[test]
    fn second_refresh_during_transition_wins() {
        let mut sync = SnapshotSynchronizer::new(3);
        let first = sync
            .refresh(&TimeBucket::defaults(), Some(&books(&["first"])), Some(&[]))
            .unwrap();
        let first_generation = first.generation.unwrap();
        sync.tick(first_generation);

        let second = sync
            .refresh(&TimeBucket::defaults(), Some(&books(&["second"])), Some(&[]))
            .unwrap();
        assert_eq!(second.superseded, Some(first_generation));
        let second_generation = second.generation.unwrap();

        // The superseded transition's remaining ticks change nothing.
        for _ in 0..3 {
            assert_eq!(sync.tick(first_generation), TickOutcome::Stale);
        }
        assert!(!sync.displayed().has_sections());

        // The new diff is taken against what was on screen, not the first target.
        let transition = sync.transition().unwrap();
        assert!(transition.diff.removed.is_empty());
        assert!(transition
            .diff
            .is_inserted(Section::TopBooks, &crate::domain::ItemId::Book("second".into())));

        while sync.tick(second_generation) != TickOutcome::Committed {}
        let shown = sync.displayed().ids(Section::TopBooks);
        assert_eq!(shown, vec![crate::domain::ItemId::Book("second".into())]);
    }

    #[test]
    fn finish_commits_immediately() {
        let mut sync = SnapshotSynchronizer::default();
        sync.refresh(&TimeBucket::defaults(), Some(&[]), Some(&[]))
            .unwrap();
        sync.finish();
        assert!(sync.transition().is_none());
        assert!(sync.displayed().has_sections());
        assert_eq!(sync.tick(1), TickOutcome::Stale);
    }
}
