//! Per-section expand/collapse state.
//!
//! Each toggleable section is independently compact or expanded. A toggle
//! flips exactly one section and, in the same call, produces the new control
//! label and the rebuilt screen layout so the caller can never show a label
//! that disagrees with the layout.

use super::builder::{screen_layout, ScreenLayout};
use crate::domain::Section;
use std::fmt;

/// Label of a section's toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleLabel {
    /// Shown while the section is compact.
    SeeMore,
    /// Shown while the section is expanded.
    Hide,
}

impl ToggleLabel {
    /// Label for a given expansion flag.
    #[must_use]
    pub const fn for_expanded(expanded: bool) -> Self {
        if expanded {
            Self::Hide
        } else {
            Self::SeeMore
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SeeMore => "See More",
            Self::Hide => "Hide",
        }
    }
}

impl fmt::Display for ToggleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of flipping one section.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    pub section: Section,
    pub expanded: bool,
    pub label: ToggleLabel,
    /// Full screen layout after the flip.
    pub layout: ScreenLayout,
}

/// Expansion flags of the toggleable sections.
///
/// Both sections start compact. The state lives as long as the screen and is
/// only changed through [`SectionLayoutState::toggle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionLayoutState {
    top_books_expanded: bool,
    recent_books_expanded: bool,
}

impl SectionLayoutState {
    /// Whether a section is currently expanded. Always `false` for `Time`.
    #[must_use]
    pub const fn is_expanded(&self, section: Section) -> bool {
        match section {
            Section::Time => false,
            Section::TopBooks => self.top_books_expanded,
            Section::RecentBooks => self.recent_books_expanded,
        }
    }

    /// Current toggle label of a section.
    #[must_use]
    pub const fn label(&self, section: Section) -> ToggleLabel {
        ToggleLabel::for_expanded(self.is_expanded(section))
    }

    /// Flips a section between compact and expanded.
    ///
    /// Returns `None` without changing anything for sections that cannot be
    /// toggled.
    ///
    /// ```
    /// use shelfview::domain::Section;
    /// use shelfview::layout::{SectionLayoutState, ToggleLabel};
    ///
    /// let mut state = SectionLayoutState::default();
    /// let outcome = state.toggle(Section::RecentBooks).unwrap();
    /// assert!(outcome.expanded);
    /// assert_eq!(outcome.label, ToggleLabel::Hide);
    /// assert!(state.toggle(Section::Time).is_none());
    /// ```
    pub fn toggle(&mut self, section: Section) -> Option<ToggleOutcome> {
        let flag = match section {
            Section::Time => return None,
            Section::TopBooks => &mut self.top_books_expanded,
            Section::RecentBooks => &mut self.recent_books_expanded,
        };
        *flag = !*flag;
        let expanded = *flag;

        tracing::debug!(section = ?section, expanded = expanded, "section toggled");

        Some(ToggleOutcome {
            section,
            expanded,
            label: ToggleLabel::for_expanded(expanded),
            layout: screen_layout(self),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_start_compact() {
        let state = SectionLayoutState::default();
        for section in Section::ALL {
            assert!(!state.is_expanded(section));
            assert_eq!(state.label(section), ToggleLabel::SeeMore);
        }
    }

    #[test]
    fn toggling_twice_restores_layout_and_label() {
        for section in [Section::TopBooks, Section::RecentBooks] {
            let mut state = SectionLayoutState::default();
            let original_layout = screen_layout(&state);
            let original_label = state.label(section);

            let first = state.toggle(section).unwrap();
            assert_ne!(first.layout, original_layout);
            assert_eq!(first.label, ToggleLabel::Hide);

            let second = state.toggle(section).unwrap();
            assert_eq!(second.layout, original_layout);
            assert_eq!(second.label, original_label);
        }
    }

    #[test]
    fn sections_toggle_independently() {
        let mut state = SectionLayoutState::default();
        state.toggle(Section::TopBooks);
        assert!(state.is_expanded(Section::TopBooks));
        assert!(!state.is_expanded(Section::RecentBooks));
    }

    #[test]
    fn time_toggle_changes_nothing() {
        let mut state = SectionLayoutState::default();
        assert!(state.toggle(Section::Time).is_none());
        assert_eq!(state, SectionLayoutState::default());
    }
}
