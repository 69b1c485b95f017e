//! Declarative layout descriptions for the home screen sections.
//!
//! The builder is a pure function of a [`Section`] and the current
//! [`SectionLayoutState`]. It never looks at the data, so the presentation
//! policy can be tested without a snapshot:
//!
//! | Section     | compact                               | expanded                              |
//! |-------------|---------------------------------------|---------------------------------------|
//! | Time        | fixed-height rail, header, no toggle  | same (not toggleable)                 |
//! | TopBooks    | rail of fixed-size cards, no header   | two-column grid, no header            |
//! | RecentBooks | rail of cards, header with toggle     | two-column grid, header with toggle   |
//!
//! Sizes are expressed in layout points. The renderer scales them to
//! terminal cells.

use super::toggle::{SectionLayoutState, ToggleLabel};
use crate::domain::Section;

/// Width and height of a book card.
const CARD_WIDTH: f32 = 175.0;
const CARD_HEIGHT: f32 = 230.0;

/// Estimated height of a compact book group.
const CARD_GROUP_ESTIMATED_HEIGHT: f32 = 220.0;

/// Estimated height of one row of the two-column grid.
const GRID_ROW_ESTIMATED_HEIGHT: f32 = 200.0;

/// Fraction of the screen width taken by one book group.
const CARD_GROUP_FRACTION: f32 = 0.5;

/// Fraction of the screen width taken by one time tile.
const TIME_GROUP_FRACTION: f32 = 0.33;

/// Fixed height of the time rail.
const TIME_GROUP_HEIGHT: f32 = 50.0;

/// Estimated height of a section header.
const HEADER_ESTIMATED_HEIGHT: f32 = 44.0;

/// A single layout dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    /// Fixed size in layout points.
    Absolute(f32),
    /// Fraction of the containing width.
    FractionalWidth(f32),
    /// Fraction of the containing height.
    FractionalHeight(f32),
    /// Starting estimate, resolved from the content.
    Estimated(f32),
}

/// Width and height pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

impl Size {
    const fn new(width: Dimension, height: Dimension) -> Self {
        Self { width, height }
    }
}

/// Content insets around an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insets {
    pub top: f32,
    pub leading: f32,
    pub bottom: f32,
    pub trailing: f32,
}

impl Insets {
    const fn new(top: f32, leading: f32, bottom: f32, trailing: f32) -> Self {
        Self {
            top,
            leading,
            bottom,
            trailing,
        }
    }
}

/// How items of a section are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// One horizontal row that scrolls sideways.
    HorizontalRail,
    /// One item per row, stacked vertically.
    VerticalStack,
    /// Two columns per row, stacked vertically.
    TwoColumnGrid,
}

impl Grouping {
    /// Number of items drawn side by side in one row of a vertical layout.
    #[must_use]
    pub const fn columns(self) -> usize {
        match self {
            Self::TwoColumnGrid => 2,
            Self::HorizontalRail | Self::VerticalStack => 1,
        }
    }
}

/// Scroll behaviour along the section's own axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Free horizontal scrolling.
    Continuous,
    /// Horizontal scrolling that snaps to whole groups.
    Paged,
    /// No own scrolling: the section scrolls with the screen.
    None,
}

/// Header drawn above a section.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderDescriptor {
    pub title: String,
    pub size: Size,
    /// Label of the attached toggle control, if the header carries one.
    pub toggle: Option<ToggleLabel>,
}

/// Complete layout description of one section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionLayout {
    pub section: Section,
    pub item: Size,
    pub insets: Insets,
    pub group: Size,
    pub grouping: Grouping,
    pub scroll: ScrollBehavior,
    pub header: Option<HeaderDescriptor>,
}

/// Layout of the whole screen, one entry per section in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenLayout {
    pub sections: Vec<SectionLayout>,
}

impl ScreenLayout {
    /// Layout of a given section.
    #[must_use]
    pub fn section(&self, section: Section) -> Option<&SectionLayout> {
        self.sections.iter().find(|layout| layout.section == section)
    }
}

/// Builds the layout of every section for the given toggle state.
///
/// The layout engine works on the whole screen, so this is called again
/// whenever any section changes its expansion.
#[must_use]
pub fn screen_layout(state: &SectionLayoutState) -> ScreenLayout {
    let _span = tracing::trace_span!("screen_layout", state = ?state).entered();
    ScreenLayout {
        sections: Section::ALL
            .iter()
            .map(|&section| section_layout(section, state))
            .collect(),
    }
}

/// Builds the layout description of one section.
#[must_use]
pub fn section_layout(section: Section, state: &SectionLayoutState) -> SectionLayout {
    match section {
        Section::Time => time_layout(),
        Section::TopBooks | Section::RecentBooks => {
            if state.is_expanded(section) {
                book_grid_layout(section, state)
            } else {
                book_rail_layout(section, state)
            }
        }
    }
}

fn time_layout() -> SectionLayout {
    SectionLayout {
        section: Section::Time,
        item: Size::new(Dimension::FractionalWidth(1.0), Dimension::FractionalHeight(1.0)),
        insets: Insets::new(10.0, 10.0, 10.0, 10.0),
        group: Size::new(
            Dimension::FractionalWidth(TIME_GROUP_FRACTION),
            Dimension::Absolute(TIME_GROUP_HEIGHT),
        ),
        grouping: Grouping::HorizontalRail,
        scroll: ScrollBehavior::Continuous,
        header: Some(HeaderDescriptor {
            title: Section::Time.title().to_string(),
            size: header_size(),
            toggle: None,
        }),
    }
}

fn book_rail_layout(section: Section, state: &SectionLayoutState) -> SectionLayout {
    SectionLayout {
        section,
        item: card_size(),
        insets: card_insets(),
        group: Size::new(
            Dimension::FractionalWidth(CARD_GROUP_FRACTION),
            Dimension::Estimated(CARD_GROUP_ESTIMATED_HEIGHT),
        ),
        grouping: Grouping::HorizontalRail,
        scroll: ScrollBehavior::Continuous,
        header: book_header(section, state),
    }
}

fn book_grid_layout(section: Section, state: &SectionLayoutState) -> SectionLayout {
    SectionLayout {
        section,
        item: card_size(),
        insets: card_insets(),
        group: Size::new(
            Dimension::FractionalWidth(1.0),
            Dimension::Estimated(GRID_ROW_ESTIMATED_HEIGHT),
        ),
        grouping: Grouping::TwoColumnGrid,
        scroll: ScrollBehavior::None,
        header: book_header(section, state),
    }
}

/// Only the recent-books section carries a header; its toggle label follows
/// the current expansion.
fn book_header(section: Section, state: &SectionLayoutState) -> Option<HeaderDescriptor> {
    match section {
        Section::RecentBooks => Some(HeaderDescriptor {
            title: section.title().to_string(),
            size: header_size(),
            toggle: Some(state.label(section)),
        }),
        Section::Time | Section::TopBooks => None,
    }
}

const fn card_size() -> Size {
    Size::new(Dimension::Absolute(CARD_WIDTH), Dimension::Absolute(CARD_HEIGHT))
}

const fn card_insets() -> Insets {
    Insets::new(10.0, 5.0, 10.0, 5.0)
}

const fn header_size() -> Size {
    Size::new(
        Dimension::FractionalWidth(1.0),
        Dimension::Estimated(HEADER_ESTIMATED_HEIGHT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_state_puts_every_section_on_a_rail() {
        let layout = screen_layout(&SectionLayoutState::default());
        for section in &layout.sections {
            assert_eq!(section.grouping, Grouping::HorizontalRail);
            assert_eq!(section.scroll, ScrollBehavior::Continuous);
        }
        assert_eq!(
            layout.sections.iter().map(|s| s.section).collect::<Vec<_>>(),
            Section::ALL.to_vec()
        );
    }

    #[test]
    fn headers_follow_the_policy_table() {
        let mut state = SectionLayoutState::default();
        for _ in 0..2 {
            let time = section_layout(Section::Time, &state);
            let header = time.header.expect("time header");
            assert!(header.toggle.is_none());

            assert!(section_layout(Section::TopBooks, &state).header.is_none());

            let recent = section_layout(Section::RecentBooks, &state);
            assert!(recent.header.and_then(|h| h.toggle).is_some());

            state.toggle(Section::TopBooks);
            state.toggle(Section::RecentBooks);
        }
    }

    #[test]
    fn expanded_book_section_becomes_a_grid_with_the_same_cards() {
        let mut state = SectionLayoutState::default();
        let compact = section_layout(Section::TopBooks, &state);
        state.toggle(Section::TopBooks);
        let expanded = section_layout(Section::TopBooks, &state);

        assert_eq!(expanded.grouping, Grouping::TwoColumnGrid);
        assert_eq!(expanded.scroll, ScrollBehavior::None);
        assert_eq!(expanded.item, compact.item);
        assert_eq!(expanded.insets, compact.insets);
    }

    #[test]
    fn time_section_is_invariant_under_toggles() {
        let mut state = SectionLayoutState::default();
        let baseline = section_layout(Section::Time, &state);

        for section in [Section::TopBooks, Section::RecentBooks, Section::TopBooks] {
            state.toggle(section);
            assert_eq!(screen_layout(&state).section(Section::Time), Some(&baseline));
        }
    }
}
