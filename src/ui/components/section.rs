//! Section renderer: header, rail, grid or empty message.

use super::card::{card_lines, time_tile_lines, TIME_TILE_ROWS};
use crate::app::state::CARD_ROWS;
use crate::domain::Section;
use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{CardView, Presentation, SectionHeaderView, SectionView};

fn tile_rows(section: Section) -> usize {
    match section {
        Section::Time => TIME_TILE_ROWS,
        Section::TopBooks | Section::RecentBooks => CARD_ROWS,
    }
}

/// Terminal rows a section takes, including the blank line after it.
#[must_use]
pub fn section_height(view: &SectionView) -> usize {
    let header = usize::from(view.header.is_some());
    let body = match &view.presentation {
        Presentation::Rail { .. } => tile_rows(view.section),
        Presentation::Grid {
            rows,
            more_above,
            more_below,
            ..
        } => rows.len() * CARD_ROWS + usize::from(*more_above) + usize::from(*more_below),
        Presentation::Empty { .. } => 1,
    };
    header + body + 1
}

/// Renders one section starting at `row`. Returns the next free row.
pub fn render_section(row: usize, view: &SectionView, theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;

    if let Some(header) = &view.header {
        current_row = render_section_header(current_row, header, view.is_focused, theme, cols);
    }

    current_row = match &view.presentation {
        Presentation::Rail {
            cards,
            card_width,
            more_before,
            more_after,
        } => render_rail(current_row, view.section, cards, *card_width, (*more_before, *more_after), theme),
        Presentation::Grid {
            rows,
            card_width,
            more_above,
            more_below,
        } => {
            let mut r = current_row;
            if *more_above {
                r = render_more_line(r, "▲", theme, cols);
            }
            for cards in rows {
                r = render_rail(r, view.section, cards, *card_width, (false, false), theme);
            }
            if *more_below {
                r = render_more_line(r, "▼", theme, cols);
            }
            r
        }
        Presentation::Empty { message } => {
            position_cursor(current_row, 1);
            print!("{}{}", Theme::dim(), Theme::fg(&theme.colors.empty_state_fg));
            print!("  {}", fit(message, cols.saturating_sub(2)));
            print!("{}", Theme::reset());
            current_row + 1
        }
    };

    current_row + 1
}

fn render_section_header(
    row: usize,
    header: &SectionHeaderView,
    is_focused: bool,
    theme: &Theme,
    cols: usize,
) -> usize {
    let marker = if is_focused { "› " } else { "  " };
    let toggle = header
        .toggle
        .as_ref()
        .map(|label| format!("[{label}]"))
        .unwrap_or_default();
    let toggle_len = toggle.chars().count();
    let title_width = cols.saturating_sub(toggle_len + 1);

    position_cursor(row, 1);
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.accent));
    print!("{}", fit(&format!("{marker}{}", header.title), title_width));
    print!("{}", Theme::reset());

    if !toggle.is_empty() {
        if header.is_animating {
            print!("{}", Theme::dim());
        }
        print!("{}{toggle} {}", Theme::fg(&theme.colors.toggle_fg), Theme::reset());
    }

    row + 1
}

/// Draws cards side by side with optional scroll indicators on both ends.
fn render_rail(
    row: usize,
    section: Section,
    cards: &[CardView],
    card_width: usize,
    (more_before, more_after): (bool, bool),
    theme: &Theme,
) -> usize {
    let height = tile_rows(section);
    let blocks: Vec<Vec<String>> = cards
        .iter()
        .map(|card| match section {
            Section::Time => time_tile_lines(card, card_width, theme),
            Section::TopBooks | Section::RecentBooks => card_lines(card, card_width, theme),
        })
        .collect();

    let indicator_row = height / 2;
    for line in 0..height {
        position_cursor(row + line, 1);
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("{}", if more_before && line == indicator_row { "‹" } else { " " });
        print!("{}", Theme::reset());

        for block in &blocks {
            print!("{} ", block.get(line).map_or("", String::as_str));
        }

        if more_after && line == indicator_row {
            print!("{}›{}", Theme::fg(&theme.colors.text_dim), Theme::reset());
        }
    }

    row + height
}

fn render_more_line(row: usize, arrow: &str, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", fit(&format!(" {arrow} more"), cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Index of the first section to draw so that the focused one fits in
/// `available` rows.
#[must_use]
pub fn first_visible_section(heights: &[usize], focused: usize, available: usize) -> usize {
    let focused = focused.min(heights.len().saturating_sub(1));
    let mut start = 0;
    while start < focused && heights[start..=focused].iter().sum::<usize>() > available {
        start += 1;
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::viewmodel::CoverView;

    fn rail(section: Section, header: bool) -> SectionView {
        SectionView {
            section,
            header: header.then(|| SectionHeaderView {
                title: section.title().to_string(),
                toggle: None,
                is_animating: false,
            }),
            presentation: Presentation::Rail {
                cards: vec![CardView {
                    title: "t".to_string(),
                    author: String::new(),
                    genre: String::new(),
                    cover: CoverView::None,
                    is_focused: false,
                    is_saved: false,
                    is_inserted: false,
                    is_moved: false,
                }],
                card_width: 20,
                more_before: false,
                more_after: false,
            },
            is_focused: false,
        }
    }

    #[test]
    fn heights_follow_presentation() {
        assert_eq!(section_height(&rail(Section::Time, true)), 1 + TIME_TILE_ROWS + 1);
        assert_eq!(section_height(&rail(Section::TopBooks, false)), CARD_ROWS + 1);

        let grid = SectionView {
            presentation: Presentation::Grid {
                rows: vec![vec![], vec![]],
                card_width: 20,
                more_above: false,
                more_below: true,
            },
            ..rail(Section::RecentBooks, true)
        };
        assert_eq!(section_height(&grid), 1 + 2 * CARD_ROWS + 1 + 1);
    }

    #[test]
    fn earlier_sections_are_skipped_to_fit_focus() {
        assert_eq!(first_visible_section(&[5, 9, 9], 2, 40), 0);
        assert_eq!(first_visible_section(&[5, 9, 9], 2, 18), 1);
        assert_eq!(first_visible_section(&[5, 9, 9], 2, 4), 2);
        assert_eq!(first_visible_section(&[5, 9, 9], 0, 4), 0);
    }
}
