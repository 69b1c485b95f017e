//! Renderers for the views opened above the home screen.
//!
//! - detail: one book with its cover art
//! - list: saved books of a time window or search results, with fuzzy match
//!   highlighting on titles

use crate::ui::helpers::{self, center, fit, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{CoverView, DetailView, ListRow, ListView};

/// Rows of cover art drawn in the detail view.
const DETAIL_COVER_ROWS: usize = 12;

/// Width of the title column in lists.
const TITLE_COLUMN: usize = 40;

/// Renders the detail view starting at `row`. Returns the next free row.
pub fn render_detail(row: usize, detail: &DetailView, theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;

    match &detail.cover {
        CoverView::Art(lines) => {
            for line in lines.iter().take(DETAIL_COVER_ROWS) {
                position_cursor(current_row, 1);
                print!("{}{}{}", Theme::fg(&theme.colors.text_normal), center(line, cols), Theme::reset());
                current_row += 1;
            }
        }
        CoverView::Placeholder | CoverView::None => {
            position_cursor(current_row, 1);
            print!("{}{}{}", Theme::fg(&theme.colors.text_dim), center("[no cover]", cols), Theme::reset());
            current_row += 1;
        }
    }
    current_row += 1;

    position_cursor(current_row, 1);
    print!("{}{}{}{}", Theme::bold(), Theme::fg(&theme.colors.text_normal), center(&detail.title, cols), Theme::reset());
    current_row += 1;

    for line in [&detail.author, &detail.genre] {
        if line.is_empty() {
            continue;
        }
        position_cursor(current_row, 1);
        print!("{}{}{}", Theme::fg(&theme.colors.text_dim), center(line, cols), Theme::reset());
        current_row += 1;
    }

    position_cursor(current_row, 1);
    print!("{}{}{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim), center(&detail.key, cols), Theme::reset());
    current_row += 2;

    position_cursor(current_row, 1);
    if detail.is_saved {
        print!("{}{}{}", Theme::fg(&theme.colors.saved_fg), center("★ In your list", cols), Theme::reset());
    } else {
        print!("{}{}{}", Theme::fg(&theme.colors.text_dim), center("Not in your list", cols), Theme::reset());
    }
    current_row + 1
}

/// Renders a book list starting at `row`. Returns the next free row.
pub fn render_list(row: usize, list: &ListView, theme: &Theme, cols: usize) -> usize {
    if let Some(message) = &list.empty_message {
        position_cursor(row + 2, 1);
        print!("{}{}{}", Theme::fg(&theme.colors.empty_state_fg), center(message, cols), Theme::reset());
        return row + 3;
    }

    let mut current_row = row;
    for item in &list.rows {
        current_row = render_list_row(current_row, item, theme, cols);
    }
    current_row
}

/// One row: saved marker, title with match highlights, then the detail column.
fn render_list_row(row: usize, item: &ListRow, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let base = if item.is_selected {
        format!(
            "{}{}",
            Theme::fg(&theme.colors.selection_fg),
            Theme::bg(&theme.colors.selection_bg)
        )
    } else {
        Theme::fg(&theme.colors.text_normal)
    };
    print!("{base}");

    if item.is_saved {
        print!("{}★ {base}", Theme::fg(&theme.colors.saved_fg));
    } else {
        print!("  ");
    }

    let title_width = TITLE_COLUMN.min(cols.saturating_sub(4));
    let title = truncate(&item.title, title_width);
    helpers::render_highlighted_text(&title, &item.title_ranges, theme, item.is_selected);
    print!("{base}");
    print!("{}", " ".repeat(title_width.saturating_sub(title.chars().count()) + 2));

    let detail_width = cols.saturating_sub(title_width + 4);
    print!("{}", fit(&item.detail, detail_width));

    print!("{}", Theme::reset());
    row + 1
}
