//! Book card and time tile renderer.
//!
//! Cards are built as lines of styled text so that rails and grids can place
//! several of them side by side on the same terminal rows.
//!
//! ```text
//! ┌────────────────────┐
//! │Science Fiction     │
//! │░░░░░░░░░░░░░░░░░░░░│
//! │░░░░░░░░░░░░░░░░░░░░│
//! │░░░░░░░░░░░░░░░░░░░░│
//! │Dune                │
//! │Frank Herbert      ★│
//! └────────────────────┘
//! ```

use crate::app::state::CARD_ROWS;
use crate::ui::helpers::{center, fit};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{CardView, CoverView};

/// Rows of a time tile, borders included.
pub const TIME_TILE_ROWS: usize = 3;

/// Rows of cover art drawn inside a card.
const COVER_ROWS: usize = 3;

const SAVED_MARK: &str = "★";

fn border_style(card: &CardView, theme: &Theme) -> String {
    if card.is_focused {
        format!("{}{}", Theme::bold(), Theme::fg(&theme.colors.selection_bg))
    } else if card.is_inserted {
        format!("{}{}", Theme::dim(), Theme::fg(&theme.colors.inserted_fg))
    } else if card.is_moved {
        format!("{}{}", Theme::dim(), Theme::fg(&theme.colors.accent))
    } else {
        Theme::fg(&theme.colors.border)
    }
}

fn edge(left: &str, right: &str, inner: usize, style: &str) -> String {
    format!("{style}{left}{}{right}{}", "─".repeat(inner), Theme::reset())
}

fn framed(content: &str, style: &str) -> String {
    format!(
        "{style}│{}{content}{}{style}│{}",
        Theme::reset(),
        Theme::reset(),
        Theme::reset()
    )
}

/// Lines of a book card `width` columns wide, exactly [`CARD_ROWS`] of them.
#[must_use]
pub fn card_lines(card: &CardView, width: usize, theme: &Theme) -> Vec<String> {
    let inner = width.saturating_sub(2);
    let style = border_style(card, theme);
    let mut lines = Vec::with_capacity(CARD_ROWS);

    lines.push(edge("┌", "┐", inner, &style));

    lines.push(framed(
        &format!("{}{}", Theme::fg(&theme.colors.text_dim), fit(&card.genre, inner)),
        &style,
    ));

    for row in 0..COVER_ROWS {
        let cover = match &card.cover {
            CoverView::Art(art) => format!(
                "{}{}",
                Theme::fg(&theme.colors.text_normal),
                fit(art.get(row).map_or("", String::as_str), inner)
            ),
            CoverView::Placeholder => {
                format!("{}{}", Theme::fg(&theme.colors.border), "░".repeat(inner))
            }
            CoverView::None => " ".repeat(inner),
        };
        lines.push(framed(&cover, &style));
    }

    let title_style = if card.is_focused {
        format!(
            "{}{}{}",
            Theme::bold(),
            Theme::fg(&theme.colors.selection_fg),
            Theme::bg(&theme.colors.selection_bg)
        )
    } else {
        format!("{}{}", Theme::bold(), Theme::fg(&theme.colors.text_normal))
    };
    lines.push(framed(&format!("{title_style}{}", fit(&card.title, inner)), &style));

    let author = if card.is_saved && inner > 2 {
        format!(
            "{}{}{}{SAVED_MARK}",
            Theme::fg(&theme.colors.text_dim),
            fit(&card.author, inner - 1),
            Theme::fg(&theme.colors.saved_fg)
        )
    } else {
        format!("{}{}", Theme::fg(&theme.colors.text_dim), fit(&card.author, inner))
    };
    lines.push(framed(&author, &style));

    lines.push(edge("└", "┘", inner, &style));
    lines
}

/// Lines of a time tile, exactly [`TIME_TILE_ROWS`] of them.
#[must_use]
pub fn time_tile_lines(card: &CardView, width: usize, theme: &Theme) -> Vec<String> {
    let inner = width.saturating_sub(2);
    let style = border_style(card, theme);

    let label_style = if card.is_focused {
        format!(
            "{}{}{}",
            Theme::bold(),
            Theme::fg(&theme.colors.selection_fg),
            Theme::bg(&theme.colors.selection_bg)
        )
    } else {
        Theme::fg(&theme.colors.accent)
    };

    vec![
        edge("┌", "┐", inner, &style),
        framed(&format!("{label_style}{}", center(&card.title, inner)), &style),
        edge("└", "┘", inner, &style),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &str) -> String {
        let mut out = String::new();
        let mut in_escape = false;
        for c in line.chars() {
            match (in_escape, c) {
                (false, '\u{1b}') => in_escape = true,
                (true, 'm') => in_escape = false,
                (true, _) => {}
                (false, c) => out.push(c),
            }
        }
        out
    }

    fn card() -> CardView {
        CardView {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: "Science Fiction".to_string(),
            cover: CoverView::Placeholder,
            is_focused: false,
            is_saved: true,
            is_inserted: false,
            is_moved: false,
        }
    }

    #[test]
    fn card_has_fixed_height_and_width() {
        let lines = card_lines(&card(), 22, &Theme::default());
        assert_eq!(lines.len(), CARD_ROWS);
        for line in &lines {
            assert_eq!(plain(line).chars().count(), 22);
        }
        assert!(plain(&lines[5]).contains("Dune"));
        assert!(plain(&lines[6]).ends_with("★│"));
    }

    #[test]
    fn cover_art_replaces_placeholder() {
        let mut art = card();
        art.cover = CoverView::Art(vec!["/\\".to_string()]);
        let lines = card_lines(&art, 10, &Theme::default());
        assert_eq!(plain(&lines[2]), "│/\\      │");
        assert_eq!(plain(&lines[3]), "│        │");
    }

    #[test]
    fn moved_cards_use_the_accent_border() {
        let theme = Theme::default();
        let mut moved = card();
        moved.is_moved = true;

        let top = &card_lines(&moved, 12, &theme)[0];
        assert!(top.starts_with(&format!("{}{}", Theme::dim(), Theme::fg(&theme.colors.accent))));

        moved.is_inserted = true;
        let top = &card_lines(&moved, 12, &theme)[0];
        assert!(top.contains(&Theme::fg(&theme.colors.inserted_fg)));
    }

    #[test]
    fn time_tile_centers_label() {
        let mut tile = card();
        tile.title = "This Week".to_string();
        tile.cover = CoverView::None;
        let lines = time_tile_lines(&tile, 15, &Theme::default());
        assert_eq!(lines.len(), TIME_TILE_ROWS);
        assert_eq!(plain(&lines[1]), "│  This Week  │");
    }
}
