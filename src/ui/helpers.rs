//! Shared rendering utilities.
//!
//! Text fitting works on characters, not bytes, so titles with accents or
//! CJK characters never get cut inside a code point.

use crate::ui::theme::Theme;

/// Positions the cursor at a 1-indexed row and column.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Cuts `text` to at most `width` characters, ending in `…` when cut.
///
/// ```
/// use shelfview::ui::helpers::truncate;
///
/// assert_eq!(truncate("Dune Messiah", 6), "Dune …");
/// assert_eq!(truncate("Dune", 6), "Dune");
/// ```
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

/// Truncates or right-pads `text` to exactly `width` characters.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let len = cut.chars().count();
    format!("{cut}{}", " ".repeat(width.saturating_sub(len)))
}

/// Centers `text` in `width` characters, truncating if needed.
#[must_use]
pub fn center(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let len = cut.chars().count();
    let left = width.saturating_sub(len) / 2;
    format!(
        "{}{cut}{}",
        " ".repeat(left),
        " ".repeat(width.saturating_sub(left + len))
    )
}

/// Renders text with highlighted character ranges for fuzzy matches.
///
/// Ranges are `(start, end)` character indices with exclusive end. Selected
/// rows are printed plain so the highlight does not fight the selection
/// background.
pub fn render_highlighted_text(
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
) {
    if ranges.is_empty() || is_selected {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }

        if start > current_pos {
            let normal_section: String = chars[current_pos..start].iter().collect();
            print!("{normal_section}");
        }

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}
