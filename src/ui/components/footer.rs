//! Footer component renderer.
//!
//! Keybinding hints, centered and dimmed. Hints wider than the terminal are
//! truncated so they never wrap into the row above.

use crate::ui::helpers::{center, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the keybinding hints at `row`. Returns the next row.
pub fn render_footer(row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", center(&footer.keybindings, cols));
    print!("{}", Theme::reset());
    row + 1
}
