//! Loading indicator renderer.
//!
//! A spinner in the middle of the body with the wait label under it. The
//! label is pushed down by the view's bounce offset so it moves up and down
//! as the frames advance.

use crate::ui::helpers::{center, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::LoadingView;

/// Renders the loading view in the rows `top..bottom`.
pub fn render_loading(view: &LoadingView, theme: &Theme, top: usize, bottom: usize, cols: usize) {
    let middle = top + bottom.saturating_sub(top) / 2;
    let spinner_row = middle.saturating_sub(2).max(top);

    position_cursor(spinner_row, 1);
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.accent));
    print!("{}", center(view.spinner, cols));
    print!("{}", Theme::reset());

    let label_row = (spinner_row + 2 + view.label_offset).min(bottom.saturating_sub(1));
    position_cursor(label_row, 1);
    print!("{}", Theme::fg(&theme.colors.empty_state_fg));
    print!("{}", center(&view.label, cols));
    print!("{}", Theme::reset());
}
