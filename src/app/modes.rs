//! Input mode of the home screen.
//!
//! - **Normal**: section/item navigation and commands
//! - **Search**: typed characters edit the search query

/// Current input handling mode.
///
/// Controls which keybindings are active and whether the search bar is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Default navigation and command mode.
    ///
    /// Keybindings: h/j/k/l (move focus), enter (open), m (toggle section),
    /// s (add to list), / (search), r (refresh), q (quit).
    #[default]
    Normal,

    /// Search query entry.
    ///
    /// Characters and backspace edit the query, enter submits it, escape
    /// returns to normal mode.
    Search,
}
