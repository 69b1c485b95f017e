//! Theme management and ANSI escape sequence generation.
//!
//! Supports built-in Catppuccin themes and custom themes loaded from TOML
//! files, and converts hex colors to 24-bit ANSI escape sequences.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: Dark theme with warm tones (default)
//! - `catppuccin-latte`: Light theme with soft pastels
//! - `catppuccin-frappe`: Cool dark theme
//! - `catppuccin-macchiato`: Warm dark theme
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! accent = "#89b4fa"
//! toggle_fg = "#f5c2e7"
//! saved_fg = "#a6e3a1"
//! inserted_fg = "#94e2d5"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! ```
//!
//! # Example
//!
//! ```rust
//! use shelfview::ui::theme::Theme;
//!
//! let theme = Theme::from_name("catppuccin-latte").unwrap();
//! print!("{}Bold Text{}", Theme::bold(), Theme::reset());
//! assert!(Theme::fg(&theme.colors.accent).starts_with("\u{1b}[38;2;"));
//! ```

use crate::domain::error::{Result, ShelfError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Header text color.
    pub header_fg: String,
    /// Optional header background color.
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Focused card foreground color.
    pub selection_fg: String,
    /// Focused card background color.
    pub selection_bg: String,

    /// Normal text color.
    pub text_normal: String,
    /// Dimmed text color (footer, authors, genres).
    pub text_dim: String,

    /// Card borders and separator lines.
    pub border: String,

    /// Section titles and time tiles.
    pub accent: String,
    /// Section toggle control.
    pub toggle_fg: String,
    /// Marker on books in the user's list.
    pub saved_fg: String,
    /// Cards entering the screen during a transition.
    pub inserted_fg: String,

    /// Search bar border color.
    pub search_bar_border: String,
    /// Fuzzy match highlight foreground.
    pub match_highlight_fg: String,
    /// Fuzzy match highlight background.
    pub match_highlight_bg: String,

    /// Empty section and loading message color.
    pub empty_state_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name, or `None` if the name is unknown.
    ///
    /// ```rust
    /// use shelfview::ui::theme::Theme;
    ///
    /// let theme = Theme::from_name("catppuccin-frappe").unwrap();
    /// assert_eq!(theme.name, "catppuccin-frappe");
    /// assert!(Theme::from_name("solarized").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "catppuccin-frappe" => include_str!("../../themes/catppuccin-frappe.toml"),
            "catppuccin-macchiato" => include_str!("../../themes/catppuccin-macchiato.toml"),
            _ => return None,
        };

        toml::from_str(toml_str)
            .map_err(|e| tracing::warn!(theme = name, error = %e, "built-in theme failed to parse"))
            .ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Theme`] if the file cannot be read or is not a
    /// valid theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ShelfError::Theme(format!("Failed to read theme file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| ShelfError::Theme(format!("Failed to parse theme TOML: {e}")))
    }

    /// Mocha palette compiled in, used if the bundled file cannot be parsed.
    fn fallback() -> Self {
        let hex = |s: &str| s.to_string();
        Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors {
                header_fg: hex("#cdd6f4"),
                header_bg: None,
                selection_fg: hex("#1e1e2e"),
                selection_bg: hex("#f5c2e7"),
                text_normal: hex("#cdd6f4"),
                text_dim: hex("#6c7086"),
                border: hex("#45475a"),
                accent: hex("#89b4fa"),
                toggle_fg: hex("#f5c2e7"),
                saved_fg: hex("#a6e3a1"),
                inserted_fg: hex("#94e2d5"),
                search_bar_border: hex("#f5c2e7"),
                match_highlight_fg: hex("#1e1e2e"),
                match_highlight_bg: hex("#f9e2af"),
                empty_state_fg: hex("#89b4fa"),
            },
        }
    }

    /// Converts a hex color to an RGB tuple, white on parse errors.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground color escape sequence.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background color escape sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling (colors, bold, dim).
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Catppuccin Mocha.
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(Self::fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn every_builtin_theme_parses() {
        for name in [
            "catppuccin-mocha",
            "catppuccin-latte",
            "catppuccin-frappe",
            "catppuccin-macchiato",
        ] {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn default_matches_bundled_mocha() {
        assert_eq!(Theme::default(), Theme::fallback());
    }

    #[test]
    fn hex_colors_become_ansi() {
        assert_eq!(Theme::fg("#ff0080"), "\u{1b}[38;2;255;0;128m");
        assert_eq!(Theme::bg("bad"), "\u{1b}[48;2;255;255;255m");
    }

    #[test]
    fn invalid_theme_file_is_a_theme_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("theme.toml");
        std::fs::write(&path, "name = \"x\"").unwrap();

        assert!(matches!(Theme::from_file(&path), Err(ShelfError::Theme(_))));
        assert!(matches!(
            Theme::from_file(dir.path().join("missing.toml")),
            Err(ShelfError::Theme(_))
        ));
    }
}
