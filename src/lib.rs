//! Shelfview: a Zellij plugin presenting a book catalog home screen.
//!
//! The home screen shows three sections in a fixed order:
//! - **Time**: a rail of time buckets ("This Week", "This Month", ...)
//! - **Top books**: the catalog's top books, loaded from a JSON file
//! - **Recently saved**: the user's saved books, newest first
//!
//! Top books and recent books can each be toggled between a horizontal rail
//! and a wrapping grid. Toggling swaps the label immediately and animates the
//! layout change over a few timer ticks.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Events, actions
//! │  - Event handling and selection                     │
//! │  - Toggle / refresh coordination                    │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Layout        │   │ Snapshot      │   │ Navigation    │
//! │ (layout/)     │   │ (snapshot/)   │   │ (navigation/) │
//! │ - Builder     │   │ - Model       │   │ - Routes      │
//! │ - Toggle      │   │ - Diff        │   │ - Search      │
//! └───────────────┘   │ - Sync        │   └───────────────┘
//!                     └───────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (storage/)    │   │ (worker/)     │
//! │ - Rendering   │   │ - JSON I/O    │   │ - Catalog     │
//! │ - Theming     │   │ - Saved books │   │ - Covers      │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Infrastructure, Observability              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Home screen state, events and actions
//! - [`domain`]: Books, sections, items and errors
//! - [`layout`]: Section layout builder and toggle state machine
//! - [`snapshot`]: Snapshots, diffs and the snapshot synchronizer
//! - [`navigation`]: Detail, time-filtered and search views
//! - [`storage`]: Saved-books library on disk
//! - [`worker`]: Background I/O worker
//! - [`ui`]: Terminal rendering with theme support
//! - [`infrastructure`]: Sandbox paths
//! - [`observability`]: OpenTelemetry tracing to a local file
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/shelfview.wasm" {
//!         catalog_file "~/.config/shelfview/catalog.json"
//!         time_buckets "This Week,This Month,This Year"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!         transition_frames "3"
//!         tick_interval_ms "150"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use shelfview::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! let (_, actions) = handle_event(&mut state, &Event::Appear)?;
//! assert!(!actions.is_empty());
//! # Ok::<(), shelfview::ShelfError>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod layout;
pub mod navigation;
pub mod observability;
pub mod snapshot;
pub mod storage;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, InputMode, TimerTag};
pub use domain::{Result, ShelfError};
pub use ui::Theme;

use std::collections::BTreeMap;

const DEFAULT_CATALOG_FILE: &str = "~/.config/shelfview/catalog.json";
const DEFAULT_TIME_BUCKETS: [&str; 3] = ["This Week", "This Month", "This Year"];
const DEFAULT_TRANSITION_FRAMES: u32 = 3;
const DEFAULT_TICK_INTERVAL_MS: u64 = 150;

/// Plugin configuration parsed from Zellij's configuration system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Top-books catalog file, already mapped into the sandbox.
    pub catalog_file: String,

    /// Labels of the time section's tiles, in display order.
    pub time_buckets: Vec<String>,

    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file.
    pub theme_file: Option<String>,

    /// Tracing filter. Default: `"info"`
    pub trace_level: Option<String>,

    /// Timer ticks a layout or snapshot transition lasts. `0` commits
    /// changes immediately.
    pub transition_frames: u32,

    /// Period of the transition and loading animation timer.
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_file: infrastructure::expand_tilde(DEFAULT_CATALOG_FILE),
            time_buckets: DEFAULT_TIME_BUCKETS.iter().map(ToString::to_string).collect(),
            theme_name: None,
            theme_file: None,
            trace_level: None,
            transition_frames: DEFAULT_TRANSITION_FRAMES,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Missing or unparsable values fall back to their defaults.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use shelfview::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("time_buckets".to_string(), "Today, This Week".to_string());
    /// map.insert("transition_frames".to_string(), "0".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.time_buckets, vec!["Today", "This Week"]);
    /// assert_eq!(config.transition_frames, 0);
    /// assert_eq!(config.tick_interval_ms, 150);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let catalog_file = config
            .get("catalog_file")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map_or(defaults.catalog_file, infrastructure::expand_tilde);

        let time_buckets = config
            .get("time_buckets")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|labels: &Vec<String>| !labels.is_empty())
            .unwrap_or(defaults.time_buckets);

        let transition_frames = parse_or(config, "transition_frames", defaults.transition_frames);
        let tick_interval_ms = parse_or(config, "tick_interval_ms", defaults.tick_interval_ms)
            .max(1);

        Self {
            catalog_file,
            time_buckets,
            theme_name: config.get("theme").cloned(),
            theme_file: config.get("theme_file").map(|path| infrastructure::expand_tilde(path)),
            trace_level: config.get("trace_level").cloned(),
            transition_frames,
            tick_interval_ms,
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(
    config: &BTreeMap<String, String>,
    key: &str,
    default: T,
) -> T {
    match config.get(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key = key, value = %raw, default = %default, "invalid config value, using default");
            default
        }),
    }
}

/// Loads the configured theme: file first, then built-in name, then default.
#[must_use]
pub fn load_theme(config: &Config) -> Theme {
    if let Some(theme_file) = &config.theme_file {
        match Theme::from_file(theme_file) {
            Ok(theme) => return theme,
            Err(e) => {
                tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
            }
        }
    }

    config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
        Theme::from_name(theme_name).unwrap_or_else(|| {
            tracing::debug!(theme_name = %theme_name, "unknown theme, using default");
            Theme::default()
        })
    })
}

/// Creates the home screen state for `config`.
///
/// Both book lists start out unloaded; nothing is requested until the screen
/// appears.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(catalog_file = %config.catalog_file, "initializing shelfview plugin");
    AppState::new(config, load_theme(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
        assert_eq!(
            Config::default().catalog_file,
            "/host/.config/shelfview/catalog.json"
        );
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = Config::from_zellij(&map(&[
            ("transition_frames", "many"),
            ("tick_interval_ms", "0"),
            ("time_buckets", " , "),
        ]));
        assert_eq!(config.transition_frames, 3);
        assert_eq!(config.tick_interval_ms, 1);
        assert_eq!(config.time_buckets, Config::default().time_buckets);
    }

    #[test]
    fn catalog_path_is_mapped_into_sandbox() {
        let config = Config::from_zellij(&map(&[("catalog_file", "~/books/top.json")]));
        assert_eq!(config.catalog_file, "/host/books/top.json");
    }

    #[test]
    fn theme_resolution_order() {
        let named = Config::from_zellij(&map(&[("theme", "catppuccin-latte")]));
        assert_eq!(load_theme(&named).name, "catppuccin-latte");

        let unknown = Config::from_zellij(&map(&[("theme", "nope")]));
        assert_eq!(load_theme(&unknown), Theme::default());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        let mut custom = Theme::from_name("catppuccin-frappe").unwrap();
        custom.name = "custom".to_string();
        std::fs::write(&path, toml::to_string(&custom).unwrap()).unwrap();

        let from_file = Config {
            theme_file: Some(path.to_string_lossy().to_string()),
            theme_name: Some("catppuccin-latte".to_string()),
            ..Config::default()
        };
        assert_eq!(load_theme(&from_file).name, "custom");
    }
}
