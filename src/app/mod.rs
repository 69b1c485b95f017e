//! Application layer coordinating state, events, and actions.
//!
//! Sits between the plugin runtime (main.rs) and the layout, snapshot and
//! worker layers.
//!
//! ```text
//! User Input / Timers → Events → Event Handler → State Mutations → Actions → Side Effects
//!                                     ↑                                  ↓
//!                                     └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands and timer tags
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Input mode
//! - [`state`]: Home screen state and view model computation

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::{Action, TimerTag};
pub use handler::{handle_event, Event};
pub use modes::InputMode;
pub use state::{AppState, CoverArt, Focus};
