//! Side effects requested by the event handler.
//!
//! The handler never talks to Zellij directly. It returns a `Vec<Action>`
//! that the plugin runtime executes in order after each event.
//!
//! # Example
//!
//! ```rust
//! use shelfview::app::{Action, TimerTag};
//! use shelfview::worker::WorkerMessage;
//!
//! let actions = vec![
//!     Action::PostToWorker(WorkerMessage::load_recent_books()),
//!     Action::ScheduleTimer(TimerTag::Loading),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::navigation::NavigationRequest;
use crate::worker::WorkerMessage;

/// Identifies what a timer was scheduled for.
///
/// Timers fire back as `Event::Tick` carrying the same tag. Transition tags
/// carry the generation they were scheduled for so that ticks outliving their
/// transition are recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTag {
    /// Loading spinner and wait-label animation frame.
    Loading,
    /// Next frame of a snapshot transition.
    Snapshot { generation: u64 },
    /// Next frame of a section expand/collapse transition.
    Layout { generation: u64 },
}

/// Commands executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Posts a message to the background worker thread.
    PostToWorker(WorkerMessage),

    /// Opens another view through the navigator.
    Navigate(NavigationRequest),

    /// Schedules a timer that fires back as a tick with this tag.
    ScheduleTimer(TimerTag),
}
