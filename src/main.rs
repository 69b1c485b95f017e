//! Zellij plugin wrapper and entry point.
//!
//! Thin integration layer between the Shelfview library and the Zellij
//! plugin system: it translates Zellij events into library events, runs the
//! resulting actions against the host, and owns the timer queue.
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← Home screen, routes, timers
//! │  └──────────────────┘   │
//! │          │              │
//! │          │ IPC          │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │   ShelfWorker    │   │  ← Catalog, library, covers
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Timers
//!
//! Zellij timers carry no payload. Every scheduled [`TimerTag`] is queued and
//! matched to `Timer` events in the order they were scheduled; all timers
//! share one period so they fire in that order.
//!
//! # Keybindings
//!
//! Home screen:
//! - `h`/`l`/`Left`/`Right`: Previous/next item
//! - `j`/`k`/`Down`/`Up`: Next/previous section (grid row in a grid)
//! - `Enter`: Open the focused item
//! - `m`/`Space`: Toggle the focused section, `T`/`R` toggle top/recent books
//! - `s`: Add the focused book to the list, or remove it
//! - `/`: Search, `r`: Refresh, `q`/`Esc`: Close
//!
//! Open views: `j`/`k` move, `Enter` opens, `s` toggles saved,
//! `Esc`/`q`/`h`/`Backspace` go back. Closing the last view reloads the home
//! screen's lists as if it had just appeared.

#![allow(clippy::multiple_crate_versions)]

use std::collections::{BTreeMap, VecDeque};
use zellij_tile::prelude::*;
use zellij_tile::shim::post_message_to;

use shelfview::domain::Section;
use shelfview::navigation::{NavKey, NavOutcome, Navigator};
use shelfview::worker::{ShelfWorker, WorkerMessage, WorkerResponse};
use shelfview::{handle_event, Action, AppState, Config, Event, InputMode, TimerTag};

register_plugin!(State);
register_worker!(ShelfWorker, shelf_worker, SHELF_WORKER);

/// Worker name used for both requests and responses.
const WORKER_NAME: &str = "shelf";

/// Plugin state wrapper.
struct State {
    app: AppState,
    navigator: Navigator,
    config: Config,

    /// Tags of scheduled timers, oldest first.
    timers: VecDeque<TimerTag>,

    permissions_granted: bool,
}

impl Default for State {
    fn default() -> Self {
        let config = Config::default();
        Self {
            app: shelfview::initialize(&config),
            navigator: Navigator::new(),
            config,
            timers: VecDeque::new(),
            permissions_granted: false,
        }
    }
}

impl ZellijPlugin for State {
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        self.config = Config::from_zellij(&configuration);
        // Tracing is optional; the plugin runs without it.
        let _ = shelfview::observability::init_tracing(self.config.trace_level.as_deref(), "plugin");

        let _span = tracing::debug_span!("plugin_load").entered();
        tracing::debug!(config = ?self.config, "parsed configuration");

        self.app = shelfview::initialize(&self.config);

        request_permission(&[PermissionType::FullHdAccess]);
        subscribe(&[
            EventType::Key,
            EventType::Timer,
            EventType::Visible,
            EventType::CustomMessage,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => {
                if !self.navigator.is_home() {
                    return self.handle_route_key(key);
                }
                match self.map_key_event(key) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::Timer(_) => match self.timers.pop_front() {
                Some(tag) => Event::Tick(tag),
                None => return false,
            },
            zellij_tile::prelude::Event::Visible(visible) => {
                if !visible || !self.permissions_granted {
                    return false;
                }
                Event::Appear
            }
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match self.map_custom_message_event(&message, &payload) {
                    Some(response) => {
                        if self.navigator.handle_response(&response) {
                            return !self.navigator.is_home();
                        }
                        Event::WorkerResponse(response)
                    }
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(status) => match status {
                PermissionStatus::Granted => {
                    tracing::debug!("permissions granted");
                    self.permissions_granted = true;
                    Event::Appear
                }
                PermissionStatus::Denied => {
                    tracing::warn!("permissions denied - catalog and library unavailable");
                    return false;
                }
            },
            _ => return false,
        };

        self.dispatch(&our_event)
    }

    fn render(&mut self, rows: usize, cols: usize) {
        shelfview::ui::render(&self.app, &self.navigator, rows, cols);
    }
}

impl State {
    fn event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::Timer(_) => "Timer".to_string(),
            zellij_tile::prelude::Event::Visible(_) => "Visible".to_string(),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    /// Runs a library event and executes its actions.
    fn dispatch(&mut self, event: &Event) -> bool {
        match handle_event(&mut self.app, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled"
                );
                let mut render = should_render;
                for action in actions {
                    render |= self.execute_action(action);
                }
                render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    /// Maps keys on the home screen to library events.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        if self.app.input_mode == InputMode::Search {
            return match key.bare_key {
                BareKey::Esc => Some(Event::ExitSearch),
                BareKey::Enter => Some(Event::Submit),
                BareKey::Backspace => Some(Event::Backspace),
                BareKey::Char(c) => Some(Event::Char(c)),
                _ => None,
            };
        }

        Some(match key.bare_key {
            BareKey::Right | BareKey::Char('l') => Event::NextItem,
            BareKey::Left | BareKey::Char('h') => Event::PrevItem,
            BareKey::Down | BareKey::Char('j') => Event::NextSection,
            BareKey::Up | BareKey::Char('k') => Event::PrevSection,
            BareKey::Enter => Event::Select,
            BareKey::Char('m' | ' ') => Event::ToggleFocused,
            BareKey::Char('T') => Event::ToggleSection(Section::TopBooks),
            BareKey::Char('R') => Event::ToggleSection(Section::RecentBooks),
            BareKey::Char('s') => Event::ToggleSaved,
            BareKey::Char('/') => Event::SearchMode,
            BareKey::Char('r') => Event::Refresh,
            BareKey::Esc | BareKey::Char('q') => Event::CloseFocus,
            _ => return None,
        })
    }

    /// Handles a key while a view is open above the home screen.
    fn handle_route_key(&mut self, key: &KeyWithModifier) -> bool {
        let nav_key = match key.bare_key {
            BareKey::Esc | BareKey::Backspace | BareKey::Left | BareKey::Char('q' | 'h') => {
                NavKey::Back
            }
            BareKey::Up | BareKey::Char('k') => NavKey::Up,
            BareKey::Down | BareKey::Char('j') => NavKey::Down,
            BareKey::Enter | BareKey::Right | BareKey::Char('l') => NavKey::Open,
            BareKey::Char('s') => NavKey::ToggleSaved,
            _ => return false,
        };

        match self.navigator.handle_key(nav_key) {
            NavOutcome::Ignored => false,
            NavOutcome::Render => true,
            NavOutcome::ReturnedHome => {
                self.dispatch(&Event::Appear);
                true
            }
            NavOutcome::Post(message) => {
                Self::post_worker_message(&message);
                false
            }
        }
    }

    fn map_custom_message_event(&self, message: &str, payload: &str) -> Option<WorkerResponse> {
        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }

        serde_json::from_str::<WorkerResponse>(payload)
            .map_err(|e| tracing::warn!(error = %e, "failed to deserialize worker response"))
            .ok()
    }

    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: WORKER_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize worker message"),
        }
    }

    /// Executes an action against the host. Returns `true` if the UI needs
    /// a re-render.
    fn execute_action(&mut self, action: Action) -> bool {
        tracing::debug!(action = ?action, "executing action");
        match action {
            Action::CloseFocus => {
                hide_self();
                false
            }
            Action::PostToWorker(message) => {
                Self::post_worker_message(&message);
                false
            }
            Action::Navigate(request) => {
                let searchable = self.app.searchable_books();
                for message in self.navigator.navigate(request, &searchable) {
                    Self::post_worker_message(&message);
                }
                true
            }
            Action::ScheduleTimer(tag) => {
                self.timers.push_back(tag);
                #[allow(clippy::cast_precision_loss)]
                let seconds = self.config.tick_interval_ms as f64 / 1000.0;
                set_timeout(seconds);
                false
            }
        }
    }
}
