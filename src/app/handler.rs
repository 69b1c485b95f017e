//! Event handling and state transition logic.
//!
//! The handler processes user input, timer ticks and worker responses,
//! translating them into state changes and action sequences.
//!
//! # Event Types
//!
//! - **Lifecycle**: `Appear`, `Refresh`, `Tick`
//! - **Focus**: `NextSection`, `PrevSection`, `NextItem`, `PrevItem`
//! - **Commands**: `ToggleSection`, `ToggleFocused`, `Select`, `ToggleSaved`
//! - **Search**: `SearchMode`, `Char`, `Backspace`, `Submit`, `ExitSearch`
//! - **Worker**: `WorkerResponse` with typed message variants
//!
//! # Example
//!
//! ```rust
//! use shelfview::app::{handle_event, AppState, Event};
//! use shelfview::ui::theme::Theme;
//! use shelfview::Config;
//!
//! let mut state = AppState::new(&Config::default(), Theme::default());
//! let (render, actions) = handle_event(&mut state, &Event::Appear)?;
//! assert!(render);
//! assert!(!actions.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::actions::{Action, TimerTag};
use super::modes::InputMode;
use super::state::{AppState, CoverArt};
use crate::domain::error::Result;
use crate::domain::Section;
use crate::navigation::NavigationRequest;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by user input, timers, or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The screen became visible. Reloads saved books and refreshes.
    Appear,
    /// Rebuilds the snapshot from the current sources.
    Refresh,
    /// A scheduled timer fired.
    Tick(TimerTag),

    /// Moves the focus down one grid row or to the next section.
    NextSection,
    /// Moves the focus up one grid row or to the previous section.
    PrevSection,
    /// Moves the focus to the next item.
    NextItem,
    /// Moves the focus to the previous item.
    PrevItem,

    /// Expands or collapses a section.
    ToggleSection(Section),
    /// Expands or collapses the focused section.
    ToggleFocused,
    /// Opens the focused item.
    Select,
    /// Adds the focused book to the user's list, or removes it.
    ToggleSaved,

    /// Enters search mode with an empty query.
    SearchMode,
    /// Appends a character to the search query.
    Char(char),
    /// Removes the last character from the search query.
    Backspace,
    /// Opens the search results for the current query.
    Submit,
    /// Leaves search mode and clears the query.
    ExitSearch,

    /// Hides the plugin pane.
    CloseFocus,

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns whether to
/// re-render together with the actions to execute.
///
/// # Errors
///
/// Returns errors from state mutation methods. Worker failures are logged
/// and never returned: the last good state stays on screen.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Appear => {
            let mut actions = vec![state.reload_recent_books()];
            actions.extend(state.request_missing_data());

            let (_, refresh_actions) = state.refresh();
            actions.extend(refresh_actions);
            actions.extend(state.start_loading_animation());

            Ok((true, actions))
        }
        Event::Refresh => {
            let (render, mut actions) = state.refresh();
            actions.extend(state.start_loading_animation());
            Ok((render, actions))
        }
        Event::Tick(tag) => Ok(state.tick(*tag)),

        Event::NextSection => Ok((state.move_focus_down(), vec![])),
        Event::PrevSection => Ok((state.move_focus_up(), vec![])),
        Event::NextItem => Ok((state.move_focus_right(), vec![])),
        Event::PrevItem => Ok((state.move_focus_left(), vec![])),

        Event::ToggleSection(section) => Ok(toggle(state, *section)),
        Event::ToggleFocused => {
            let section = state.focus.section;
            Ok(toggle(state, section))
        }

        Event::Select => state.select_focused().map_or_else(
            || Ok((false, vec![])),
            |request| Ok((false, vec![Action::Navigate(request)])),
        ),
        Event::ToggleSaved => {
            let Some(book) = state.focused_book() else {
                tracing::debug!("no book focused");
                return Ok((false, vec![]));
            };
            tracing::debug!(key = %book.key, "toggling saved state");
            Ok((
                false,
                vec![Action::PostToWorker(WorkerMessage::toggle_saved(book.clone()))],
            ))
        }

        Event::SearchMode => {
            tracing::debug!("entering search mode");
            state.input_mode = InputMode::Search;
            state.search_query.clear();
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            if state.input_mode != InputMode::Search {
                return Ok((false, vec![]));
            }
            state.search_query.push(*c);
            tracing::trace!(query = %state.search_query, "search query updated");
            Ok((true, vec![]))
        }
        Event::Backspace => {
            if state.input_mode != InputMode::Search {
                return Ok((false, vec![]));
            }
            state.search_query.pop();
            Ok((true, vec![]))
        }
        Event::Submit => {
            if state.input_mode != InputMode::Search {
                return Ok((false, vec![]));
            }
            let query = std::mem::take(&mut state.search_query);
            state.input_mode = InputMode::Normal;

            if query.trim().is_empty() {
                return Ok((true, vec![]));
            }
            tracing::debug!(query = %query, "search submitted");
            Ok((true, vec![Action::Navigate(NavigationRequest::Search(query))]))
        }
        Event::ExitSearch => {
            tracing::debug!(query = %state.search_query, "exiting search mode");
            state.input_mode = InputMode::Normal;
            state.search_query.clear();
            Ok((true, vec![]))
        }

        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),

        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response)),
    }
}

fn toggle(state: &mut AppState, section: Section) -> (bool, Vec<Action>) {
    state.toggle_section(section).map_or_else(
        || {
            tracing::debug!(section = ?section, "section cannot be toggled");
            (false, vec![])
        },
        |(_, actions)| (true, actions),
    )
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::CatalogLoaded { books } => {
            tracing::debug!(book_count = books.len(), "catalog received");
            state.catalog_settled();
            state.top_books = Some(books.clone());
            state.refresh()
        }
        WorkerResponse::RecentBooksLoaded { books } => {
            state.recent_settled();
            if state.recent_books.as_ref() == Some(books) {
                tracing::debug!("recent books unchanged, skipping refresh");
                return (false, vec![]);
            }
            state.set_recent_books(books.clone());
            state.refresh()
        }
        WorkerResponse::SavedToggled { key, saved, recent } => {
            tracing::debug!(key = %key, saved = saved, "saved state confirmed");
            state.recent_settled();
            state.set_recent_books(recent.clone());
            state.refresh()
        }
        WorkerResponse::CoverResolved { key, lines } => {
            state.covers.insert(key.clone(), CoverArt::Lines(lines.clone()));
            (true, vec![])
        }
        WorkerResponse::CoverUnavailable { key } => {
            state.covers.insert(key.clone(), CoverArt::Unavailable);
            (false, vec![])
        }
        WorkerResponse::SavedInWindowLoaded { bucket, .. }
        | WorkerResponse::SavedInWindowFailed { bucket, .. } => {
            tracing::debug!(bucket = %bucket.label, "time-filtered list arrived outside its view");
            (false, vec![])
        }
        WorkerResponse::CatalogFailed { message } => {
            tracing::error!("Worker error: {}", message);
            state.catalog_settled();
            (true, vec![])
        }
        WorkerResponse::RecentBooksFailed { message } => {
            tracing::error!("Worker error: {}", message);
            state.recent_settled();
            (true, vec![])
        }
        WorkerResponse::Error { message } => {
            tracing::error!("Worker error: {}", message);
            (false, vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookSummary, TimeBucket};
    use crate::layout::ToggleLabel;
    use crate::ui::theme::Theme;
    use crate::ui::viewmodel::HomeBody;
    use crate::Config;

    fn state_with_frames(frames: u32) -> AppState {
        let config = Config {
            transition_frames: frames,
            ..Config::default()
        };
        AppState::new(&config, Theme::default())
    }

    fn books(keys: &[&str]) -> Vec<BookSummary> {
        keys.iter()
            .map(|key| BookSummary::new(*key, key.to_uppercase()))
            .collect()
    }

    fn respond(state: &mut AppState, response: WorkerResponse) -> (bool, Vec<Action>) {
        handle_event(state, &Event::WorkerResponse(response)).unwrap()
    }

    fn loaded(frames: u32, top: &[&str], recent: &[&str]) -> AppState {
        let mut state = state_with_frames(frames);
        respond(&mut state, WorkerResponse::CatalogLoaded { books: books(top) });
        respond(&mut state, WorkerResponse::RecentBooksLoaded { books: books(recent) });
        state
    }

    fn posted(actions: &[Action]) -> Vec<&WorkerMessage> {
        actions
            .iter()
            .filter_map(|action| match action {
                Action::PostToWorker(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn appear_loads_sources_and_starts_spinner() {
        let mut state = state_with_frames(3);
        let (render, actions) = handle_event(&mut state, &Event::Appear).unwrap();

        assert!(render);
        let messages = posted(&actions);
        assert!(messages
            .iter()
            .any(|m| matches!(m, WorkerMessage::LoadCatalog { .. })));
        assert!(messages
            .iter()
            .any(|m| matches!(m, WorkerMessage::LoadRecentBooks { .. })));
        assert!(actions.contains(&Action::ScheduleTimer(TimerTag::Loading)));
        assert!(state.is_loading());
    }

    #[test]
    fn loading_ends_once_both_lists_arrive() {
        let mut state = state_with_frames(0);
        handle_event(&mut state, &Event::Appear).unwrap();

        respond(&mut state, WorkerResponse::CatalogLoaded { books: books(&["a"]) });
        assert!(state.is_loading());

        respond(&mut state, WorkerResponse::RecentBooksLoaded { books: vec![] });
        assert!(!state.is_loading());
        assert!(matches!(
            state.compute_viewmodel(24, 80).body,
            HomeBody::Sections(_)
        ));

        let (render, actions) = handle_event(&mut state, &Event::Tick(TimerTag::Loading)).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn failed_catalog_load_keeps_previous_screen() {
        let mut state = loaded(0, &["a"], &[]);
        let before = state.visible().clone();

        respond(
            &mut state,
            WorkerResponse::CatalogFailed {
                message: "load catalog: missing file".to_string(),
            },
        );
        assert_eq!(state.visible(), &before);
    }

    #[test]
    fn failures_settle_only_the_request_that_failed() {
        let mut state = state_with_frames(0);
        handle_event(&mut state, &Event::Appear).unwrap();

        respond(
            &mut state,
            WorkerResponse::Error {
                message: "toggle saved: disk full".to_string(),
            },
        );
        assert!(posted(&state.request_missing_data()).is_empty());

        respond(
            &mut state,
            WorkerResponse::RecentBooksFailed {
                message: "load recent books: unreadable".to_string(),
            },
        );
        let retried = state.request_missing_data();
        assert!(matches!(
            posted(&retried).as_slice(),
            [WorkerMessage::LoadRecentBooks { .. }]
        ));

        respond(
            &mut state,
            WorkerResponse::CatalogFailed {
                message: "load catalog: missing file".to_string(),
            },
        );
        assert!(matches!(
            posted(&state.request_missing_data()).as_slice(),
            [WorkerMessage::LoadCatalog { .. }]
        ));
    }

    #[test]
    fn toggling_recent_books_switches_label_immediately() {
        let mut state = loaded(3, &[], &["a"]);

        let (render, actions) =
            handle_event(&mut state, &Event::ToggleSection(Section::RecentBooks)).unwrap();
        assert!(render);
        assert!(matches!(
            actions.as_slice(),
            [Action::ScheduleTimer(TimerTag::Layout { .. })]
        ));

        let recent = state.layout().section(Section::RecentBooks).unwrap();
        assert_eq!(
            recent.header.as_ref().and_then(|header| header.toggle),
            Some(ToggleLabel::Hide)
        );
        assert_eq!(
            state.layout().section(Section::Time),
            crate::layout::screen_layout(&crate::layout::SectionLayoutState::default())
                .section(Section::Time)
        );
    }

    #[test]
    fn toggling_time_does_nothing() {
        let mut state = loaded(3, &[], &[]);
        let layout = state.layout().clone();

        let (render, actions) =
            handle_event(&mut state, &Event::ToggleSection(Section::Time)).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(state.layout(), &layout);
    }

    #[test]
    fn select_opens_second_recent_book() {
        let mut state = loaded(0, &[], &["a", "b", "c"]);
        handle_event(&mut state, &Event::NextSection).unwrap();
        handle_event(&mut state, &Event::NextItem).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::Select).unwrap();
        assert_eq!(
            actions,
            vec![Action::Navigate(NavigationRequest::BookDetail(
                BookSummary::new("b", "B")
            ))]
        );
    }

    #[test]
    fn select_time_tile_opens_filtered_view() {
        let mut state = loaded(0, &[], &[]);
        let (_, actions) = handle_event(&mut state, &Event::Select).unwrap();
        assert_eq!(
            actions,
            vec![Action::Navigate(NavigationRequest::TimeFiltered(
                TimeBucket::new(0, "This Week")
            ))]
        );
    }

    #[test]
    fn later_refresh_supersedes_running_transition() {
        let mut state = loaded(3, &["a"], &[]);
        handle_event(&mut state, &Event::Tick(TimerTag::Snapshot { generation: 1 })).unwrap();
        handle_event(&mut state, &Event::Tick(TimerTag::Snapshot { generation: 1 })).unwrap();
        handle_event(&mut state, &Event::Tick(TimerTag::Snapshot { generation: 1 })).unwrap();
        assert!(state.synchronizer().transition().is_none());

        let (_, first) = respond(&mut state, WorkerResponse::CatalogLoaded { books: books(&["a", "b"]) });
        let (_, second) = respond(&mut state, WorkerResponse::CatalogLoaded { books: books(&["c"]) });
        assert!(matches!(first.as_slice(), [Action::ScheduleTimer(TimerTag::Snapshot { .. }), ..]));
        let Some(Action::ScheduleTimer(stale)) = first.first().cloned() else {
            panic!("expected a transition timer");
        };

        assert_eq!(
            handle_event(&mut state, &Event::Tick(stale)).unwrap(),
            (false, vec![])
        );
        assert!(matches!(second.first(), Some(Action::ScheduleTimer(_))));

        assert!(state.synchronizer().transition().is_some());
        let ids = state.visible().ids(Section::TopBooks);
        assert_eq!(ids, vec![crate::domain::ItemId::Book("c".to_string())]);
    }

    #[test]
    fn toggle_saved_posts_focused_book() {
        let mut state = loaded(0, &["a"], &[]);
        handle_event(&mut state, &Event::NextSection).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::ToggleSaved).unwrap();
        assert_eq!(
            actions,
            vec![Action::PostToWorker(WorkerMessage::toggle_saved(BookSummary::new("a", "A")))]
        );
    }

    #[test]
    fn saved_toggle_reply_refreshes_recent_books() {
        let mut state = loaded(0, &["a"], &[]);
        respond(
            &mut state,
            WorkerResponse::SavedToggled {
                key: "a".to_string(),
                saved: true,
                recent: books(&["a"]),
            },
        );

        assert!(state.is_saved("a"));
        assert_eq!(state.visible().items(Section::RecentBooks).len(), 1);
    }

    #[test]
    fn submit_navigates_to_search_results() {
        let mut state = loaded(0, &["a"], &[]);
        handle_event(&mut state, &Event::SearchMode).unwrap();
        for c in "dune".chars() {
            handle_event(&mut state, &Event::Char(c)).unwrap();
        }
        handle_event(&mut state, &Event::Backspace).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::Submit).unwrap();
        assert_eq!(
            actions,
            vec![Action::Navigate(NavigationRequest::Search("dun".to_string()))]
        );
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn chars_are_ignored_outside_search() {
        let mut state = loaded(0, &[], &[]);
        assert_eq!(handle_event(&mut state, &Event::Char('x')).unwrap(), (false, vec![]));
        assert!(state.search_query.is_empty());
    }
}
