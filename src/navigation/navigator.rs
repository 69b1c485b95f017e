//! Route stack owned by the plugin shell.
//!
//! The home screen only emits [`NavigationRequest`]s. The navigator turns them
//! into routes, asks the worker for any data a route needs and handles the
//! keys of every view above the home screen.

use super::route::{NavigationRequest, Route};
use super::search::search_books;
use crate::domain::BookSummary;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Keys understood by the views above the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Back,
    Up,
    Down,
    Open,
    ToggleSaved,
}

/// What a key did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Nothing changed.
    Ignored,
    /// The current view changed and must be redrawn.
    Render,
    /// The last view was closed; the home screen is shown again and its
    /// lists may be stale.
    ReturnedHome,
    /// The worker must be asked to do something; the view is redrawn when
    /// it answers.
    Post(WorkerMessage),
}

/// Stack of open views above the home screen.
#[derive(Debug, Clone)]
pub struct Navigator {
    home: Route,
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            home: Route::Home,
            stack: Vec::new(),
        }
    }

    /// The view on top of the stack.
    #[must_use]
    pub fn current(&self) -> &Route {
        self.stack.last().unwrap_or(&self.home)
    }

    #[must_use]
    pub fn is_home(&self) -> bool {
        self.stack.is_empty()
    }

    /// Number of views above the home screen.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Opens the view for a request.
    ///
    /// `searchable` are the books a search request looks through. Returns the
    /// worker messages the new view depends on.
    pub fn navigate(
        &mut self,
        request: NavigationRequest,
        searchable: &[BookSummary],
    ) -> Vec<WorkerMessage> {
        let _span = tracing::debug_span!("navigate", request = ?request).entered();

        match request {
            NavigationRequest::BookDetail(book) => {
                self.stack.push(Route::BookDetail(book));
                Vec::new()
            }
            NavigationRequest::TimeFiltered(bucket) => {
                let message = WorkerMessage::load_saved_in_window(bucket.clone());
                self.stack.push(Route::TimeFiltered {
                    bucket,
                    records: None,
                    selected: 0,
                    error: None,
                });
                vec![message]
            }
            NavigationRequest::Search(query) => {
                let hits = search_books(&query, searchable);
                self.stack.push(Route::Search {
                    query,
                    hits,
                    selected: 0,
                });
                Vec::new()
            }
        }
    }

    /// Applies a worker response addressed to one of the open views.
    ///
    /// A failed load settles the view with an empty list and the error, so
    /// it stops waiting. Returns `true` if the response was consumed.
    pub fn handle_response(&mut self, response: &WorkerResponse) -> bool {
        let (bucket, loaded, failure) = match response {
            WorkerResponse::SavedInWindowLoaded { bucket, records } => (bucket, records.clone(), None),
            WorkerResponse::SavedInWindowFailed { bucket, message } => {
                (bucket, Vec::new(), Some(message.clone()))
            }
            _ => return false,
        };

        for route in self.stack.iter_mut().rev() {
            if let Route::TimeFiltered {
                bucket: open,
                records,
                selected,
                error,
            } = route
            {
                if open.index == bucket.index {
                    *records = Some(loaded);
                    *selected = 0;
                    *error = failure;
                    return true;
                }
            }
        }

        tracing::debug!(bucket = %bucket.label, "time-filtered view already closed");
        true
    }

    /// Handles a key while a view above the home screen is shown.
    pub fn handle_key(&mut self, key: NavKey) -> NavOutcome {
        if self.is_home() {
            return NavOutcome::Ignored;
        }

        match key {
            NavKey::Back => {
                self.stack.pop();
                if self.is_home() {
                    NavOutcome::ReturnedHome
                } else {
                    NavOutcome::Render
                }
            }
            NavKey::Up | NavKey::Down => {
                let moved = self
                    .stack
                    .last_mut()
                    .is_some_and(|route| route.move_selection(key == NavKey::Down));
                if moved {
                    NavOutcome::Render
                } else {
                    NavOutcome::Ignored
                }
            }
            NavKey::Open => match self.current().selected_book().cloned() {
                Some(book) => {
                    self.stack.push(Route::BookDetail(book));
                    NavOutcome::Render
                }
                None => NavOutcome::Ignored,
            },
            NavKey::ToggleSaved => match self.current() {
                Route::BookDetail(book) => NavOutcome::Post(WorkerMessage::toggle_saved(book.clone())),
                _ => NavOutcome::Ignored,
            },
        }
    }
}
