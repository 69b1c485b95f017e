//! Worker thread implementation for catalog, library and cover-art I/O.
//!
//! All filesystem access happens here so the UI thread never blocks. Zellij
//! delivers requests through [`ZellijWorker::on_message`], which decodes them
//! and hands them to [`ShelfWorker::handle_message`]; the response is posted
//! back to the plugin under the same message name.

use crate::domain::error::{Result, ShelfError};
use crate::domain::{parse_catalog, BookSummary, CoverRef, TimeBucket};
use crate::infrastructure::paths;
use crate::storage::backend::Storage;
use crate::storage::JsonStorage;
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Once;
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

static WORKER_TRACING: Once = Once::new();

/// Worker thread state.
///
/// The storage backend is opened lazily on the first message that needs it.
#[derive(Serialize, Deserialize, Default)]
pub struct ShelfWorker {
    /// Storage backend, initialized lazily on first use.
    #[serde(skip)]
    storage: Option<Box<dyn Storage>>,

    /// Directory holding the library and the cover cache. Defaults to
    /// [`paths::get_data_dir`] when unset.
    #[serde(skip)]
    data_dir: Option<PathBuf>,
}

impl ShelfWorker {
    /// Creates a worker over an existing storage backend and data directory.
    #[must_use]
    pub fn with_storage(storage: Box<dyn Storage>, data_dir: PathBuf) -> Self {
        Self {
            storage: Some(storage),
            data_dir: Some(data_dir),
        }
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(paths::get_data_dir)
    }

    /// Returns the storage backend, opening the JSON library on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the library file cannot be opened.
    fn get_storage(&mut self) -> Result<&mut Box<dyn Storage>> {
        if self.storage.is_none() {
            let path = paths::library_path(&self.data_dir());
            tracing::debug!(path = ?path, "opening library storage");
            self.storage = Some(Box::new(JsonStorage::new(path)?));
        }
        self.storage
            .as_mut()
            .ok_or_else(|| ShelfError::Worker("Storage not initialized".to_string()))
    }

    /// Maps an operation result to a response with consistent logging.
    ///
    /// `on_failure` receives the operation name prefixed to the error.
    fn handle_result<T, F, G>(operation: &str, result: Result<T>, on_success: F, on_failure: G) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
        G: FnOnce(String) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "worker operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "worker operation failed");
                on_failure(format!("{operation}: {e}"))
            }
        }
    }

    fn handle_load_catalog(path: &str) -> WorkerResponse {
        let result = std::fs::read_to_string(path)
            .map_err(|e| {
                ShelfError::Catalog(format!(
                    "cannot read {}: {e}",
                    paths::strip_host_prefix(path)
                ))
            })
            .and_then(|contents| parse_catalog(&contents));

        Self::handle_result(
            "load catalog",
            result,
            |books| {
                tracing::debug!(book_count = books.len(), "catalog loaded");
                WorkerResponse::CatalogLoaded { books }
            },
            |message| WorkerResponse::CatalogFailed { message },
        )
    }

    fn handle_load_recent_books(&mut self) -> WorkerResponse {
        Self::handle_result(
            "load recent books",
            self.get_storage().and_then(|storage| storage.recent_books()),
            |books| WorkerResponse::RecentBooksLoaded { books },
            |message| WorkerResponse::RecentBooksFailed { message },
        )
    }

    fn handle_toggle_saved(&mut self, book: &BookSummary) -> WorkerResponse {
        let timestamp = chrono::Utc::now().timestamp();
        let key = book.key.clone();

        let result = self.get_storage().and_then(|storage| {
            let saved = storage.toggle_saved(book, timestamp)?;
            let recent = storage.recent_books()?;
            Ok((saved, recent))
        });

        Self::handle_result(
            "toggle saved",
            result,
            |(saved, recent)| {
                tracing::debug!(key = %key, saved = saved, "saved state changed");
                WorkerResponse::SavedToggled { key, saved, recent }
            },
            |message| WorkerResponse::Error { message },
        )
    }

    /// Looks up `covers/<stem>.txt`. A missing or empty file is not an error:
    /// the card simply keeps its placeholder.
    fn handle_resolve_cover(&self, key: String, cover: &CoverRef) -> WorkerResponse {
        let path = paths::covers_dir(&self.data_dir()).join(format!("{}.txt", cover.cache_stem()));

        match read_cover_art(&path) {
            Some(lines) => {
                tracing::debug!(key = %key, line_count = lines.len(), "cover resolved");
                WorkerResponse::CoverResolved { key, lines }
            }
            None => {
                tracing::debug!(key = %key, path = ?path, "no cover art cached");
                WorkerResponse::CoverUnavailable { key }
            }
        }
    }

    fn handle_load_saved_in_window(&mut self, bucket: TimeBucket) -> WorkerResponse {
        let cutoff = (chrono::Utc::now() - bucket.window()).timestamp();
        let failed = bucket.clone();

        Self::handle_result(
            "load saved in window",
            self.get_storage().and_then(|storage| storage.saved_since(cutoff)),
            |records| WorkerResponse::SavedInWindowLoaded { bucket, records },
            |message| WorkerResponse::SavedInWindowFailed { bucket: failed, message },
        )
    }

    /// Links the worker's spans to the span that posted the message.
    ///
    /// Returns a context guard that must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(
            opentelemetry::Context::current()
                .with_remote_span_context(span_context)
                .attach(),
        )
    }

    /// Processes a worker message and returns the response to post back.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::LoadCatalog { path, .. } => Self::handle_load_catalog(&path),
            WorkerMessage::LoadRecentBooks { .. } => self.handle_load_recent_books(),
            WorkerMessage::ToggleSaved { book, .. } => self.handle_toggle_saved(&book),
            WorkerMessage::ResolveCover { key, cover, .. } => self.handle_resolve_cover(key, &cover),
            WorkerMessage::LoadSavedInWindow { bucket, .. } => {
                self.handle_load_saved_in_window(bucket)
            }
        }
    }
}

impl ZellijWorker<'_> for ShelfWorker {
    fn on_message(&mut self, message: String, payload: String) {
        // Tracing is optional; a missing data directory only disables it.
        WORKER_TRACING.call_once(|| {
            let _ = crate::observability::init_tracing(None, "worker");
        });

        let response = match serde_json::from_str::<WorkerMessage>(&payload) {
            Ok(request) => self.handle_message(request),
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker message");
                WorkerResponse::Error {
                    message: format!("malformed request: {e}"),
                }
            }
        };

        match serde_json::to_string(&response) {
            Ok(payload) => post_message_to_plugin(PluginMessage {
                name: message,
                payload,
                worker_name: None,
            }),
            Err(e) => tracing::warn!(error = %e, "failed to serialize worker response"),
        }
    }
}

fn read_cover_art(path: &Path) -> Option<Vec<String>> {
    let contents = std::fs::read_to_string(path).ok()?;
    let lines: Vec<String> = contents.lines().map(str::to_string).collect();
    if lines.iter().all(|line| line.trim().is_empty()) {
        return None;
    }
    Some(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn worker_in(dir: &TempDir) -> ShelfWorker {
        let storage = JsonStorage::new(paths::library_path(dir.path())).unwrap();
        ShelfWorker::with_storage(Box::new(storage), dir.path().to_path_buf())
    }

    #[test]
    fn toggle_saved_replies_with_updated_recent_list() {
        let dir = TempDir::new().unwrap();
        let mut worker = worker_in(&dir);

        let response = worker.handle_message(WorkerMessage::toggle_saved(BookSummary::new(
            "OL1W", "Dune",
        )));

        match response {
            WorkerResponse::SavedToggled { key, saved, recent } => {
                assert_eq!(key, "OL1W");
                assert!(saved);
                assert_eq!(recent.len(), 1);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn catalog_is_loaded_from_disk() {
        let dir = TempDir::new().unwrap();
        let catalog = dir.path().join("catalog.json");
        std::fs::write(
            &catalog,
            r#"{ "books": [ { "key": "OL1W", "title": "Dune", "authors": ["Frank Herbert"] } ] }"#,
        )
        .unwrap();

        let response = ShelfWorker::default()
            .handle_message(WorkerMessage::load_catalog(catalog.display().to_string()));

        assert_eq!(
            response,
            WorkerResponse::CatalogLoaded {
                books: vec![BookSummary::new("OL1W", "Dune").with_author("Frank Herbert")]
            }
        );
    }

    #[test]
    fn missing_catalog_is_reported_as_catalog_failure() {
        let response = ShelfWorker::default()
            .handle_message(WorkerMessage::load_catalog("/nonexistent/catalog.json".into()));
        assert!(matches!(response, WorkerResponse::CatalogFailed { .. }));
    }

    /// Storage whose every read fails.
    struct UnreadableStorage;

    impl Storage for UnreadableStorage {
        fn recent_books(&self) -> Result<Vec<BookSummary>> {
            Err(ShelfError::Storage("library unreadable".into()))
        }

        fn toggle_saved(&mut self, _book: &BookSummary, _timestamp: i64) -> Result<bool> {
            Err(ShelfError::Storage("library unreadable".into()))
        }

        fn is_saved(&self, _key: &str) -> Result<bool> {
            Err(ShelfError::Storage("library unreadable".into()))
        }

        fn saved_since(&self, _cutoff: i64) -> Result<Vec<crate::storage::SavedBookRecord>> {
            Err(ShelfError::Storage("library unreadable".into()))
        }
    }

    #[test]
    fn storage_failures_name_the_failed_request() {
        let dir = TempDir::new().unwrap();
        let mut worker = ShelfWorker::with_storage(Box::new(UnreadableStorage), dir.path().to_path_buf());
        let bucket = TimeBucket::new(1, "This Month");

        match worker.handle_message(WorkerMessage::load_saved_in_window(bucket.clone())) {
            WorkerResponse::SavedInWindowFailed { bucket: failed, message } => {
                assert_eq!(failed, bucket);
                assert!(message.starts_with("load saved in window"));
            }
            other => panic!("unexpected response: {other:?}"),
        }
        assert!(matches!(
            worker.handle_message(WorkerMessage::load_recent_books()),
            WorkerResponse::RecentBooksFailed { .. }
        ));
        assert!(matches!(
            worker.handle_message(WorkerMessage::toggle_saved(BookSummary::new("a", "A"))),
            WorkerResponse::Error { .. }
        ));
    }

    #[test]
    fn cover_resolution_reads_cached_art() {
        let dir = TempDir::new().unwrap();
        let covers = paths::covers_dir(dir.path());
        std::fs::create_dir_all(&covers).unwrap();
        std::fs::write(covers.join("42.txt"), "/\\\n\\/\n").unwrap();
        let mut worker = worker_in(&dir);

        let found = worker.handle_message(WorkerMessage::resolve_cover("a".into(), CoverRef::Id(42)));
        assert_eq!(
            found,
            WorkerResponse::CoverResolved {
                key: "a".into(),
                lines: vec!["/\\".into(), "\\/".into()]
            }
        );

        let missing = worker.handle_message(WorkerMessage::resolve_cover("b".into(), CoverRef::Id(7)));
        assert_eq!(missing, WorkerResponse::CoverUnavailable { key: "b".into() });
    }

    #[test]
    fn saved_in_window_includes_books_saved_now() {
        let dir = TempDir::new().unwrap();
        let mut worker = worker_in(&dir);
        worker.handle_message(WorkerMessage::toggle_saved(BookSummary::new("a", "A")));

        let response =
            worker.handle_message(WorkerMessage::load_saved_in_window(TimeBucket::new(0, "This Week")));

        match response {
            WorkerResponse::SavedInWindowLoaded { records, .. } => assert_eq!(records.len(), 1),
            other => panic!("unexpected response: {other:?}"),
        }
    }
}
