//! Worker thread message types for cross-thread communication.
//!
//! Requests go from the plugin's UI thread to the background worker; every
//! request carries the trace context of the span that posted it so the
//! worker's spans join the same trace. Responses come back as JSON in a
//! custom message and are handled on the UI thread.

use crate::domain::{BookSummary, CoverRef, TimeBucket};
use crate::storage::SavedBookRecord;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span IDs of the current span.
    ///
    /// Returns `None` if the current span context is invalid or not sampled.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            tracing::trace!("no valid span context to propagate");
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates `WorkerMessage` constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_catalog(LoadCatalog { path: String }),
    load_recent_books(LoadRecentBooks {}),
    toggle_saved(ToggleSaved { book: BookSummary }),
    resolve_cover(ResolveCover { key: String, cover: CoverRef }),
    load_saved_in_window(LoadSavedInWindow { bucket: TimeBucket }),
}

/// Messages sent from the main thread to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read and parse the top-books catalog file.
    LoadCatalog {
        /// Sandbox path of the catalog JSON.
        path: String,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// List saved books, most recent first.
    LoadRecentBooks {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Add the book to the user's list, or remove it if already there.
    ToggleSaved {
        book: BookSummary,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Look up cached cover art for a book.
    ResolveCover {
        /// Catalog key of the book the cover belongs to.
        key: String,
        cover: CoverRef,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// List books saved within a time bucket's window.
    LoadSavedInWindow {
        bucket: TimeBucket,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Trace context attached to the message, if any.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadCatalog { trace_context, .. }
            | Self::LoadRecentBooks { trace_context }
            | Self::ToggleSaved { trace_context, .. }
            | Self::ResolveCover { trace_context, .. }
            | Self::LoadSavedInWindow { trace_context, .. } => trace_context.as_ref(),
        }
    }
}

/// Responses sent from the worker thread back to the main thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// The catalog was parsed.
    CatalogLoaded { books: Vec<BookSummary> },

    /// Saved books, most recent first.
    RecentBooksLoaded { books: Vec<BookSummary> },

    /// A book's saved state changed.
    SavedToggled {
        key: String,
        saved: bool,
        /// Saved books after the change, most recent first.
        recent: Vec<BookSummary>,
    },

    /// Cached cover art was found.
    CoverResolved { key: String, lines: Vec<String> },

    /// No cover art is available; the card keeps its placeholder.
    CoverUnavailable { key: String },

    /// Books saved within a bucket's window.
    SavedInWindowLoaded {
        bucket: TimeBucket,
        records: Vec<SavedBookRecord>,
    },

    /// The catalog could not be read or parsed.
    CatalogFailed { message: String },

    /// The saved books could not be read.
    RecentBooksFailed { message: String },

    /// The books saved within a bucket's window could not be read.
    SavedInWindowFailed { bucket: TimeBucket, message: String },

    /// An error occurred during a worker operation without its own failure
    /// response.
    Error {
        /// Human-readable error message.
        message: String,
    },
}
