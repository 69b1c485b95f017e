//! OpenTelemetry tracing with file-based export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK (simple exporter) → OTLP/JSON lines
//! ```
//!
//! Traces go to `<data dir>/shelfview-otlp.json`, rotated at 10 MB with three
//! numbered backups. The filter comes from the `trace_level` plugin option
//! and defaults to `info`.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - `tracer`: File span exporter and provider
//! - `otlp`: OTLP/JSON encoding
//! - `file_writer`: Size-rotated trace file

mod file_writer;
pub mod init;
mod otlp;
mod tracer;

pub use init::{init_tracing, init_tracing_in, TRACE_FILE};
