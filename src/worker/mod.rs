//! Background worker for catalog, library and cover-art I/O.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker state and message processing logic

pub mod handler;
pub mod messages;

pub use handler::ShelfWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
