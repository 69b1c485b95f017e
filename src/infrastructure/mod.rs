//! Infrastructure layer for filesystem and environment interactions.
//!
//! The Zellij plugin sandbox mounts the host filesystem under `/host`; the
//! helpers here translate between host and sandbox paths and name the files
//! Shelfview keeps in its data directory.

pub mod paths;

pub use paths::{covers_dir, expand_tilde, get_data_dir, library_path, strip_host_prefix};
