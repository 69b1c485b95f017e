//! Views reachable from the home screen.
//!
//! - [`route`]: navigation requests and routes
//! - [`navigator`]: the route stack and its key handling
//! - [`search`]: fuzzy book search

pub mod navigator;
pub mod route;
pub mod search;

pub use navigator::{NavKey, NavOutcome, Navigator};
pub use route::{NavigationRequest, Route};
pub use search::{search_books, SearchHit};
