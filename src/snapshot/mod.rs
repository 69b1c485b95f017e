//! Snapshot building, diffing and synchronization.
//!
//! - [`model`]: the sectioned row list
//! - [`diff`]: identity-based insert/remove/move computation
//! - [`sync`]: displayed snapshot ownership and superseding transitions

pub mod diff;
pub mod model;
pub mod sync;

pub use diff::{diff, RowChange, RowMove, SnapshotDiff};
pub use model::{Snapshot, SnapshotSection};
pub use sync::{RefreshOutcome, SnapshotSynchronizer, TickOutcome, Transition};
