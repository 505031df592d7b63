//! Incremental UI-state updates.
//!
//! [`IncrementalUpdater`] is the synchronous decision core; [`UpdaterService`]
//! runs it on a dedicated tokio task fed by a command channel.

mod catalog;
mod diff;
mod machine;
mod service;

pub use catalog::{CatalogProvider, StaticCatalog};
pub use diff::{merge, primary_changed, secondary_changed, CONFIDENCE_DELTA};
pub use machine::{Decision, IncrementalUpdater, StateCell, UpdatePolicy};
pub use service::{Command, UpdaterHandle, UpdaterService};
