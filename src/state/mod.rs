//! In-memory application state.
//!
//! The active list is held by an injected, explicitly-scoped store rather
//! than a module-level singleton; components observe it through a small
//! subject that notifies synchronously and replays the latest value to
//! late subscribers. The auto-save loop lives here too.

mod active;
mod autosave;
mod subject;

pub use active::{clear_active, read_active, write_active, ActiveListStore, SharedActiveList};
pub use autosave::{Autosaver, DEFAULT_AUTOSAVE_SECS};
pub use subject::{Subject, SubscriptionId};
