//! lugnut-core: the workflow core for a stage-based spare-parts order tracker.
//!
//! Part orders move through five stage collections (Orders -> Main Sheet ->
//! Booking / Call List -> Archive, with a Reorder backflow to Orders). This
//! crate owns the stateful machinery behind that flow:
//!
//! - [`workshop::Workshop`] — the single owned state container for a session
//! - [`engine`] — stage-transition operations (move contract, audit notes)
//! - [`ledger::Ledger`] — the durable audit/commit log with debounce coalescing
//! - [`undo::UndoStack`] — session-only linear undo/redo
//! - [`notify::NotificationCenter`] — reminder-due reconciliation
//! - [`grace::GraceWindows`] — per-record strict-validation grace windows
//! - [`remote::RemoteStore`] — the opaque persistent store behind the core
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::WorkflowError`] at operation boundaries;
//!   `anyhow::Result` for reference-data IO.
//! - **Logging**: `tracing` macros (`debug!` on mutation paths, `warn!` for
//!   failed optimistic remote writes, `info!` for restores).
//! - **Time**: epoch milliseconds via the [`clock::Clock`] trait; nothing in
//!   this crate reads the system clock directly.

pub mod clock;
pub mod engine;
pub mod error;
pub mod grace;
pub mod ledger;
pub mod model;
pub mod notify;
pub mod refdata;
pub mod remote;
pub mod store;
pub mod undo;
pub mod validate;
pub mod workshop;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ErrorCode, WorkflowError};
pub use ledger::{Commit, Ledger, Snapshot};
pub use model::record::{PartRecord, Reminder};
pub use model::stage::Stage;
pub use notify::{Notification, NotificationCenter, NotificationKind};
pub use refdata::RefData;
pub use remote::{MemoryRemote, RemoteError, RemoteStore};
pub use store::StageBoard;
pub use workshop::Workshop;
