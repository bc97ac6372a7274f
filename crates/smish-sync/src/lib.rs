//! Inbox import and batch-analysis orchestration.
//!
//! Both components work against the `smish-core` trait seams only, so any
//! store backend, message source, or classifier can be swapped in. Errors
//! from collaborators are caught at these boundaries and converted into a
//! user-visible report, a persisted failure annotation, or a terminal
//! [`RunState`](orchestrator::RunState) — never an unhandled escape to the
//! presentation layer.

pub mod error;
pub mod importer;
pub mod orchestrator;

pub use error::ImportError;
pub use importer::{ImportReport, Importer};
pub use orchestrator::{Orchestrator, RunState, RunSummary};
