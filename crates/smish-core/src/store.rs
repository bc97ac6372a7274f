//! The `MessageStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `smish-store-sqlite`).
//! Higher layers (`smish-sync`, `smish-cli`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::message::{AnalysisOutcome, Message};

// ─── Import accounting ───────────────────────────────────────────────────────

/// What one `import_batch` call actually did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
  /// Rows that did not exist before this import.
  pub inserted:  u64,
  /// Rows that existed and had their source-of-truth fields updated.
  pub refreshed: u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a smish message store backend.
///
/// The store is the single source of truth and the only component permitted
/// to mutate analysis state. Callers serialise analysis runs themselves (at
/// most one orchestrator run at a time), so no selection bookkeeping beyond
/// the analysis-state column is needed.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait MessageStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Idempotent upsert keyed by message id.
  ///
  /// Existing rows refresh only their source-of-truth fields (sender, body,
  /// received_at, read state) — analysis annotations are never regressed.
  /// New rows insert as not-analyzed. Importing the same batch twice leaves
  /// the store identical to importing it once.
  fn import_batch(
    &self,
    messages: Vec<Message>,
  ) -> impl Future<Output = Result<ImportStats, Self::Error>> + Send + '_;

  /// Set the analysis state for exactly one message.
  ///
  /// A no-op if the id no longer exists: the store may have been cleared
  /// between selection and write-back, and that race is recoverable, not an
  /// error.
  fn record_analysis(
    &self,
    id: i64,
    outcome: AnalysisOutcome,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Irreversibly empty the store. The only deletion path — individual
  /// messages are never deleted.
  fn clear_all(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Up to `limit` received, not-yet-analyzed messages, unread first, then
  /// newest first. Empty when nothing qualifies.
  fn select_for_analysis(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Message>, Self::Error>> + Send + '_;

  /// Full ordered collection, newest first.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Message>, Self::Error>> + Send + '_;

  /// Messages with a scam verdict, newest first.
  fn list_scams(
    &self,
  ) -> impl Future<Output = Result<Vec<Message>, Self::Error>> + Send + '_;

  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Count of messages whose stored classification is SCAM
  /// (case-insensitive). Display-oriented, not correctness-critical.
  fn scam_count(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
