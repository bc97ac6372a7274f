//! Error taxonomy for `smish-core`.
//!
//! Store backends define their own error type via
//! [`MessageStore::Error`](crate::store::MessageStore::Error); the types here
//! cover the remaining collaborator boundaries (message source, classifier,
//! per-record validation).

use thiserror::Error;

/// The message source could not be queried at all.
///
/// Distinct from a successful fetch that returns zero records — an empty
/// inbox is a valid result, not an error.
#[derive(Debug, Error)]
pub enum SourceError {
  #[error("message source unavailable: {detail}")]
  Unavailable { detail: String },
}

/// A single source record could not be turned into a [`Message`].
///
/// Importers skip these and continue; one bad record never aborts an import.
///
/// [`Message`]: crate::message::Message
#[derive(Debug, Error)]
pub enum InvalidRecord {
  #[error("record has no id")]
  MissingId,

  #[error("record {0} has no received timestamp")]
  MissingTimestamp(i64),

  #[error("record {0} has no direction code")]
  MissingDirection(i64),

  #[error("record {0} has unknown direction code {1}")]
  UnknownDirection(i64, i64),
}

/// A single classification request failed.
///
/// Always recoverable: the orchestrator converts these into a persisted
/// failure annotation, never a crash.
#[derive(Debug, Error)]
pub enum ClassifyError {
  /// Transport-level failure: timeout, DNS, connection refused.
  #[error("network error: {detail}")]
  Network { detail: String },

  /// The server answered with a non-success status.
  #[error("server rejected request with status {status}: {detail}")]
  ServerRejected { status: u16, detail: String },

  /// The server answered 2xx but the body did not match the expected schema.
  #[error("malformed response: {detail}")]
  MalformedResponse { detail: String },
}
