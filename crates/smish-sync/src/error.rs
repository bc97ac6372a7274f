//! Error type for `smish-sync`.

use smish_core::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
  /// The message source could not be queried at all. Fatal for this import,
  /// non-fatal for the process — the next user-triggered import retries.
  #[error(transparent)]
  Source(#[from] SourceError),

  /// The backing store rejected an operation.
  #[error("storage failure: {0}")]
  Storage(String),
}
