//! Error type for `smish-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A stored row holds something this build cannot decode — a direction or
  /// state discriminant from a newer schema, or a mangled timestamp.
  #[error("stored row could not be decoded: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
