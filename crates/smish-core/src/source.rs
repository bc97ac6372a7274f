//! The `MessageSource` trait — where messages come from.
//!
//! A source hands back raw provider rows; every column is optional because
//! real provider rows are incomplete more often than anyone would like.
//! Validation into a [`Message`] happens importer-side so a malformed record
//! can be skipped without aborting the fetch.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  error::{InvalidRecord, SourceError},
  message::{AnalysisState, Direction, Message},
};

// ─── Raw record ──────────────────────────────────────────────────────────────

/// One row as the provider exposes it, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMessage {
  #[serde(default)]
  pub id:          Option<i64>,
  #[serde(default)]
  pub sender:      Option<String>,
  #[serde(default)]
  pub body:        Option<String>,
  /// Epoch millis.
  #[serde(default)]
  pub received_at: Option<i64>,
  /// Provider message type code (1 = inbox, 2 = sent).
  #[serde(default)]
  pub kind:        Option<i64>,
  #[serde(default)]
  pub is_read:     Option<bool>,
}

impl RawMessage {
  /// Validate into a [`Message`].
  ///
  /// Missing id, timestamp, or an unknown direction code are fatal for the
  /// record. A missing sender becomes `"Unknown"` and a missing body the
  /// empty string, matching what the device provider itself degrades to.
  /// Read state defaults to read.
  pub fn validate(self) -> Result<Message, InvalidRecord> {
    let id = self.id.ok_or(InvalidRecord::MissingId)?;
    let received_at =
      self.received_at.ok_or(InvalidRecord::MissingTimestamp(id))?;
    let kind = self.kind.ok_or(InvalidRecord::MissingDirection(id))?;
    let direction = Direction::from_provider_code(kind)
      .ok_or(InvalidRecord::UnknownDirection(id, kind))?;

    Ok(Message {
      id,
      sender: self.sender.unwrap_or_else(|| "Unknown".to_string()),
      body: self.body.unwrap_or_default(),
      received_at,
      direction,
      is_read: self.is_read.unwrap_or(true),
      analysis: AnalysisState::NotAnalyzed,
    })
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// An external provider of message records (the device inbox, or a stand-in).
///
/// `fetch` fails only when the source cannot be queried at all — permission
/// revoked, provider unreachable. A successful fetch of zero records is a
/// valid empty result.
pub trait MessageSource: Send + Sync {
  fn fetch(
    &self,
  ) -> impl Future<Output = Result<Vec<RawMessage>, SourceError>> + Send + '_;
}
