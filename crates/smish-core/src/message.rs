//! Message types — the unit of storage in the smish cache.
//!
//! A message is identified by the id the device provider assigned it; smish
//! never generates ids. Analysis annotations ride along in
//! [`AnalysisState`] and are written exactly once per attempt, only by the
//! orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::verdict::Verdict;

// ─── Direction ───────────────────────────────────────────────────────────────

/// Whether the message arrived on the device or was sent from it.
/// Only received messages are eligible for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Received,
  Sent,
}

impl Direction {
  /// Decode the telephony provider's message type code (1 = inbox, 2 = sent).
  pub fn from_provider_code(code: i64) -> Option<Self> {
    match code {
      1 => Some(Self::Received),
      2 => Some(Self::Sent),
      _ => None,
    }
  }
}

// ─── Analysis state ──────────────────────────────────────────────────────────

/// The analysis lifecycle of a message.
///
/// Transitions `NotAnalyzed → Analyzed` or `NotAnalyzed → Failed` exactly
/// once per attempt. A failed message stays failed — automatic runs never
/// retry it, so one systematically malformed message cannot storm the
/// backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnalysisState {
  NotAnalyzed,
  Analyzed(Verdict),
  Failed {
    /// Human-readable summary of what went wrong.
    summary: String,
    at:      DateTime<Utc>,
  },
}

impl AnalysisState {
  /// True while the message has never been through an analysis attempt.
  pub fn is_pending(&self) -> bool { matches!(self, Self::NotAnalyzed) }

  pub fn verdict(&self) -> Option<&Verdict> {
    match self {
      Self::Analyzed(v) => Some(v),
      _ => None,
    }
  }
}

/// The outcome of one analysis attempt, as handed to
/// [`MessageStore::record_analysis`](crate::store::MessageStore::record_analysis).
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
  Analyzed(Verdict),
  Failed(String),
}

// ─── Message ─────────────────────────────────────────────────────────────────

/// One SMS message plus its analysis annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
  /// Provider-assigned stable id; the store's primary key.
  pub id:          i64,
  /// Originating address — phone number or short code.
  pub sender:      String,
  /// Message text; may be empty.
  pub body:        String,
  /// Epoch millis assigned by the provider; the ordering key.
  pub received_at: i64,
  pub direction:   Direction,
  /// Soft prioritisation signal only — unread messages are analysed first.
  pub is_read:     bool,
  pub analysis:    AnalysisState,
}

impl Message {
  /// True if this message would qualify for [`select_for_analysis`].
  ///
  /// [`select_for_analysis`]: crate::store::MessageStore::select_for_analysis
  pub fn is_analyzable(&self) -> bool {
    self.direction == Direction::Received && self.analysis.is_pending()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn provider_code_roundtrip() {
    assert_eq!(Direction::from_provider_code(1), Some(Direction::Received));
    assert_eq!(Direction::from_provider_code(2), Some(Direction::Sent));
    assert_eq!(Direction::from_provider_code(0), None);
    assert_eq!(Direction::from_provider_code(3), None);
  }

  #[test]
  fn sent_messages_are_never_analyzable() {
    let m = Message {
      id:          1,
      sender:      "+100".into(),
      body:        "hi".into(),
      received_at: 1000,
      direction:   Direction::Sent,
      is_read:     true,
      analysis:    AnalysisState::NotAnalyzed,
    };
    assert!(!m.is_analyzable());
  }
}
