//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps of analysis events are stored as RFC 3339 strings; message
//! receive times stay as the provider's epoch millis. Discriminants
//! (direction, analysis state, watchlist status) are stored as snake_case
//! strings.

use chrono::{DateTime, Utc};
use smish_core::{
  message::{AnalysisState, Direction, Message},
  verdict::{Verdict, WatchlistStatus},
};

use crate::{Error, Result};

// ─── Direction ───────────────────────────────────────────────────────────────

pub fn encode_direction(d: Direction) -> &'static str {
  match d {
    Direction::Received => "received",
    Direction::Sent => "sent",
  }
}

pub fn decode_direction(s: &str) -> Result<Direction> {
  match s {
    "received" => Ok(Direction::Received),
    "sent" => Ok(Direction::Sent),
    other => Err(Error::Decode(format!("unknown direction: {other:?}"))),
  }
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// The full column list, in [`RawRow`] field order. Every read goes through
/// this so the row mapper below stays correct.
pub const COLUMNS: &str = "message_id, sender, body, received_at, direction, \
  is_read, analysis_state, classification, confidence, confidence_score, \
  reason, risk_score, detection_method, watchlist_status, analyzed_at, \
  failure_summary";

/// Raw values read directly from a `messages` row.
pub struct RawRow {
  pub message_id:       i64,
  pub sender:           String,
  pub body:             String,
  pub received_at:      i64,
  pub direction:        String,
  pub is_read:          bool,
  pub analysis_state:   String,
  pub classification:   Option<String>,
  pub confidence:       Option<String>,
  pub confidence_score: Option<i64>,
  pub reason:           Option<String>,
  pub risk_score:       Option<f64>,
  pub detection_method: Option<String>,
  pub watchlist_status: Option<String>,
  pub analyzed_at:      Option<String>,
  pub failure_summary:  Option<String>,
}

/// Row mapper matching [`COLUMNS`].
pub fn read_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
  Ok(RawRow {
    message_id:       row.get(0)?,
    sender:           row.get(1)?,
    body:             row.get(2)?,
    received_at:      row.get(3)?,
    direction:        row.get(4)?,
    is_read:          row.get(5)?,
    analysis_state:   row.get(6)?,
    classification:   row.get(7)?,
    confidence:       row.get(8)?,
    confidence_score: row.get(9)?,
    reason:           row.get(10)?,
    risk_score:       row.get(11)?,
    detection_method: row.get(12)?,
    watchlist_status: row.get(13)?,
    analyzed_at:      row.get(14)?,
    failure_summary:  row.get(15)?,
  })
}

impl RawRow {
  pub fn into_message(self) -> Result<Message> {
    let direction = decode_direction(&self.direction)?;

    let analysis = match self.analysis_state.as_str() {
      "not_analyzed" => AnalysisState::NotAnalyzed,
      "analyzed" => {
        let classification = self.classification.ok_or_else(|| {
          Error::Decode(format!(
            "message {} analyzed but has no classification",
            self.message_id
          ))
        })?;
        let analyzed_at = self
          .analyzed_at
          .as_deref()
          .map(decode_dt)
          .transpose()?
          .ok_or_else(|| {
            Error::Decode(format!(
              "message {} analyzed but has no timestamp",
              self.message_id
            ))
          })?;

        AnalysisState::Analyzed(Verdict {
          classification,
          confidence: self.confidence.unwrap_or_default(),
          confidence_score: self.confidence_score,
          reason: self.reason.unwrap_or_default(),
          risk_score: self.risk_score.unwrap_or(0.0),
          detection_method: self.detection_method,
          watchlist: self
            .watchlist_status
            .as_deref()
            .map(WatchlistStatus::from_wire)
            .unwrap_or(WatchlistStatus::Unknown),
          analyzed_at,
        })
      }
      "failed" => AnalysisState::Failed {
        summary: self.failure_summary.unwrap_or_default(),
        at:      self
          .analyzed_at
          .as_deref()
          .map(decode_dt)
          .transpose()?
          .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
      },
      other => {
        return Err(Error::Decode(format!("unknown analysis state: {other:?}")));
      }
    };

    Ok(Message {
      id: self.message_id,
      sender: self.sender,
      body: self.body,
      received_at: self.received_at,
      direction,
      is_read: self.is_read,
      analysis,
    })
  }
}
