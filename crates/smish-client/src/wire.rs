//! Wire types for the classification backend's JSON protocol.
//!
//! The response schema is defensive: `classification` and `confidence` are
//! required, every other field defaults to a documented neutral value, and
//! fields this client does not consume are ignored outright.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smish_core::verdict::{Verdict, WatchlistStatus};

/// `POST /analyze` request body.
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
  pub message:   &'a str,
  pub sender:    &'a str,
  /// Epoch millis at the time of the call.
  pub timestamp: i64,
}

/// `POST /analyze` response body, as far as this client consumes it.
#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
  pub classification: String,
  pub confidence:     String,

  #[serde(default)]
  pub confidence_score: Option<i64>,
  #[serde(default)]
  pub reason: String,
  #[serde(default)]
  pub risk_score: f64,
  #[serde(default)]
  pub detection_method: Option<String>,
  #[serde(default = "watchlist_default")]
  pub sender_watchlist_status: String,
}

fn watchlist_default() -> String { "not_on_watchlist".to_string() }

impl AnalyzeResponse {
  pub fn into_verdict(self, analyzed_at: DateTime<Utc>) -> Verdict {
    Verdict {
      classification: self.classification,
      confidence: self.confidence,
      confidence_score: self.confidence_score,
      reason: self.reason,
      risk_score: self.risk_score,
      detection_method: self.detection_method,
      watchlist: WatchlistStatus::from_wire(&self.sender_watchlist_status),
      analyzed_at,
    }
  }
}
