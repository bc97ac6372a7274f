//! Verdict types — the classifier's answer for one message.
//!
//! The backend's classification vocabulary is open-ended: SCAM, SUSPICIOUS,
//! LEGITIMATE and ERROR are the canonical values, but any string is stored
//! verbatim. Everything derived from a verdict (scam flag, alert level) must
//! degrade gracefully on vocabulary it does not recognise.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Watchlist ───────────────────────────────────────────────────────────────

/// Whether the backend found the sender on its known-bad watchlist.
/// Membership forces a high alert level regardless of content classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchlistStatus {
  OnWatchlist,
  NotOnWatchlist,
  /// The backend said something this client does not understand.
  Unknown,
}

impl WatchlistStatus {
  /// Decode the wire value; anything unrecognised degrades to `Unknown`.
  pub fn from_wire(s: &str) -> Self {
    match s {
      "on_watchlist" => Self::OnWatchlist,
      "not_on_watchlist" => Self::NotOnWatchlist,
      _ => Self::Unknown,
    }
  }

  pub fn as_wire(&self) -> &'static str {
    match self {
      Self::OnWatchlist => "on_watchlist",
      Self::NotOnWatchlist => "not_on_watchlist",
      Self::Unknown => "unknown",
    }
  }
}

// ─── Alert level ─────────────────────────────────────────────────────────────

/// Presentation severity derived from classification and watchlist status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
  High,
  Medium,
  Low,
  None,
}

// ─── Verdict ─────────────────────────────────────────────────────────────────

/// A populated classification result for one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
  /// Free-form label; canonically SCAM / SUSPICIOUS / LEGITIMATE / ERROR.
  pub classification:   String,
  /// Confidence tier as asserted by the backend (HIGH / MEDIUM / LOW / NONE).
  pub confidence:       String,
  /// Numeric confidence, when the backend provides one.
  pub confidence_score: Option<i64>,
  /// Free-text rationale; empty when the backend gave none.
  pub reason:           String,
  /// Risk in `[0, 1]`; `0.0` when the backend gave none.
  pub risk_score:       f64,
  pub detection_method: Option<String>,
  pub watchlist:        WatchlistStatus,
  /// When this verdict was received, client clock.
  pub analyzed_at:      DateTime<Utc>,
}

impl Verdict {
  /// The locally stored classification string is authoritative here; a
  /// server-asserted alert level is never consulted.
  pub fn is_scam(&self) -> bool {
    self.classification.eq_ignore_ascii_case("SCAM")
  }

  pub fn is_suspicious(&self) -> bool {
    self.classification.eq_ignore_ascii_case("SUSPICIOUS")
  }

  /// Severity for display. Watchlist membership forces `High`; unknown
  /// classification values degrade to `None` rather than erroring.
  pub fn alert_level(&self) -> AlertLevel {
    if self.is_scam() || self.watchlist == WatchlistStatus::OnWatchlist {
      AlertLevel::High
    } else if self.is_suspicious() {
      AlertLevel::Medium
    } else if self.classification.eq_ignore_ascii_case("LEGITIMATE") {
      AlertLevel::Low
    } else {
      AlertLevel::None
    }
  }
}
