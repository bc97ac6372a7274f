//! [`AnalysisClient`] — the reqwest transport for the classification backend.

use std::time::Duration;

use chrono::Utc;
use smish_core::{
  classify::{Classifier, Health},
  error::ClassifyError,
  verdict::Verdict,
};

use crate::wire::{AnalyzeRequest, AnalyzeResponse};

// ─── Config ──────────────────────────────────────────────────────────────────

/// Connection settings for the backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url:        String,
  pub connect_timeout: Duration,
  /// Whole-request deadline. Generous because the backend may be waiting on
  /// a local LLM to finish an inference.
  pub request_timeout: Duration,
}

impl ClientConfig {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url:        base_url.into(),
      connect_timeout: Duration::from_secs(30),
      request_timeout: Duration::from_secs(60),
    }
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// HTTP client for the scam-classification backend.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct AnalysisClient {
  client: reqwest::Client,
  config: ClientConfig,
}

impl AnalysisClient {
  pub fn new(config: ClientConfig) -> reqwest::Result<Self> {
    let client = reqwest::Client::builder()
      .connect_timeout(config.connect_timeout)
      .timeout(config.request_timeout)
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }
}

impl Classifier for AnalysisClient {
  /// `POST /analyze`
  async fn classify<'a>(
    &'a self,
    body: &'a str,
    sender: &'a str,
  ) -> Result<Verdict, ClassifyError> {
    let request = AnalyzeRequest {
      message:   body,
      sender,
      timestamp: Utc::now().timestamp_millis(),
    };

    let response = self
      .client
      .post(self.url("/analyze"))
      .json(&request)
      .send()
      .await
      .map_err(|e| ClassifyError::Network { detail: e.to_string() })?;

    let status = response.status();
    if !status.is_success() {
      let detail = response.text().await.unwrap_or_default();
      return Err(ClassifyError::ServerRejected {
        status: status.as_u16(),
        detail,
      });
    }

    // Read the body fully before decoding so a mid-read timeout is reported
    // as a network failure, not a schema mismatch.
    let raw = response
      .text()
      .await
      .map_err(|e| ClassifyError::Network { detail: e.to_string() })?;

    let parsed: AnalyzeResponse = serde_json::from_str(&raw)
      .map_err(|e| ClassifyError::MalformedResponse { detail: e.to_string() })?;

    tracing::debug!(
      classification = %parsed.classification,
      confidence = %parsed.confidence,
      "backend verdict received"
    );

    Ok(parsed.into_verdict(Utc::now()))
  }

  /// `GET /health` — never fails; any error collapses into `reachable: false`.
  async fn check_health(&self) -> Health {
    let response = match self.client.get(self.url("/health")).send().await {
      Ok(r) => r,
      Err(e) => {
        return Health {
          reachable: false,
          summary:   format!("offline: {e}"),
        };
      }
    };

    if !response.status().is_success() {
      return Health {
        reachable: false,
        summary:   format!("server error: {}", response.status()),
      };
    }

    // Any body shape is tolerated; pick out the status fields when present.
    let body: serde_json::Value =
      response.json().await.unwrap_or(serde_json::Value::Null);

    let mut summary = String::from("connected");
    if let Some(status) = body
      .get("ollama_status")
      .or_else(|| body.get("status"))
      .and_then(|v| v.as_str())
    {
      summary.push_str(&format!(" ({status}"));
      if let Some(model) = body
        .get("current_model")
        .or_else(|| body.get("model"))
        .and_then(|v| v.as_str())
      {
        summary.push_str(&format!(", model {model}"));
      }
      summary.push(')');
    }

    Health { reachable: true, summary }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
