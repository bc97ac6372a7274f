//! The `Classifier` trait — one message in, one verdict out.
//!
//! Implemented by `smish-client` over HTTP; test code substitutes stubs.
//! The classifier is stateless: no cross-call state beyond transport
//! configuration, and no retries — retry policy belongs to the orchestrator.

use std::future::Future;

use crate::{error::ClassifyError, verdict::Verdict};

/// Result of a liveness probe. Probes never fail: every error collapses into
/// `reachable: false` with a human-readable summary.
#[derive(Debug, Clone)]
pub struct Health {
  pub reachable: bool,
  pub summary:   String,
}

/// A remote (or stubbed) scam classifier.
pub trait Classifier: Send + Sync {
  /// Classify one message's text and sender.
  fn classify<'a>(
    &'a self,
    body: &'a str,
    sender: &'a str,
  ) -> impl Future<Output = Result<Verdict, ClassifyError>> + Send + 'a;

  /// Lightweight liveness probe of the backing service.
  fn check_health(&self) -> impl Future<Output = Health> + Send + '_;
}
