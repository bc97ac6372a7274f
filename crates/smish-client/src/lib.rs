//! HTTP client for the remote scam-classification backend.
//!
//! Implements [`smish_core::classify::Classifier`] over the backend's
//! `POST /analyze` + `GET /health` surface. The client is stateless and
//! retry-free; every failure maps into the typed
//! [`ClassifyError`](smish_core::ClassifyError) taxonomy for the
//! orchestrator to handle.

mod client;
mod wire;

pub use client::{AnalysisClient, ClientConfig};
