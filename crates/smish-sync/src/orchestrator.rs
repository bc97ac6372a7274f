//! [`Orchestrator`] — drives a bounded batch of unanalyzed messages through
//! the classifier and reconciles verdicts back into the store.
//!
//! Messages are classified strictly sequentially, in store order. The remote
//! classifier may be a resource-constrained local LLM; fanning out would
//! defeat its queuing and make "message i of N" progress meaningless.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use tokio::sync::watch;

use smish_core::{
  classify::Classifier, message::AnalysisOutcome, store::MessageStore,
};

// ─── State machine ───────────────────────────────────────────────────────────

/// Aggregate result of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
  pub selected:    usize,
  pub processed:   usize,
  /// Scam verdicts produced by this run.
  pub new_scams:   u64,
  /// Scam count across the whole store after the run.
  pub total_scams: u64,
}

/// The orchestrator's single published state. One tagged variant instead of
/// independent is-loading/is-analyzing flags, so inconsistent combinations
/// cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
  Idle,
  Running { index: usize, total: usize },
  Completed(RunSummary),
  Failed(String),
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

pub struct Orchestrator<S, C> {
  store:      Arc<S>,
  classifier: Arc<C>,
  state:      watch::Sender<RunState>,
  active:     AtomicBool,
}

impl<S, C> Orchestrator<S, C>
where
  S: MessageStore,
  C: Classifier,
{
  pub fn new(store: Arc<S>, classifier: Arc<C>) -> Self {
    let (state, _) = watch::channel(RunState::Idle);
    Self {
      store,
      classifier,
      state,
      active: AtomicBool::new(false),
    }
  }

  /// Subscribe to state updates. Progress is published after every message
  /// and once more with the terminal state.
  pub fn subscribe(&self) -> watch::Receiver<RunState> {
    self.state.subscribe()
  }

  /// The currently published state.
  pub fn state(&self) -> RunState { self.state.borrow().clone() }

  /// Run one analysis batch over up to `limit` messages.
  ///
  /// At most one run is active at a time; a trigger while a run is in
  /// progress is a no-op that returns the in-progress state — neither queued
  /// nor an error.
  pub async fn analyze_batch(&self, limit: usize) -> RunState {
    if self.active.swap(true, Ordering::SeqCst) {
      return self.state();
    }

    let final_state = self.run(limit).await;
    self.state.send_replace(final_state.clone());
    self.active.store(false, Ordering::SeqCst);
    final_state
  }

  async fn run(&self, limit: usize) -> RunState {
    // Failure to even obtain the batch is batch-fatal.
    let batch = match self.store.select_for_analysis(limit).await {
      Ok(batch) => batch,
      Err(e) => {
        tracing::error!(error = %e, "could not select analysis batch");
        return RunState::Failed(format!("could not select batch: {e}"));
      }
    };

    if batch.is_empty() {
      // Nothing to do; still report the store-wide scam total.
      let total_scams = self.store.scam_count().await.unwrap_or(0);
      return RunState::Completed(RunSummary {
        total_scams,
        ..RunSummary::default()
      });
    }

    let total = batch.len();
    self.state.send_replace(RunState::Running { index: 0, total });

    let mut new_scams = 0u64;
    let mut processed = 0usize;

    for (i, message) in batch.iter().enumerate() {
      let outcome = match self
        .classifier
        .classify(&message.body, &message.sender)
        .await
      {
        Ok(verdict) => {
          if verdict.is_scam() {
            new_scams += 1;
          }
          AnalysisOutcome::Analyzed(verdict)
        }
        Err(e) => {
          // Still marks the message processed, so the next automatic run
          // does not retry a systematically failing message.
          tracing::warn!(id = message.id, error = %e, "classification failed");
          AnalysisOutcome::Failed(e.to_string())
        }
      };

      if let Err(e) = self.store.record_analysis(message.id, outcome).await {
        tracing::error!(id = message.id, error = %e, "storage failure mid-batch");
        return RunState::Failed(format!(
          "storage failure while recording analysis: {e}"
        ));
      }

      processed += 1;
      self.state.send_replace(RunState::Running { index: i + 1, total });
    }

    let total_scams = self.store.scam_count().await.unwrap_or(0);
    RunState::Completed(RunSummary {
      selected: total,
      processed,
      new_scams,
      total_scams,
    })
  }
}
