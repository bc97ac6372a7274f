//! [`Importer`] — reconciles the external message source into the store.
//!
//! Import is full-history: every record the source exposes is offered to the
//! store, and the store's upsert keeps the operation idempotent. Bounding
//! work per analysis run is the selector's job (unread first, newest first),
//! not the importer's. Callers that do want a window pass `since` explicitly.

use std::sync::Arc;

use smish_core::{source::MessageSource, store::MessageStore};

use crate::error::ImportError;

/// What one import run did, for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
  /// Records the source handed back.
  pub fetched:        usize,
  /// Records that validated and were offered to the store.
  pub imported:       usize,
  /// Malformed records dropped with a warning.
  pub skipped:        usize,
  pub inserted:       u64,
  pub refreshed:      u64,
  pub total_in_store: u64,
  pub known_scams:    u64,
}

pub struct Importer<S, M> {
  store:  Arc<S>,
  source: M,
}

impl<S, M> Importer<S, M>
where
  S: MessageStore,
  M: MessageSource,
{
  pub fn new(store: Arc<S>, source: M) -> Self { Self { store, source } }

  /// Pull the current message set from the source and reconcile it into the
  /// store.
  ///
  /// Individual malformed records are skipped and counted; only a source
  /// that cannot be queried at all aborts the import. `since` is an optional
  /// epoch-millis lower bound on `received_at`.
  pub async fn import(
    &self,
    since: Option<i64>,
  ) -> Result<ImportReport, ImportError> {
    let raw = self.source.fetch().await?;
    let fetched = raw.len();

    let mut messages = Vec::with_capacity(fetched);
    let mut skipped = 0usize;

    for record in raw {
      match record.validate() {
        Ok(m) => {
          if since.is_none_or(|cutoff| m.received_at >= cutoff) {
            messages.push(m);
          }
        }
        Err(e) => {
          skipped += 1;
          tracing::warn!(error = %e, "skipping malformed source record");
        }
      }
    }

    let imported = messages.len();
    let stats = self
      .store
      .import_batch(messages)
      .await
      .map_err(storage)?;
    let total_in_store = self.store.count().await.map_err(storage)?;
    let known_scams = self.store.scam_count().await.map_err(storage)?;

    tracing::info!(
      fetched,
      imported,
      skipped,
      inserted = stats.inserted,
      "import complete"
    );

    Ok(ImportReport {
      fetched,
      imported,
      skipped,
      inserted: stats.inserted,
      refreshed: stats.refreshed,
      total_in_store,
      known_scams,
    })
  }
}

fn storage(e: impl std::error::Error) -> ImportError {
  ImportError::Storage(e.to_string())
}
