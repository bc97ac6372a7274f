//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::Utc;
use smish_core::{
  message::{AnalysisOutcome, AnalysisState, Direction, Message},
  store::MessageStore,
  verdict::{Verdict, WatchlistStatus},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn received(id: i64, sender: &str, body: &str, at: i64) -> Message {
  Message {
    id,
    sender: sender.into(),
    body: body.into(),
    received_at: at,
    direction: Direction::Received,
    is_read: true,
    analysis: AnalysisState::NotAnalyzed,
  }
}

fn sent(id: i64, at: i64) -> Message {
  Message { direction: Direction::Sent, ..received(id, "+me", "out", at) }
}

fn verdict(classification: &str) -> Verdict {
  Verdict {
    classification:   classification.into(),
    confidence:       "HIGH".into(),
    confidence_score: Some(87),
    reason:           "looks bad".into(),
    risk_score:       0.9,
    detection_method: Some("llm".into()),
    watchlist:        WatchlistStatus::NotOnWatchlist,
    analyzed_at:      Utc::now(),
  }
}

// ─── Import ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn import_and_count() {
  let s = store().await;

  let stats = s
    .import_batch(vec![received(1, "+100", "Hi", 1000)])
    .await
    .unwrap();

  assert_eq!(stats.inserted, 1);
  assert_eq!(stats.refreshed, 0);
  assert_eq!(s.count().await.unwrap(), 1);

  let batch = s.select_for_analysis(10).await.unwrap();
  assert_eq!(batch.len(), 1);
  assert_eq!(batch[0].id, 1);
}

#[tokio::test]
async fn import_is_idempotent() {
  let s = store().await;
  let batch = vec![
    received(1, "+100", "a", 1000),
    received(2, "+200", "b", 2000),
  ];

  s.import_batch(batch.clone()).await.unwrap();
  let stats = s.import_batch(batch).await.unwrap();

  assert_eq!(stats.inserted, 0);
  assert_eq!(stats.refreshed, 2);
  assert_eq!(s.count().await.unwrap(), 2);
}

#[tokio::test]
async fn reimport_refreshes_source_fields() {
  let s = store().await;
  s.import_batch(vec![received(1, "+100", "old body", 1000)])
    .await
    .unwrap();

  let mut updated = received(1, "+999", "new body", 1500);
  updated.is_read = false;
  s.import_batch(vec![updated]).await.unwrap();

  let all = s.list_all().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].sender, "+999");
  assert_eq!(all[0].body, "new body");
  assert_eq!(all[0].received_at, 1500);
  assert!(!all[0].is_read);
}

#[tokio::test]
async fn reimport_never_regresses_analysis() {
  let s = store().await;
  s.import_batch(vec![received(1, "+100", "win big", 1000)])
    .await
    .unwrap();
  s.record_analysis(1, AnalysisOutcome::Analyzed(verdict("SCAM")))
    .await
    .unwrap();

  // Re-import the same id with changed body and sender.
  s.import_batch(vec![received(1, "+changed", "edited", 2000)])
    .await
    .unwrap();

  let all = s.list_all().await.unwrap();
  assert_eq!(all[0].body, "edited");
  let v = all[0].analysis.verdict().expect("verdict preserved");
  assert_eq!(v.classification, "SCAM");
  assert_eq!(s.scam_count().await.unwrap(), 1);

  // Same for a failed annotation.
  s.import_batch(vec![received(2, "+2", "x", 3000)]).await.unwrap();
  s.record_analysis(2, AnalysisOutcome::Failed("timeout".into()))
    .await
    .unwrap();
  s.import_batch(vec![received(2, "+2", "y", 3000)]).await.unwrap();

  let all = s.list_all().await.unwrap();
  let m2 = all.iter().find(|m| m.id == 2).unwrap();
  assert!(matches!(
    &m2.analysis,
    AnalysisState::Failed { summary, .. } if summary == "timeout"
  ));
}

// ─── Selection ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn selection_skips_sent_messages() {
  let s = store().await;
  s.import_batch(vec![received(1, "+1", "in", 1000), sent(2, 2000)])
    .await
    .unwrap();

  let batch = s.select_for_analysis(10).await.unwrap();
  assert_eq!(batch.len(), 1);
  assert_eq!(batch[0].id, 1);
}

#[tokio::test]
async fn selection_orders_unread_first_then_newest() {
  let s = store().await;
  let mut unread_old = received(1, "+1", "a", 1000);
  unread_old.is_read = false;
  let mut unread_new = received(2, "+2", "b", 2000);
  unread_new.is_read = false;
  let read_newest = received(3, "+3", "c", 3000);

  s.import_batch(vec![read_newest, unread_old, unread_new])
    .await
    .unwrap();

  let batch = s.select_for_analysis(10).await.unwrap();
  let ids: Vec<_> = batch.iter().map(|m| m.id).collect();
  assert_eq!(ids, vec![2, 1, 3]);
}

#[tokio::test]
async fn selection_respects_limit() {
  let s = store().await;
  let batch: Vec<_> = (1..=8).map(|i| received(i, "+1", "m", i * 10)).collect();
  s.import_batch(batch).await.unwrap();

  assert_eq!(s.select_for_analysis(3).await.unwrap().len(), 3);
}

#[tokio::test]
async fn selection_excludes_processed_messages() {
  let s = store().await;
  s.import_batch(vec![
    received(1, "+1", "a", 1000),
    received(2, "+2", "b", 2000),
    received(3, "+3", "c", 3000),
  ])
  .await
  .unwrap();

  s.record_analysis(3, AnalysisOutcome::Analyzed(verdict("LEGITIMATE")))
    .await
    .unwrap();
  s.record_analysis(2, AnalysisOutcome::Failed("boom".into()))
    .await
    .unwrap();

  // Without an intervening record_analysis or clear, repeated selection
  // returns the same remaining id — and never the processed ones.
  let batch = s.select_for_analysis(10).await.unwrap();
  assert_eq!(batch.len(), 1);
  assert_eq!(batch[0].id, 1);

  let again = s.select_for_analysis(10).await.unwrap();
  assert_eq!(again.len(), 1);
  assert_eq!(again[0].id, 1);
}

// ─── Recording ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn recorded_verdict_roundtrips() {
  let s = store().await;
  s.import_batch(vec![received(1, "+1", "win $1000", 1000)])
    .await
    .unwrap();
  s.record_analysis(1, AnalysisOutcome::Analyzed(verdict("SCAM")))
    .await
    .unwrap();

  let all = s.list_all().await.unwrap();
  let v = all[0].analysis.verdict().unwrap();
  assert_eq!(v.classification, "SCAM");
  assert_eq!(v.confidence, "HIGH");
  assert_eq!(v.confidence_score, Some(87));
  assert_eq!(v.reason, "looks bad");
  assert!((v.risk_score - 0.9).abs() < 1e-9);
  assert_eq!(v.detection_method.as_deref(), Some("llm"));
  assert_eq!(v.watchlist, WatchlistStatus::NotOnWatchlist);
}

#[tokio::test]
async fn record_for_missing_id_is_a_noop() {
  let s = store().await;
  s.record_analysis(42, AnalysisOutcome::Analyzed(verdict("SCAM")))
    .await
    .unwrap();
  assert_eq!(s.count().await.unwrap(), 0);
  assert_eq!(s.scam_count().await.unwrap(), 0);
}

#[tokio::test]
async fn scam_count_is_case_insensitive() {
  let s = store().await;
  s.import_batch(vec![
    received(1, "+1", "a", 1000),
    received(2, "+2", "b", 2000),
    received(3, "+3", "c", 3000),
  ])
  .await
  .unwrap();

  s.record_analysis(1, AnalysisOutcome::Analyzed(verdict("SCAM")))
    .await
    .unwrap();
  s.record_analysis(2, AnalysisOutcome::Analyzed(verdict("scam")))
    .await
    .unwrap();
  s.record_analysis(3, AnalysisOutcome::Analyzed(verdict("LEGITIMATE")))
    .await
    .unwrap();

  assert_eq!(s.scam_count().await.unwrap(), 2);
  assert_eq!(s.list_scams().await.unwrap().len(), 2);
}

#[tokio::test]
async fn failed_annotation_does_not_count_as_scam() {
  let s = store().await;
  s.import_batch(vec![received(1, "+1", "a", 1000)]).await.unwrap();
  s.record_analysis(1, AnalysisOutcome::Failed("connect timeout".into()))
    .await
    .unwrap();

  assert_eq!(s.scam_count().await.unwrap(), 0);
  let all = s.list_all().await.unwrap();
  assert!(matches!(
    &all[0].analysis,
    AnalysisState::Failed { summary, .. } if summary == "connect timeout"
  ));
}

// ─── Clear ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn clear_all_resets_counts() {
  let s = store().await;
  s.import_batch(vec![received(1, "+1", "a", 1000), received(2, "+2", "b", 2000)])
    .await
    .unwrap();
  s.record_analysis(1, AnalysisOutcome::Analyzed(verdict("SCAM")))
    .await
    .unwrap();

  s.clear_all().await.unwrap();

  assert_eq!(s.count().await.unwrap(), 0);
  assert_eq!(s.scam_count().await.unwrap(), 0);
  assert!(s.list_all().await.unwrap().is_empty());
}

// ─── Snapshots ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn mutations_publish_ordered_snapshots() {
  let s = store().await;
  let mut rx = s.subscribe();

  s.import_batch(vec![received(1, "+1", "a", 1000), received(2, "+2", "b", 2000)])
    .await
    .unwrap();

  assert!(rx.has_changed().unwrap());
  let snap = rx.borrow_and_update().clone();
  let ids: Vec<_> = snap.iter().map(|m| m.id).collect();
  assert_eq!(ids, vec![2, 1]); // newest first

  s.clear_all().await.unwrap();
  assert!(rx.has_changed().unwrap());
  assert!(rx.borrow_and_update().is_empty());
}
