//! [`SqliteStore`] — the SQLite implementation of [`MessageStore`].

use std::{path::Path, sync::Arc};

use chrono::Utc;
use tokio::sync::watch;

use smish_core::{
  message::{AnalysisOutcome, Message},
  store::{ImportStats, MessageStore},
};

use crate::{
  Result,
  encode::{COLUMNS, encode_direction, encode_dt, read_raw},
  schema::SCHEMA,
};

/// The payload carried on the snapshot channel: the full message collection,
/// newest first, behind an `Arc` so subscribers clone cheaply.
pub type Snapshot = Arc<Vec<Message>>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A smish message store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted, and clones
/// share one snapshot channel.
#[derive(Clone)]
pub struct SqliteStore {
  conn:     tokio_rusqlite::Connection,
  snapshot: Arc<watch::Sender<Snapshot>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;

    let (tx, _) = watch::channel(Snapshot::default());
    let store = Self { conn, snapshot: Arc::new(tx) };

    // Seed the channel so late subscribers of a reopened store see current
    // contents rather than an empty placeholder.
    store.publish_snapshot().await?;
    Ok(store)
  }

  /// Subscribe to ordered full-collection snapshots. A fresh snapshot is
  /// published after every successful mutation.
  pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
    self.snapshot.subscribe()
  }

  async fn publish_snapshot(&self) -> Result<()> {
    let all = self.list_all().await?;
    self.snapshot.send_replace(Arc::new(all));
    Ok(())
  }

  async fn query_count(&self, sql: &'static str) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(move |conn| Ok(conn.query_row(sql, [], |r| r.get(0))?))
      .await?;
    Ok(n as u64)
  }

  async fn query_messages(
    &self,
    sql: String,
    limit: Option<usize>,
  ) -> Result<Vec<Message>> {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = if let Some(n) = limit {
          stmt
            .query_map(rusqlite::params![n as i64], |row| read_raw(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          stmt
            .query_map([], |row| read_raw(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(|r| r.into_message()).collect()
  }
}

// ─── MessageStore impl ───────────────────────────────────────────────────────

impl MessageStore for SqliteStore {
  type Error = crate::Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn import_batch(&self, messages: Vec<Message>) -> Result<ImportStats> {
    let total = messages.len() as u64;
    let rows: Vec<_> = messages
      .into_iter()
      .map(|m| {
        (
          m.id,
          m.sender,
          m.body,
          m.received_at,
          encode_direction(m.direction),
          m.is_read,
        )
      })
      .collect();

    let stats = self
      .conn
      .call(move |conn| {
        let before: i64 =
          conn.query_row("SELECT COUNT(*) FROM messages", [], |r| r.get(0))?;

        let tx = conn.transaction()?;
        for (id, sender, body, received_at, direction, is_read) in &rows {
          // Refresh only the source-of-truth fields on conflict; analysis
          // columns are untouched, so annotations never regress.
          tx.execute(
            "INSERT INTO messages
               (message_id, sender, body, received_at, direction, is_read)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(message_id) DO UPDATE SET
               sender      = excluded.sender,
               body        = excluded.body,
               received_at = excluded.received_at,
               is_read     = excluded.is_read",
            rusqlite::params![id, sender, body, received_at, direction, is_read],
          )?;
        }
        tx.commit()?;

        let after: i64 =
          conn.query_row("SELECT COUNT(*) FROM messages", [], |r| r.get(0))?;

        let inserted = (after - before) as u64;
        Ok(ImportStats { inserted, refreshed: total - inserted })
      })
      .await?;

    self.publish_snapshot().await?;
    Ok(stats)
  }

  async fn record_analysis(
    &self,
    id: i64,
    outcome: AnalysisOutcome,
  ) -> Result<()> {
    let changed = match outcome {
      AnalysisOutcome::Analyzed(v) => {
        let watchlist = v.watchlist.as_wire();
        let at = encode_dt(v.analyzed_at);
        self
          .conn
          .call(move |conn| {
            Ok(conn.execute(
              "UPDATE messages SET
                 analysis_state   = 'analyzed',
                 classification   = ?2,
                 confidence       = ?3,
                 confidence_score = ?4,
                 reason           = ?5,
                 risk_score       = ?6,
                 detection_method = ?7,
                 watchlist_status = ?8,
                 analyzed_at      = ?9,
                 failure_summary  = NULL
               WHERE message_id = ?1",
              rusqlite::params![
                id,
                v.classification,
                v.confidence,
                v.confidence_score,
                v.reason,
                v.risk_score,
                v.detection_method,
                watchlist,
                at,
              ],
            )?)
          })
          .await?
      }
      AnalysisOutcome::Failed(summary) => {
        let at = encode_dt(Utc::now());
        self
          .conn
          .call(move |conn| {
            Ok(conn.execute(
              "UPDATE messages SET
                 analysis_state   = 'failed',
                 failure_summary  = ?2,
                 analyzed_at      = ?3,
                 classification   = NULL,
                 confidence       = NULL,
                 confidence_score = NULL,
                 reason           = NULL,
                 risk_score       = NULL,
                 detection_method = NULL,
                 watchlist_status = NULL
               WHERE message_id = ?1",
              rusqlite::params![id, summary, at],
            )?)
          })
          .await?
      }
    };

    // Zero rows changed means the id vanished under us (concurrent clear).
    // That race is recoverable; there is nothing to report and no snapshot
    // to publish.
    if changed > 0 {
      self.publish_snapshot().await?;
    }
    Ok(())
  }

  async fn clear_all(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute("DELETE FROM messages", [])?;
        Ok(())
      })
      .await?;

    self.publish_snapshot().await?;
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn select_for_analysis(&self, limit: usize) -> Result<Vec<Message>> {
    self
      .query_messages(
        format!(
          "SELECT {COLUMNS} FROM messages
           WHERE direction = 'received' AND analysis_state = 'not_analyzed'
           ORDER BY is_read ASC, received_at DESC
           LIMIT ?1"
        ),
        Some(limit),
      )
      .await
  }

  async fn list_all(&self) -> Result<Vec<Message>> {
    self
      .query_messages(
        format!("SELECT {COLUMNS} FROM messages ORDER BY received_at DESC"),
        None,
      )
      .await
  }

  async fn list_scams(&self) -> Result<Vec<Message>> {
    self
      .query_messages(
        format!(
          "SELECT {COLUMNS} FROM messages
           WHERE analysis_state = 'analyzed' AND UPPER(classification) = 'SCAM'
           ORDER BY received_at DESC"
        ),
        None,
      )
      .await
  }

  async fn count(&self) -> Result<u64> {
    self.query_count("SELECT COUNT(*) FROM messages").await
  }

  async fn scam_count(&self) -> Result<u64> {
    self
      .query_count(
        "SELECT COUNT(*) FROM messages
         WHERE analysis_state = 'analyzed' AND UPPER(classification) = 'SCAM'",
      )
      .await
  }
}
