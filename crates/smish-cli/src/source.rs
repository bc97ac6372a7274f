//! [`JsonFileSource`] — a `MessageSource` backed by a JSON export file.
//!
//! The desktop stand-in for the device SMS provider: the file holds an array
//! of raw provider rows, every field optional, e.g.
//!
//! ```json
//! [{"id": 1, "sender": "+15550100", "body": "hi",
//!   "received_at": 1700000000000, "kind": 1, "is_read": false}]
//! ```
//!
//! Rows with missing fields still parse — the importer decides per record
//! whether to skip. Only an unreadable or structurally invalid file counts
//! as the source being unavailable.

use std::path::PathBuf;

use smish_core::{
  error::SourceError,
  source::{MessageSource, RawMessage},
};

pub struct JsonFileSource {
  path: PathBuf,
}

impl JsonFileSource {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
}

impl MessageSource for JsonFileSource {
  async fn fetch(&self) -> Result<Vec<RawMessage>, SourceError> {
    let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
      SourceError::Unavailable {
        detail: format!("cannot read {}: {e}", self.path.display()),
      }
    })?;

    serde_json::from_str(&raw).map_err(|e| SourceError::Unavailable {
      detail: format!("cannot parse {}: {e}", self.path.display()),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn fetch_parses_rows_with_missing_fields() {
    let path = std::env::temp_dir().join("smish-json-source-test.json");
    tokio::fs::write(
      &path,
      r#"[{"id": 1, "sender": "+1", "body": "hi", "received_at": 1000, "kind": 1},
          {"body": "row with no id"}]"#,
    )
    .await
    .unwrap();

    let rows = JsonFileSource::new(path.clone()).fetch().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, Some(1));
    assert_eq!(rows[1].id, None);

    tokio::fs::remove_file(&path).await.ok();
  }

  #[tokio::test]
  async fn missing_file_is_source_unavailable() {
    let err = JsonFileSource::new("/nonexistent/smish-export.json")
      .fetch()
      .await
      .unwrap_err();
    assert!(matches!(err, SourceError::Unavailable { .. }));
  }
}
