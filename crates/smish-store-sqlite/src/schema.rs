//! SQL schema for the smish SQLite store.
//!
//! Executed once at connection startup. Future migrations are gated on
//! `PRAGMA user_version` and must stay additive — new columns are nullable —
//! so upgrading never destroys analysis history.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS messages (
    message_id       INTEGER PRIMARY KEY,  -- provider-assigned; never generated locally
    sender           TEXT    NOT NULL,
    body             TEXT    NOT NULL,
    received_at      INTEGER NOT NULL,     -- epoch millis from the provider
    direction        TEXT    NOT NULL,     -- 'received' | 'sent'
    is_read          INTEGER NOT NULL DEFAULT 1,

    -- Analysis annotations. State transitions out of 'not_analyzed' exactly
    -- once; the verdict columns are NULL unless state = 'analyzed', and
    -- failure_summary is NULL unless state = 'failed'.
    analysis_state   TEXT    NOT NULL DEFAULT 'not_analyzed',
    classification   TEXT,
    confidence       TEXT,
    confidence_score INTEGER,
    reason           TEXT,
    risk_score       REAL,
    detection_method TEXT,
    watchlist_status TEXT,
    analyzed_at      TEXT,                 -- RFC 3339 UTC; set for both terminal states
    failure_summary  TEXT
);

CREATE INDEX IF NOT EXISTS messages_received_idx ON messages(received_at);
CREATE INDEX IF NOT EXISTS messages_state_idx    ON messages(analysis_state, direction);

PRAGMA user_version = 1;
";
