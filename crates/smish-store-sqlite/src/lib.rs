//! SQLite backend for the smish message store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. Every successful mutation
//! publishes a fresh ordered snapshot on a watch channel for subscribers.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{Snapshot, SqliteStore};

#[cfg(test)]
mod tests;
