//! Core types and trait definitions for the smish message cache.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod classify;
pub mod error;
pub mod message;
pub mod source;
pub mod store;
pub mod verdict;

pub use error::{ClassifyError, InvalidRecord, SourceError};
