//! SQLite backend for the claimdesk store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! connection thread without blocking the async runtime. Because every call
//! is serialised on that thread, multi-statement operations (claim-number
//! assignment, cascading deletes, report persistence) run inside a single
//! call and a single transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
