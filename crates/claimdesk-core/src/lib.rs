//! Core types and trait definitions for claimdesk.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! storage backend (`claimdesk-store-sqlite`), the language-model client
//! (`claimdesk-llm`) and the JSON API (`claimdesk-api`) all build on the
//! traits defined here.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
#![allow(async_fn_in_trait)]

pub mod account;
pub mod claim;
pub mod completion;
pub mod error;
pub mod methodology;
pub mod number;
pub mod prompt;
pub mod report;
pub mod store;

pub use error::{Error, Result};
