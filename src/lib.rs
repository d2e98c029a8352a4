//! Back-office data core
//!
//! Caching, retry, sanitization and validation in front of a row store,
//! exposed over a small HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod retry;
pub mod sanitize;
pub mod service;
pub mod store;
pub mod tasks;
pub mod validation;

pub use api::AppState;
pub use config::Config;
pub use error::{CoreError, Result};
pub use service::{DataCore, WriteOutcome};
pub use tasks::spawn_cleanup_task;
