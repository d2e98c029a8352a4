//! Retry Module
//!
//! Runs fallible async operations with bounded attempts and linear backoff.

mod executor;

pub use executor::{execute_with_retry, RetryPolicy};
