//! Service Module
//!
//! Composes cache, retry, sanitization and validation over a [`RowStore`](crate::store::RowStore).
//!
//! # Read path
//! cache lookup → on miss, `select` under retry → cache fill
//!
//! # Write path
//! sanitize → validate (optional) → mutation under retry → invalidate the collection's cache keys

mod manager;

pub use manager::{DataCore, SharedCache, WriteOutcome};
