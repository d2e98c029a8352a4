//! Validation Module
//!
//! Declarative per-field rules evaluated into a field → message report.
//! Validation failures are data, never errors.

mod engine;
mod rules;
mod spec;
pub mod validators;

pub use engine::{MessagePolicy, ValidationResult, Validator, MESSAGE_SEPARATOR};
pub use rules::{Rule, Schema};
pub use spec::{RuleSpec, SchemaSpec};
