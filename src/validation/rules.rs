//! Validation Rules
//!
//! A rule is either a free-form predicate that produces its own message, or a
//! boolean check paired with a fixed message.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::validation::validators;

type PredicateFn = dyn Fn(&Value) -> Option<String> + Send + Sync;
type CheckFn = dyn Fn(&Value) -> bool + Send + Sync;

// == Rule ==
#[derive(Clone)]
pub enum Rule {
    /// Returns `Some(message)` when the value is invalid.
    Predicate(Arc<PredicateFn>),
    /// Records `message` when `validator` returns false.
    Check {
        validator: Arc<CheckFn>,
        message: String,
    },
}

impl Rule {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        Rule::Predicate(Arc::new(f))
    }

    pub fn check<F>(validator: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Rule::Check {
            validator: Arc::new(validator),
            message: message.into(),
        }
    }

    /// Evaluates the rule, returning the error message if the value fails it.
    pub fn evaluate(&self, value: &Value) -> Option<String> {
        match self {
            Rule::Predicate(f) => f(value),
            Rule::Check { validator, message } => {
                if validator(value) {
                    None
                } else {
                    Some(message.clone())
                }
            }
        }
    }

    // == Built-in Shorthands ==
    pub fn required(message: impl Into<String>) -> Self {
        Self::check(validators::required, message)
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::check(validators::email, message)
    }

    pub fn phone(message: impl Into<String>) -> Self {
        Self::check(validators::phone, message)
    }

    pub fn cpf(message: impl Into<String>) -> Self {
        Self::check(validators::cpf, message)
    }

    pub fn number(message: impl Into<String>) -> Self {
        Self::check(validators::number, message)
    }

    pub fn date(message: impl Into<String>) -> Self {
        Self::check(validators::date, message)
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Self::check(move |v| validators::min_length(v, min), message)
    }

    pub fn max_length(max: usize, message: impl Into<String>) -> Self {
        Self::check(move |v| validators::max_length(v, max), message)
    }

    /// Compiles `source` up front; an invalid expression is a schema error.
    pub fn pattern(source: &str, message: impl Into<String>) -> Result<Self> {
        let re = Regex::new(source)
            .map_err(|e| CoreError::InvalidSchema(format!("bad pattern '{}': {}", source, e)))?;
        Ok(Self::check(move |v| validators::pattern(v, &re), message))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Predicate(_) => f.write_str("Rule::Predicate(..)"),
            Rule::Check { message, .. } => f
                .debug_struct("Rule::Check")
                .field("message", message)
                .finish(),
        }
    }
}

// == Schema ==
/// Ordered field → rule list mapping.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, Vec<Rule>)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`add`](Self::add).
    pub fn field(mut self, name: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.add(name, rules);
        self
    }

    /// Appends rules to `name`, keeping first-seen field order.
    pub fn add(&mut self, name: impl Into<String>, rules: Vec<Rule>) {
        let name = name.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, existing)) => existing.extend(rules),
            None => self.fields.push((name, rules)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.fields
            .iter()
            .map(|(name, rules)| (name.as_str(), rules.as_slice()))
    }
}
