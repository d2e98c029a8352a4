//! Validation Engine
//!
//! Runs a [`Schema`] against a record and reports per-field messages.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{Rule, Schema};

/// Separator used when several messages are kept for one field.
pub const MESSAGE_SEPARATOR: &str = "; ";

// == Message Policy ==
/// Which message survives when several rules fail for the same field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessagePolicy {
    /// Every rule runs; the last failing rule's message is kept.
    #[default]
    LastWins,
    /// Stops at the first failing rule for the field.
    FirstWins,
    /// Every failing message, joined with [`MESSAGE_SEPARATOR`].
    CollectAll,
}

impl FromStr for MessagePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last" | "last_wins" => Ok(MessagePolicy::LastWins),
            "first" | "first_wins" => Ok(MessagePolicy::FirstWins),
            "all" | "collect_all" => Ok(MessagePolicy::CollectAll),
            other => Err(format!("unknown message policy '{}'", other)),
        }
    }
}

// == Validation Result ==
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// field → message
    pub errors: BTreeMap<String, String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: BTreeMap::new(),
        }
    }

    fn from_errors(errors: BTreeMap<String, String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

// == Validator ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    enabled: bool,
    policy: MessagePolicy,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(true, MessagePolicy::LastWins)
    }
}

impl Validator {
    /// # Arguments
    /// * `enabled` - When false, every call to `validate` reports valid without evaluating
    /// * `policy` - Message retention when several rules fail on one field
    pub fn new(enabled: bool, policy: MessagePolicy) -> Self {
        Self { enabled, policy }
    }

    /// Evaluates every schema field against `data`.
    ///
    /// Fields missing from `data` (or a non-object `data`) are checked as null.
    pub fn validate(&self, data: &Value, schema: &Schema) -> ValidationResult {
        if !self.enabled {
            return ValidationResult::ok();
        }

        let mut errors = BTreeMap::new();
        for (field, rules) in schema.iter() {
            let value = data.get(field).unwrap_or(&Value::Null);
            if let Some(message) = self.evaluate_field(value, rules) {
                errors.insert(field.to_string(), message);
            }
        }
        ValidationResult::from_errors(errors)
    }

    fn evaluate_field(&self, value: &Value, rules: &[Rule]) -> Option<String> {
        match self.policy {
            MessagePolicy::FirstWins => rules.iter().find_map(|rule| rule.evaluate(value)),
            MessagePolicy::LastWins => rules.iter().filter_map(|rule| rule.evaluate(value)).last(),
            MessagePolicy::CollectAll => {
                let messages: Vec<String> =
                    rules.iter().filter_map(|rule| rule.evaluate(value)).collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join(MESSAGE_SEPARATOR))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn employee_schema() -> Schema {
        Schema::new()
            .field(
                "nome",
                vec![
                    Rule::required("Nome é obrigatório"),
                    Rule::min_length(3, "Nome muito curto"),
                ],
            )
            .field("cpf", vec![Rule::cpf("CPF inválido")])
            .field("email", vec![Rule::email("Email inválido")])
    }

    #[test]
    fn test_valid_record() {
        let data = json!({"nome": "Maria", "cpf": "111.444.777-35", "email": "maria@loja.com"});
        let result = Validator::default().validate(&data, &employee_schema());
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_invalid_record_reports_each_field() {
        let data = json!({"nome": "Jo", "cpf": "12345678900"});
        let result = Validator::default().validate(&data, &employee_schema());

        assert!(!result.valid);
        assert_eq!(result.errors["nome"], "Nome muito curto");
        assert_eq!(result.errors["cpf"], "CPF inválido");
        assert_eq!(result.errors["email"], "Email inválido");
    }

    #[test]
    fn test_last_message_wins() {
        let data = json!({"nome": ""});
        let result = Validator::default().validate(&data, &employee_schema());
        assert_eq!(result.errors["nome"], "Nome muito curto");
    }

    #[test]
    fn test_first_message_wins() {
        let data = json!({"nome": ""});
        let result = Validator::new(true, MessagePolicy::FirstWins)
            .validate(&data, &employee_schema());
        assert_eq!(result.errors["nome"], "Nome é obrigatório");
    }

    #[test]
    fn test_collect_all_messages() {
        let data = json!({"nome": ""});
        let result = Validator::new(true, MessagePolicy::CollectAll)
            .validate(&data, &employee_schema());
        assert_eq!(
            result.errors["nome"],
            "Nome é obrigatório; Nome muito curto"
        );
    }

    #[test]
    fn test_last_wins_runs_every_rule() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let schema = Schema::new().field(
            "x",
            vec![
                Rule::required("first"),
                Rule::predicate(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    None
                }),
            ],
        );

        Validator::default().validate(&json!({}), &schema);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disabled_always_valid() {
        let data = json!({"nome": "", "cpf": "0"});
        let result = Validator::new(false, MessagePolicy::LastWins)
            .validate(&data, &employee_schema());
        assert_eq!(result, ValidationResult::ok());
    }

    #[test]
    fn test_disabled_skips_evaluation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let schema = Schema::new().field(
            "x",
            vec![Rule::predicate(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Some("bad".to_string())
            })],
        );

        let result = Validator::new(false, MessagePolicy::LastWins).validate(&json!({}), &schema);
        assert!(result.valid);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_non_object_data_checks_null() {
        let schema = Schema::new().field("nome", vec![Rule::required("obrigatório")]);
        let result = Validator::default().validate(&json!("texto"), &schema);
        assert_eq!(result.errors["nome"], "obrigatório");
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("last".parse::<MessagePolicy>(), Ok(MessagePolicy::LastWins));
        assert_eq!("FIRST".parse::<MessagePolicy>(), Ok(MessagePolicy::FirstWins));
        assert_eq!("collect_all".parse::<MessagePolicy>(), Ok(MessagePolicy::CollectAll));
        assert!("sometimes".parse::<MessagePolicy>().is_err());
    }
}
