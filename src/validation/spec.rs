//! Declarative Rule Specs
//!
//! Serializable description of a schema so rules can travel as JSON, e.g.
//!
//! ```json
//! { "nome": [ { "rule": "required", "message": "Nome é obrigatório" },
//!             { "rule": "min_length", "min": 3, "message": "Nome muito curto" } ] }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation::{Rule, Schema};

// == Rule Spec ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleSpec {
    Required { message: String },
    Email { message: String },
    Phone { message: String },
    Cpf { message: String },
    Number { message: String },
    Date { message: String },
    MinLength { min: usize, message: String },
    MaxLength { max: usize, message: String },
    Pattern { regex: String, message: String },
}

impl RuleSpec {
    pub fn compile(&self) -> Result<Rule> {
        let rule = match self {
            RuleSpec::Required { message } => Rule::required(message.as_str()),
            RuleSpec::Email { message } => Rule::email(message.as_str()),
            RuleSpec::Phone { message } => Rule::phone(message.as_str()),
            RuleSpec::Cpf { message } => Rule::cpf(message.as_str()),
            RuleSpec::Number { message } => Rule::number(message.as_str()),
            RuleSpec::Date { message } => Rule::date(message.as_str()),
            RuleSpec::MinLength { min, message } => Rule::min_length(*min, message.as_str()),
            RuleSpec::MaxLength { max, message } => Rule::max_length(*max, message.as_str()),
            RuleSpec::Pattern { regex, message } => Rule::pattern(regex, message.as_str())?,
        };
        Ok(rule)
    }
}

// == Schema Spec ==
/// field → rule specs. Fields compile in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaSpec(pub BTreeMap<String, Vec<RuleSpec>>);

impl SchemaSpec {
    pub fn compile(&self) -> Result<Schema> {
        let mut schema = Schema::new();
        for (field, specs) in &self.0 {
            let rules = specs
                .iter()
                .map(RuleSpec::compile)
                .collect::<Result<Vec<_>>>()?;
            schema.add(field.as_str(), rules);
        }
        Ok(schema)
    }
}
