//! Built-in Validators
//!
//! Pure predicates over JSON values. Each returns `true` when the value is valid.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// == Coercion ==
/// String form of a value as used by length and digit checks.
///
/// Strings are taken as-is, null becomes empty and everything else uses its
/// JSON text.
pub fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn digits(value: &Value) -> Vec<u32> {
    as_text(value)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect()
}

// == Email ==
pub fn email(value: &Value) -> bool {
    value.as_str().map(|s| EMAIL.is_match(s)).unwrap_or(false)
}

// == Phone ==
/// Brazilian phone: 10 digits (landline) or 11 digits (mobile), punctuation ignored.
pub fn phone(value: &Value) -> bool {
    matches!(digits(value).len(), 10 | 11)
}

// == CPF ==
/// Brazilian individual taxpayer number (CPF) with both mod-11 check digits.
pub fn cpf(value: &Value) -> bool {
    let d = digits(value);
    if d.len() != 11 {
        return false;
    }
    if d.iter().all(|&x| x == d[0]) {
        return false;
    }

    let check = |len: usize| -> u32 {
        let weight_start = len as u32 + 1;
        let sum: u32 = d[..len]
            .iter()
            .enumerate()
            .map(|(i, &x)| x * (weight_start - i as u32))
            .sum();
        let remainder = (sum * 10) % 11;
        if remainder == 10 || remainder == 11 {
            0
        } else {
            remainder
        }
    };

    check(9) == d[9] && check(10) == d[10]
}

// == Number ==
/// Numbers and numeric strings. The empty string is rejected; a blank
/// string counts as zero. Infinities are rejected.
pub fn number(value: &Value) -> bool {
    match value {
        Value::Number(_) | Value::Bool(_) => true,
        Value::String(s) if s.is_empty() => false,
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.is_empty() || trimmed.parse::<f64>().map(|n| n.is_finite()).unwrap_or(false)
        }
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

// == Date ==
/// Anything that parses to a real point in time.
///
/// Accepts RFC 3339, ISO dates and datetimes with `T` or a space, `MM/DD/YYYY`,
/// and numeric millisecond timestamps.
pub fn date(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().map(f64::is_finite).unwrap_or(false),
        Value::String(s) => parse_date(s.trim()),
        _ => false,
    }
}

fn parse_date(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_rfc2822(s).is_ok()
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
        || DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(s, fmt).is_ok())
}

// == Required ==
pub fn required(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

// == Length ==
pub fn min_length(value: &Value, min: usize) -> bool {
    as_text(value).chars().count() >= min
}

pub fn max_length(value: &Value, max: usize) -> bool {
    as_text(value).chars().count() <= max
}

// == Pattern ==
/// Matches the value's text against a caller-compiled expression.
pub fn pattern(value: &Value, re: &Regex) -> bool {
    re.is_match(&as_text(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_email() {
        assert!(email(&json!("ana@loja.com.br")));
        assert!(!email(&json!("ana@loja")));
        assert!(!email(&json!("ana silva@loja.com")));
        assert!(!email(&json!(42)));
    }

    #[test]
    fn test_phone() {
        assert!(phone(&json!("(11) 3333-4444")));
        assert!(phone(&json!("(11) 98888-7777")));
        assert!(phone(&json!(11988887777u64)));
        assert!(!phone(&json!("9888-7777")));
        assert!(!phone(&json!("+55 (11) 98888-7777")));
    }

    #[test]
    fn test_cpf_valid() {
        assert!(cpf(&json!("11144477735")));
        assert!(cpf(&json!("111.444.777-35")));
        assert!(cpf(&json!("52998224725")));
    }

    #[test]
    fn test_cpf_repeated_digits() {
        assert!(!cpf(&json!("11111111111")));
        assert!(!cpf(&json!("000.000.000-00")));
    }

    #[test]
    fn test_cpf_bad_check_digits() {
        assert!(!cpf(&json!("12345678900")));
        assert!(!cpf(&json!("11144477734")));
        assert!(!cpf(&json!("11144477725")));
    }

    #[test]
    fn test_cpf_wrong_length() {
        assert!(!cpf(&json!("1114447773")));
        assert!(!cpf(&json!("111444777350")));
        assert!(!cpf(&json!("")));
        assert!(!cpf(&json!(null)));
    }

    #[test]
    fn test_number() {
        assert!(number(&json!(3)));
        assert!(number(&json!("12.50")));
        assert!(number(&json!(" 7 ")));
        assert!(!number(&json!("")));
        assert!(!number(&json!("doze")));
        assert!(!number(&json!("NaN")));
        assert!(!number(&json!("inf")));
        assert!(!number(&json!("-Infinity")));
        assert!(!number(&json!(null)));
    }

    #[test]
    fn test_date() {
        assert!(date(&json!("2024-03-15")));
        assert!(date(&json!("2024-03-15T10:30:00Z")));
        assert!(date(&json!("2024-03-15T10:30")));
        assert!(date(&json!("2024-03-15 10:30:00")));
        assert!(date(&json!("03/15/2024")));
        assert!(date(&json!(1710498600000i64)));
        assert!(!date(&json!("2024-02-30")));
        assert!(!date(&json!("ontem")));
        assert!(!date(&json!("")));
    }

    #[test]
    fn test_required() {
        assert!(required(&json!("x")));
        assert!(required(&json!(0)));
        assert!(required(&json!(false)));
        assert!(!required(&json!("")));
        assert!(!required(&json!(null)));
    }

    #[test]
    fn test_lengths() {
        assert!(min_length(&json!("abc"), 3));
        assert!(!min_length(&json!("ab"), 3));
        assert!(max_length(&json!("ção"), 3));
        assert!(!max_length(&json!(12345), 4));
        assert!(min_length(&json!(null), 0));
    }

    #[test]
    fn test_pattern() {
        let re = Regex::new(r"^\d{5}-\d{3}$").unwrap();
        assert!(pattern(&json!("01310-100"), &re));
        assert!(!pattern(&json!("01310100"), &re));
    }
}
