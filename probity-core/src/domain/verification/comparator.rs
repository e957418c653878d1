// probity-core/src/domain/verification/comparator.rs

use regex::Regex;
use serde_json::Value;

use crate::domain::error::DomainError;

/// Matches any present (non-null) value.
pub const WILDCARD: &str = "*";
/// Matches only an absent (null) value.
pub const EMPTY_SENTINEL: &str = "";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(String),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Evaluates one include/exclude expectation against a resolved value.
/// A missing value is passed in as `Value::Null`.
pub fn compare(actual: &Value, expected: &Value, include: bool) -> Verdict {
    if include {
        match expected {
            Value::Array(allowed) => check(
                contains(allowed, actual),
                || format!("{} not found in {}", display_value(actual), expected),
            ),
            Value::String(s) if s == WILDCARD => check(!actual.is_null(), || {
                "expected a value but got null".to_string()
            }),
            Value::String(s) if s == EMPTY_SENTINEL => check(actual.is_null(), || {
                format!("{} is not null", display_value(actual))
            }),
            _ => check(values_equal(actual, expected), || {
                format!("{} != {}", display_value(actual), display_value(expected))
            }),
        }
    } else {
        match expected {
            Value::Array(excluded) => check(!contains(excluded, actual), || {
                format!("{} unexpectedly found in {}", display_value(actual), expected)
            }),
            _ => check(!values_equal(actual, expected), || {
                format!("{} == {}", display_value(actual), display_value(expected))
            }),
        }
    }
}

/// Pattern semantics for the `regex` attribute: search, not full match.
///
/// `include` requires every pattern to match, exclusion requires none to.
pub fn compare_patterns(text: &str, patterns: &Value, include: bool) -> Result<Verdict, DomainError> {
    let patterns: Vec<&Value> = match patterns {
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    };

    for raw in patterns {
        let pattern = raw.as_str().ok_or_else(|| DomainError::InvalidRule {
            attribute: "regex".into(),
            reason: format!("pattern {} is not a string", raw),
        })?;
        let regex = Regex::new(pattern).map_err(|source| DomainError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let matched = regex.is_match(text);
        if include && !matched {
            return Ok(Verdict::Fail(format!(
                "Regex didn't match: '{}' not found in '{}'",
                pattern, text
            )));
        }
        if !include && matched {
            return Ok(Verdict::Fail(format!(
                "Regex matched: '{}' found in '{}'",
                pattern, text
            )));
        }
    }
    Ok(Verdict::Pass)
}

/// Deep equality where `200` and `200.0` are the same number.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                x.as_f64() == y.as_f64()
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Strings print bare, everything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn contains(haystack: &[Value], needle: &Value) -> bool {
    haystack.iter().any(|v| values_equal(v, needle))
}

fn check(passed: bool, message: impl FnOnce() -> String) -> Verdict {
    if passed {
        Verdict::Pass
    } else {
        Verdict::Fail(message())
    }
}
