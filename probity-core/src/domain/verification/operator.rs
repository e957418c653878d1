// probity-core/src/domain/verification/operator.rs

use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;
use crate::domain::verification::comparator::{Verdict, display_value, values_equal};

/// Comparison applied between a row value and its declared standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Ge,
    Le,
    Lt,
    Gt,
}

impl FromStr for Operator {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            ">=" => Ok(Self::Ge),
            "<=" => Ok(Self::Le),
            "<" => Ok(Self::Lt),
            ">" => Ok(Self::Gt),
            other => Err(DomainError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Lt => "<",
            Self::Gt => ">",
        };
        f.write_str(symbol)
    }
}

impl Operator {
    /// Applies the operator using the natural ordering of the value type.
    ///
    /// Values without a shared ordering (a string against a number, nulls)
    /// fail every ordering operator.
    pub fn apply(self, actual: &Value, standard: &Value, label: &str) -> Verdict {
        let passed = match self {
            Self::Eq => values_equal(actual, standard),
            Self::Ne => !values_equal(actual, standard),
            Self::Ge => order(actual, standard).is_some_and(|o| o != Ordering::Less),
            Self::Le => order(actual, standard).is_some_and(|o| o != Ordering::Greater),
            Self::Lt => order(actual, standard) == Some(Ordering::Less),
            Self::Gt => order(actual, standard) == Some(Ordering::Greater),
        };

        if passed {
            Verdict::Pass
        } else {
            Verdict::Fail(format!(
                "{} {} is not {} {}",
                label,
                display_value(actual),
                self,
                display_value(standard)
            ))
        }
    }
}

fn order(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                Some(x.cmp(&y))
            } else {
                x.as_f64()?.partial_cmp(&y.as_f64()?)
            }
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
