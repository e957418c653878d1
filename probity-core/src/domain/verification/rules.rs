// probity-core/src/domain/verification/rules.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::domain::error::DomainError;
use crate::domain::verification::comparator::display_value;
use crate::domain::verification::operator::Operator;

/// Include/exclude rule groups of an HTTP check.
///
/// Attribute names are not reserved: they are resolved at evaluation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpExpectation {
    #[serde(default)]
    pub include: Map<String, Value>,
    #[serde(default)]
    pub exclude: Map<String, Value>,
}

impl HttpExpectation {
    /// Rule set used when a check declares none: `status_code` must be 200.
    pub fn status_ok() -> Self {
        let mut include = Map::new();
        include.insert("status_code".into(), json!([200]));
        Self {
            include,
            exclude: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRule {
    pub standard: Value,
    pub operator: Operator,
}

/// Column name -> rule, applied to every row of a result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowExpectation {
    pub columns: Vec<(String, ColumnRule)>,
}

impl RowExpectation {
    /// Parses `{"column": {"standard": <value>, "operator": "<op>"}, ...}`.
    pub fn from_value(value: &Value) -> Result<Self, DomainError> {
        let mapping = value
            .as_object()
            .ok_or_else(|| DomainError::InvalidExpectation(display_value(value)))?;

        let mut columns = Vec::with_capacity(mapping.len());
        for (column, criteria) in mapping {
            columns.push((column.clone(), parse_column_rule(column, criteria)?));
        }
        Ok(Self { columns })
    }
}

fn parse_column_rule(column: &str, criteria: &Value) -> Result<ColumnRule, DomainError> {
    let invalid = |reason: &str| DomainError::InvalidRule {
        attribute: column.to_string(),
        reason: reason.to_string(),
    };

    let criteria = criteria
        .as_object()
        .ok_or_else(|| invalid("criteria must be a mapping with 'standard' and 'operator'"))?;

    if let Some(key) = criteria
        .keys()
        .find(|k| k.as_str() != "standard" && k.as_str() != "operator")
    {
        return Err(invalid(&format!("unknown key '{key}'")));
    }

    let standard = criteria
        .get("standard")
        .cloned()
        .ok_or_else(|| invalid("missing 'standard'"))?;
    let operator = criteria
        .get("operator")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing 'operator'"))?
        .parse()?;

    Ok(ColumnRule { standard, operator })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row_expectation_keeps_declaration_order() {
        let expectation = RowExpectation::from_value(&json!({
            "age": {"standard": 18, "operator": ">="},
            "name": {"operator": "!=", "standard": ""}
        }))
        .unwrap();

        let names: Vec<&str> = expectation.columns.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, ["age", "name"]);
        assert_eq!(expectation.columns[0].1.operator, Operator::Ge);
    }

    #[test]
    fn test_non_mapping_expectation() {
        let res = RowExpectation::from_value(&json!(["age"]));
        assert!(matches!(res, Err(DomainError::InvalidExpectation(_))));
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let res = RowExpectation::from_value(&json!({"age": {"standard": 1, "operator": "=="}}));
        assert!(matches!(res, Err(DomainError::UnknownOperator(_))));
    }

    #[test]
    fn test_missing_standard_rejected() {
        let res = RowExpectation::from_value(&json!({"age": {"operator": ">"}}));
        assert!(matches!(res, Err(DomainError::InvalidRule { .. })));
    }

    #[test]
    fn test_http_expectation_rejects_unknown_groups() {
        let res: Result<HttpExpectation, _> =
            serde_json::from_value(json!({"include": {}, "require": {}}));
        assert!(res.is_err());
    }
}
