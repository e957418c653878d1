// probity-core/src/domain/verification/engine.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::payload::RowSet;
use crate::domain::verification::comparator::{Verdict, compare, compare_patterns};
use crate::domain::verification::resolver::{REGEX_ATTRIBUTE, ResolutionContext};
use crate::domain::verification::rules::{HttpExpectation, RowExpectation};

pub const EMPTY_RESULTS: &str = "query results empty";

/// What happens after the first comparator mismatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Evaluate every rule and report every mismatch.
    #[default]
    CollectAll,
    /// Stop at the first mismatch.
    FirstFailure,
}

/// Evaluates include then exclude rules against an HTTP response.
///
/// Returns the mismatch messages (empty when everything matched). A rule that
/// cannot be evaluated at all (unknown attribute, bad pattern) aborts with `Err`.
pub fn verify_response(
    rules: &HttpExpectation,
    ctx: &ResolutionContext<'_>,
    mode: EvaluationMode,
) -> Result<Vec<String>, DomainError> {
    let mut failures = Vec::new();

    let groups = [(&rules.include, true), (&rules.exclude, false)];
    for (group, include) in groups {
        for (attribute, expected) in group {
            let verdict = evaluate_attribute(ctx, attribute, expected, include)?;
            if let Verdict::Fail(message) = verdict {
                debug!(attribute = %attribute, include, "Rule mismatch");
                failures.push(format!("{}: {}", attribute, message));
                if mode == EvaluationMode::FirstFailure {
                    return Ok(failures);
                }
            }
        }
    }

    Ok(failures)
}

fn evaluate_attribute(
    ctx: &ResolutionContext<'_>,
    attribute: &str,
    expected: &Value,
    include: bool,
) -> Result<Verdict, DomainError> {
    if attribute == REGEX_ATTRIBUTE {
        return compare_patterns(ctx.regex_source(), expected, include);
    }
    let actual = ctx.resolve(attribute)?;
    Ok(compare(&actual, expected, include))
}

/// Applies every column rule to every row.
///
/// `None` means nothing was fetched: there is nothing to judge and the fetch
/// error already explains the failure. An empty set is a failure of its own.
pub fn verify_rows(
    rules: &RowExpectation,
    rows: Option<&RowSet>,
    mode: EvaluationMode,
) -> Result<Vec<String>, DomainError> {
    let Some(rows) = rows else {
        return Ok(Vec::new());
    };
    if rows.is_empty() {
        return Ok(vec![EMPTY_RESULTS.to_string()]);
    }

    let mut failures = Vec::new();
    for row in &rows.rows {
        for (column, rule) in &rules.columns {
            let actual = row.get(column).ok_or_else(|| DomainError::MissingColumn {
                column: column.clone(),
                row: Value::Object(row.clone()).to_string(),
            })?;

            if let Verdict::Fail(message) = rule.operator.apply(actual, &rule.standard, column) {
                failures.push(message);
                if mode == EvaluationMode::FirstFailure {
                    return Ok(failures);
                }
            }
        }
    }

    Ok(failures)
}
