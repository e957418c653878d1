// probity-core/src/domain/check/result.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of one check run, persisted as the sole content of its artifact.
///
/// `errors` is omitted from the document when the check passed cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CheckResult {
    pub fn passed() -> Self {
        Self {
            success: true,
            errors: None,
            extra: Map::new(),
        }
    }

    /// Builds the result from every error collected during fetch and evaluation.
    /// No errors means success.
    pub fn from_errors(errors: &[String]) -> Self {
        if errors.is_empty() {
            Self::passed()
        } else {
            Self {
                success: false,
                errors: Some(errors.join("\n")),
                extra: Map::new(),
            }
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// What a check reports to the runner once its result is persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Passed,
    Failed(String),
}

impl CheckOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CheckOutcome::Passed)
    }
}

impl From<&CheckResult> for CheckOutcome {
    fn from(result: &CheckResult) -> Self {
        if result.success {
            CheckOutcome::Passed
        } else {
            CheckOutcome::Failed(result.errors.clone().unwrap_or_default())
        }
    }
}
