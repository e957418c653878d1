// probity-core/src/infrastructure/config/references.rs
//
// SQL checks accept either inline values or paths to files holding them.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::verification::comparator::display_value;
use crate::error::ProbityError;

/// Query text: the content of the file if `reference` names one, else the literal.
pub fn read_query(reference: &Value, base_dir: &Path) -> Result<String, ProbityError> {
    let Value::String(raw) = reference else {
        return Err(DomainError::InvalidQuery(display_value(reference)).into());
    };

    let path = base_dir.join(raw);
    if path.is_file() {
        debug!(path = ?path, "Loading query from file");
        return fs::read_to_string(&path).map_err(|e| unreadable(&path, e));
    }
    Ok(raw.clone())
}

/// Column rules: an inline mapping, or a JSON/YAML file holding one.
pub fn read_expectation(reference: &Value, base_dir: &Path) -> Result<Value, ProbityError> {
    let loaded = match reference {
        Value::Object(_) => return Ok(reference.clone()),
        Value::String(raw) if base_dir.join(raw).is_file() => {
            let path = base_dir.join(raw);
            debug!(path = ?path, "Loading expectation from file");
            let content = fs::read_to_string(&path).map_err(|e| unreadable(&path, e))?;
            if is_yaml(&path) {
                serde_yaml::from_str::<Value>(&content).map_err(|e| unreadable(&path, e))?
            } else {
                serde_json::from_str::<Value>(&content).map_err(|e| unreadable(&path, e))?
            }
        }
        other => other.clone(),
    };

    if loaded.is_object() {
        Ok(loaded)
    } else {
        Err(DomainError::InvalidExpectation(display_value(&loaded)).into())
    }
}

/// A reference file that exists but cannot be used is a configuration error.
fn unreadable(path: &Path, cause: impl std::fmt::Display) -> ProbityError {
    DomainError::UnreadableReference {
        path: path.display().to_string(),
        reason: cause.to_string(),
    }
    .into()
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
