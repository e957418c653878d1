// probity-core/src/domain/check/mod.rs

pub mod result;

pub use result::{CheckOutcome, CheckResult};

use std::path::PathBuf;

pub const DEFAULT_JSON_INDENT: usize = 3;
const RESULT_FILE_SUFFIX: &str = "_result.json";

/// Who a check is: the optional run tag plus the check id.
///
/// The pair is the key of the per-check artifact, so two checks of one run
/// must never share it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckIdentity {
    pub tag: String,
    pub test_id: String,
}

impl CheckIdentity {
    pub fn new(tag: impl Into<String>, test_id: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            test_id: test_id.into(),
        }
    }

    /// `{tag_}{test_id}_result.json`, the tag segment omitted when empty.
    pub fn result_file_name(&self) -> String {
        if self.tag.is_empty() {
            format!("{}{}", self.test_id, RESULT_FILE_SUFFIX)
        } else {
            format!("{}_{}{}", self.tag, self.test_id, RESULT_FILE_SUFFIX)
        }
    }
}

/// Where and how a check persists its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Raw string prefix (may carry a directory, e.g. `target/`).
    pub file_prefix: String,
    pub json_indent: usize,
    pub save_to_file: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            file_prefix: String::new(),
            json_indent: DEFAULT_JSON_INDENT,
            save_to_file: true,
        }
    }
}

impl OutputOptions {
    pub fn result_path(&self, identity: &CheckIdentity) -> PathBuf {
        prefixed(&self.file_prefix, &identity.result_file_name())
    }
}

/// Prefixes are concatenated, not joined: `out/run1-` + `x.json` -> `out/run1-x.json`.
pub fn prefixed(prefix: &str, file_name: &str) -> PathBuf {
    PathBuf::from(format!("{prefix}{file_name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_file_name_without_tag() {
        let id = CheckIdentity::new("", "health");
        assert_eq!(id.result_file_name(), "health_result.json");
    }

    #[test]
    fn test_result_file_name_with_tag() {
        let id = CheckIdentity::new("nightly", "health");
        assert_eq!(id.result_file_name(), "nightly_health_result.json");
    }

    #[test]
    fn test_result_path_with_prefix() {
        let options = OutputOptions {
            file_prefix: "target/".into(),
            ..Default::default()
        };
        let id = CheckIdentity::new("nightly", "health");
        assert_eq!(
            options.result_path(&id),
            PathBuf::from("target/nightly_health_result.json")
        );
    }
}
