// probity-core/src/infrastructure/store.rs
//
// Result Store: one JSON artifact per check, plus the run summary.
// No locking: every check owns a distinct path, re-runs overwrite.

use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

use crate::domain::check::{CheckIdentity, CheckResult, OutputOptions, prefixed};
use crate::domain::summary::RunSummary;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, read_if_exists, to_json_indented};

#[derive(Debug, Clone)]
pub struct ResultStore {
    file_prefix: String,
    json_indent: usize,
}

impl ResultStore {
    pub fn new(options: &OutputOptions) -> Self {
        Self {
            file_prefix: options.file_prefix.clone(),
            json_indent: options.json_indent,
        }
    }

    pub fn result_path(&self, identity: &CheckIdentity) -> PathBuf {
        prefixed(&self.file_prefix, &identity.result_file_name())
    }

    pub fn summary_path(&self, results_file: &str) -> PathBuf {
        prefixed(&self.file_prefix, results_file)
    }

    /// Writes (or overwrites) the artifact of `identity` and returns its path.
    #[instrument(skip(self, result), fields(test_id = %identity.test_id))]
    pub fn save(
        &self,
        identity: &CheckIdentity,
        result: &CheckResult,
    ) -> Result<PathBuf, InfrastructureError> {
        let path = self.result_path(identity);
        atomic_write(&path, to_json_indented(result, self.json_indent)?)?;
        debug!(path = ?path, success = result.success, "Result artifact written");
        Ok(path)
    }

    /// Reads an artifact back. Missing or unreadable artifacts are "no result":
    /// they never fail the run.
    pub fn load(&self, path: &Path) -> Option<CheckResult> {
        let content = match read_if_exists(path) {
            Ok(Some(content)) => content,
            Ok(None) => {
                debug!(path = ?path, "No result artifact");
                return None;
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "Unreadable result artifact, ignoring");
                return None;
            }
        };

        serde_json::from_str(&content)
            .inspect_err(|e| warn!(path = ?path, error = %e, "Malformed result artifact, ignoring"))
            .ok()
    }

    /// Full overwrite, never a merge with a previous summary.
    pub fn save_summary(
        &self,
        results_file: &str,
        summary: &RunSummary,
    ) -> Result<PathBuf, InfrastructureError> {
        let path = self.summary_path(results_file);
        atomic_write(&path, to_json_indented(summary, self.json_indent)?)?;
        Ok(path)
    }

    pub fn load_summary(&self, results_file: &str) -> Result<Option<RunSummary>, InfrastructureError> {
        let path = self.summary_path(results_file);
        match read_if_exists(&path)? {
            Some(content) => Ok(Some(serde_json::from_str(&content)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> ResultStore {
        ResultStore::new(&OutputOptions {
            file_prefix: format!("{}/", dir.display()),
            ..Default::default()
        })
    }

    #[test]
    fn test_round_trip_preserves_every_field() -> Result<()> {
        let dir = tempdir()?;
        let store = store_in(dir.path());
        let identity = CheckIdentity::new("nightly", "health");
        let result = CheckResult::from_errors(&["status_code: 500 not found in [200]".into()])
            .with_field("http_code", json!(500));

        let path = store.save(&identity, &result)?;
        assert_eq!(path, dir.path().join("nightly_health_result.json"));
        assert_eq!(store.load(&path), Some(result));
        Ok(())
    }

    #[test]
    fn test_artifact_uses_three_space_indent() -> Result<()> {
        let dir = tempdir()?;
        let store = store_in(dir.path());
        let path = store.save(&CheckIdentity::new("", "ok"), &CheckResult::passed())?;
        assert_eq!(fs::read_to_string(path)?, "{\n   \"success\": true\n}");
        Ok(())
    }

    #[test]
    fn test_missing_and_malformed_artifacts_are_absent() -> Result<()> {
        let dir = tempdir()?;
        let store = store_in(dir.path());

        assert!(store.load(&dir.path().join("missing_result.json")).is_none());

        let broken = dir.path().join("broken_result.json");
        fs::write(&broken, "{ not json")?;
        assert!(store.load(&broken).is_none());
        Ok(())
    }

    #[test]
    fn test_summary_is_overwritten() -> Result<()> {
        let dir = tempdir()?;
        let store = store_in(dir.path());

        let first = RunSummary::from_results(
            vec![("a".into(), CheckResult::passed())],
            false,
            "",
        );
        store.save_summary("test_results.json", &first)?;

        let second = RunSummary::from_results(vec![], false, "");
        store.save_summary("test_results.json", &second)?;

        assert_eq!(store.load_summary("test_results.json")?, Some(second));
        Ok(())
    }
}
