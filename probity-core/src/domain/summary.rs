// probity-core/src/domain/summary.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::check::CheckResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// Roll-up of every result artifact known for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub test_ids: Vec<String>,
    pub statistics: Statistics,
    pub failed: BTreeMap<String, CheckResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<BTreeMap<String, CheckResult>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl RunSummary {
    /// Recomputes the summary from scratch. `results` keeps the order in which
    /// checks were registered; ids without a result must already be left out.
    pub fn from_results(results: Vec<(String, CheckResult)>, include_success: bool, tag: &str) -> Self {
        let test_ids: Vec<String> = results.iter().map(|(id, _)| id.clone()).collect();

        let (passed, failed): (Vec<_>, Vec<_>) =
            results.into_iter().partition(|(_, result)| result.success);

        let statistics = Statistics {
            total: test_ids.len(),
            passed: passed.len(),
            failed: failed.len(),
        };

        Self {
            test_ids,
            statistics,
            failed: failed.into_iter().collect(),
            success: include_success.then(|| passed.into_iter().collect()),
            tag: (!tag.is_empty()).then(|| tag.to_string()),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.statistics.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    fn sample() -> Vec<(String, CheckResult)> {
        vec![
            ("a".into(), CheckResult::passed()),
            ("b".into(), CheckResult::from_errors(&["boom".into()])),
            ("c".into(), CheckResult::passed()),
        ]
    }

    #[test]
    fn test_statistics_invariants() {
        let summary = RunSummary::from_results(sample(), false, "");
        assert_eq!(summary.statistics.total, summary.test_ids.len());
        assert_eq!(
            summary.statistics.passed + summary.statistics.failed,
            summary.statistics.total
        );
        assert_eq!(summary.statistics.failed, 1);
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed.contains_key("b"));
        assert!(summary.success.is_none());
        assert!(summary.tag.is_none());
    }

    #[test]
    fn test_include_success_and_tag() {
        let summary = RunSummary::from_results(sample(), true, "nightly");
        let success = summary.success.as_ref().map(|s| s.len());
        assert_eq!(success, Some(2));
        assert_eq!(summary.tag.as_deref(), Some("nightly"));
    }

    #[test]
    fn test_empty_run() -> Result<()> {
        let summary = RunSummary::from_results(vec![], false, "");
        assert_eq!(
            serde_json::to_value(&summary)?,
            json!({
                "test_ids": [],
                "statistics": {"total": 0, "passed": 0, "failed": 0},
                "failed": {}
            })
        );
        Ok(())
    }
}
