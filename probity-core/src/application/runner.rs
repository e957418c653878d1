// probity-core/src/application/runner.rs
//
// The harness: runs registered checks, writes the run log, then aggregates.
// Aggregation starts only once every check has returned.

use chrono::{DateTime, Local};
use futures::StreamExt;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument};

use crate::application::aggregate::aggregate_and_save;
use crate::application::check::Check;
use crate::domain::check::{CheckOutcome, OutputOptions, prefixed};
use crate::domain::error::DomainError;
use crate::domain::suite::SuiteConfig;
use crate::domain::suite::configuration::{DEFAULT_LOGS_FILE, DEFAULT_RESULTS_FILE};
use crate::domain::summary::RunSummary;
use crate::error::ProbityError;
use crate::infrastructure::logs::LogArtifact;
use crate::infrastructure::store::ResultStore;

const SEPARATOR_HEAVY: &str =
    "======================================================================";
const SEPARATOR_LIGHT: &str =
    "----------------------------------------------------------------------";

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerOptions {
    pub tag: String,
    pub output: OutputOptions,
    pub results_file: String,
    pub logs_file: String,
    pub include_success: bool,
    /// Checks in flight at once. Completion order stays registration order.
    pub concurrency: usize,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            tag: String::new(),
            output: OutputOptions::default(),
            results_file: DEFAULT_RESULTS_FILE.to_string(),
            logs_file: DEFAULT_LOGS_FILE.to_string(),
            include_success: false,
            concurrency: 1,
        }
    }
}

impl RunnerOptions {
    pub fn from_suite(config: &SuiteConfig) -> Self {
        Self {
            tag: config.tag.clone(),
            output: config.output_options(),
            results_file: config.results_file.clone(),
            logs_file: config.logs_file.clone(),
            include_success: config.include_success,
            concurrency: config.concurrency,
        }
    }

    pub fn store(&self) -> ResultStore {
        ResultStore::new(&self.output)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.store().summary_path(&self.results_file)
    }

    pub fn log_path(&self) -> PathBuf {
        prefixed(&self.output.file_prefix, &self.logs_file)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckStatus {
    Ok,
    Fail(String),
    /// Aborted by a configuration error.
    Error(String),
}

#[derive(Debug, Clone)]
pub struct CheckReport {
    pub test_id: String,
    pub status: CheckStatus,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub checks: Vec<CheckReport>,
    pub summary: RunSummary,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn failures(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Fail(_)))
    }

    pub fn errors(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Error(_)))
    }

    pub fn was_successful(&self) -> bool {
        self.failures() == 0 && self.errors() == 0
    }

    fn count(&self, pred: impl Fn(&CheckStatus) -> bool) -> usize {
        self.checks.iter().filter(|c| pred(&c.status)).count()
    }
}

pub struct Runner {
    options: RunnerOptions,
    checks: Vec<Box<dyn Check>>,
    ids: HashSet<String>,
}

impl Runner {
    pub fn new(options: RunnerOptions) -> Self {
        Self {
            options,
            checks: Vec::new(),
            ids: HashSet::new(),
        }
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    /// Two checks with one id would overwrite each other's artifact.
    pub fn register(&mut self, check: Box<dyn Check>) -> Result<(), ProbityError> {
        let test_id = check.identity().test_id.clone();
        if !self.ids.insert(test_id.clone()) {
            return Err(DomainError::DuplicateCheck(test_id).into());
        }
        self.checks.push(check);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn test_ids(&self) -> Vec<String> {
        self.checks
            .iter()
            .map(|c| c.identity().test_id.clone())
            .collect()
    }

    /// `(test_id, artifact_path)` of every registered check, in order.
    pub fn result_entries(&self) -> Vec<(String, PathBuf)> {
        self.checks
            .iter()
            .map(|c| (c.identity().test_id.clone(), c.result_path()))
            .collect()
    }

    pub fn store(&self) -> ResultStore {
        self.options.store()
    }

    pub fn log(&self) -> LogArtifact {
        LogArtifact::new(self.options.log_path())
    }

    /// Runs every check, writes the log, then writes the summary.
    ///
    /// Failing and erroring checks never stop the run. A check that could not
    /// write its own artifact does.
    #[instrument(skip(self), fields(checks = self.checks.len()))]
    pub async fn run(&self) -> Result<RunReport, ProbityError> {
        let started_at = Local::now();
        let clock = Instant::now();
        info!(concurrency = self.options.concurrency, "Starting run");

        let finished: Vec<_> = futures::stream::iter(self.checks.iter().map(|check| async move {
            let check_clock = Instant::now();
            let outcome = check.run().await;
            (check.identity().test_id.clone(), outcome, check_clock.elapsed())
        }))
        .buffered(self.options.concurrency.max(1))
        .collect()
        .await;

        let mut reports = Vec::with_capacity(finished.len());
        for (test_id, outcome, elapsed) in finished {
            let status = match outcome {
                Ok(CheckOutcome::Passed) => CheckStatus::Ok,
                Ok(CheckOutcome::Failed(message)) => CheckStatus::Fail(message),
                Err(e) if e.is_configuration_error() => CheckStatus::Error(e.to_string()),
                Err(e) => {
                    error!(test_id = %test_id, error = %e, "Could not persist check result");
                    return Err(e);
                }
            };
            reports.push(CheckReport {
                test_id,
                status,
                elapsed,
            });
        }
        let elapsed = clock.elapsed();

        self.log().write(&render_log(&started_at, &reports, elapsed))?;
        let summary = self.summarize()?;

        info!(
            passed = summary.statistics.passed,
            failed = summary.statistics.failed,
            elapsed_ms = elapsed.as_millis() as u64,
            "Run finished"
        );
        Ok(RunReport {
            checks: reports,
            summary,
            elapsed,
        })
    }

    /// Re-aggregates whatever artifacts exist, without running anything.
    pub fn summarize(&self) -> Result<RunSummary, ProbityError> {
        summarize_entries(&self.options, &self.result_entries())
    }

    /// Puts external text (deploy notes, CI links) ahead of the run log.
    pub fn insert_logs(&self, text: &str) -> Result<(), ProbityError> {
        self.log().insert(text)?;
        Ok(())
    }
}

pub fn summarize_entries(
    options: &RunnerOptions,
    entries: &[(String, PathBuf)],
) -> Result<RunSummary, ProbityError> {
    aggregate_and_save(
        entries,
        &options.store(),
        options.include_success,
        &options.tag,
        &options.results_file,
    )
}

/// unittest-style transcript of a run.
pub fn render_log(started_at: &DateTime<Local>, reports: &[CheckReport], elapsed: Duration) -> String {
    RunLog {
        started_at,
        reports,
        elapsed,
    }
    .to_string()
}

struct RunLog<'a> {
    started_at: &'a DateTime<Local>,
    reports: &'a [CheckReport],
    elapsed: Duration,
}

impl fmt::Display for RunLog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run started at {}", self.started_at.format("%Y-%m-%d %H:%M:%S %:z"))?;

        for report in self.reports {
            let label = match report.status {
                CheckStatus::Ok => "ok",
                CheckStatus::Fail(_) => "FAIL",
                CheckStatus::Error(_) => "ERROR",
            };
            writeln!(f, "{} ... {}", report.test_id, label)?;
        }

        for report in self.reports {
            let (kind, details) = match &report.status {
                CheckStatus::Ok => continue,
                CheckStatus::Fail(details) => ("FAIL", details),
                CheckStatus::Error(details) => ("ERROR", details),
            };
            write!(
                f,
                "\n{}\n{}: {}\n{}\n{}\n",
                SEPARATOR_HEAVY, kind, report.test_id, SEPARATOR_LIGHT, details
            )?;
        }

        let noun = if self.reports.len() == 1 { "check" } else { "checks" };
        write!(
            f,
            "\n{}\nRan {} {} in {:.3}s\n\n",
            SEPARATOR_LIGHT,
            self.reports.len(),
            noun,
            self.elapsed.as_secs_f64()
        )?;

        let failures = self
            .reports
            .iter()
            .filter(|r| matches!(r.status, CheckStatus::Fail(_)))
            .count();
        let errors = self
            .reports
            .iter()
            .filter(|r| matches!(r.status, CheckStatus::Error(_)))
            .count();

        if failures == 0 && errors == 0 {
            return writeln!(f, "OK");
        }
        let mut counts = Vec::new();
        if failures > 0 {
            counts.push(format!("failures={}", failures));
        }
        if errors > 0 {
            counts.push(format!("errors={}", errors));
        }
        writeln!(f, "FAILED ({})", counts.join(", "))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::function_check::FunctionCheck;
    use crate::domain::check::CheckIdentity;
    use anyhow::Result;
    use serde_json::{Map, Value, json};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn options_in(dir: &Path) -> RunnerOptions {
        RunnerOptions {
            output: OutputOptions {
                file_prefix: format!("{}/", dir.display()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn constant(id: &str, returns: Value, expected: Value, options: &RunnerOptions) -> Box<dyn Check> {
        Box::new(
            FunctionCheck::new(
                CheckIdentity::new(options.tag.clone(), id),
                Arc::new(move |_: &Map<String, Value>| returns.clone()),
                Map::new(),
                expected,
            )
            .with_output(options.output.clone()),
        )
    }

    #[test]
    fn test_duplicate_registration_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let options = options_in(dir.path());
        let mut runner = Runner::new(options.clone());

        runner.register(constant("same", json!(1), json!(1), &options))?;
        let err = runner
            .register(constant("same", json!(2), json!(2), &options))
            .unwrap_err();
        assert!(matches!(err, ProbityError::Domain(DomainError::DuplicateCheck(_))));
        assert_eq!(runner.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_run_writes_log_and_summary() -> Result<()> {
        let dir = tempdir()?;
        let options = RunnerOptions {
            concurrency: 4,
            ..options_in(dir.path())
        };
        let mut runner = Runner::new(options.clone());
        for (id, returns) in [("a", 1), ("b", 2), ("c", 3), ("d", 1)] {
            runner.register(constant(id, json!(returns), json!(1), &options))?;
        }

        let report = runner.run().await?;
        assert_eq!(report.failures(), 2);
        assert!(!report.was_successful());
        assert_eq!(
            report.checks.iter().map(|c| c.test_id.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "c", "d"]
        );

        let summary = runner.store().load_summary("test_results.json")?.unwrap();
        assert_eq!(summary.test_ids, vec!["a", "b", "c", "d"]);
        assert_eq!(summary.statistics.failed, 2);
        assert_eq!(summary.failed.len(), 2);

        let log = runner.log().read()?;
        assert!(log.contains("a ... ok\nb ... FAIL\nc ... FAIL\nd ... ok\n"));
        assert!(log.contains("FAIL: b\n"));
        assert!(log.contains("Ran 4 checks in "));
        assert!(log.ends_with("FAILED (failures=2)\n"));
        Ok(())
    }

    #[tokio::test]
    async fn test_insert_logs_prepends_to_run_log() -> Result<()> {
        let dir = tempdir()?;
        let options = options_in(dir.path());
        let mut runner = Runner::new(options.clone());
        runner.register(constant("a", json!(true), json!(true), &options))?;

        runner.run().await?;
        runner.insert_logs("pipeline #981")?;

        let log = runner.log().read()?;
        assert!(log.starts_with("pipeline #981\nRun started at "));
        assert!(log.ends_with("OK\n"));
        Ok(())
    }

    #[test]
    fn test_render_log_counts_errors() {
        let reports = vec![
            CheckReport {
                test_id: "typo".into(),
                status: CheckStatus::Error("ERROR. unrecognized evaluate attribute: colour".into()),
                elapsed: Duration::ZERO,
            },
            CheckReport {
                test_id: "slow".into(),
                status: CheckStatus::Fail("latency_ms 900 is not < 500".into()),
                elapsed: Duration::ZERO,
            },
        ];

        let log = render_log(&Local::now(), &reports, Duration::from_millis(1234));
        assert!(log.contains("typo ... ERROR\nslow ... FAIL\n"));
        assert!(log.contains("ERROR: typo\n"));
        assert!(log.contains("Ran 2 checks in 1.234s\n"));
        assert!(log.ends_with("FAILED (failures=1, errors=1)\n"));
    }
}
