// probity-core/src/application/suite.rs
//
// From a loaded suite file to runnable checks.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::application::clean::clean_artifacts;
use crate::application::http_check::HttpCheck;
use crate::application::ports::TemplateEngine;
use crate::application::runner::{Runner, RunnerOptions, summarize_entries};
use crate::application::sql_check::SqlCheck;
use crate::domain::check::CheckIdentity;
use crate::domain::suite::{CheckConfig, SuiteConfig};
use crate::domain::summary::RunSummary;
use crate::error::ProbityError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::{ConnectionFactory, HttpClient};

/// External collaborators shared by every check of a run.
#[derive(Clone)]
pub struct Collaborators {
    pub http: Arc<dyn HttpClient>,
    pub connections: Arc<dyn ConnectionFactory>,
    pub renderer: Arc<dyn TemplateEngine>,
}

/// Registers the suite's checks in file order. A non-empty `select` keeps
/// only the named ids.
#[instrument(skip(config, collaborators), fields(suite = %config.name))]
pub fn build_runner(
    config: &SuiteConfig,
    collaborators: &Collaborators,
    select: &[String],
) -> Result<Runner, ProbityError> {
    let selected = selected_checks(config, select)?;

    let options = RunnerOptions::from_suite(config);
    let mut runner = Runner::new(options.clone());

    for check in selected {
        match check {
            CheckConfig::Http(http) => runner.register(Box::new(
                HttpCheck::new(&config.tag, http.clone(), collaborators.http.clone())
                    .with_output(options.output.clone())
                    .with_mode(config.evaluation),
            ))?,
            CheckConfig::Sql(sql) => runner.register(Box::new(
                SqlCheck::new(
                    &config.tag,
                    sql.clone(),
                    collaborators.connections.clone(),
                    collaborators.renderer.clone(),
                )
                .with_output(options.output.clone())
                .with_mode(config.evaluation)
                .with_base_dir(config.base_dir.clone()),
            ))?,
        }
    }

    info!(checks = runner.len(), "Runner ready");
    Ok(runner)
}

fn selected_checks<'a>(
    config: &'a SuiteConfig,
    select: &[String],
) -> Result<Vec<&'a CheckConfig>, ProbityError> {
    if select.is_empty() {
        return Ok(config.checks.iter().collect());
    }

    let known: HashSet<&str> = config.checks.iter().map(CheckConfig::id).collect();
    let unknown: Vec<&str> = select
        .iter()
        .map(String::as_str)
        .filter(|id| !known.contains(id))
        .collect();
    if !unknown.is_empty() {
        return Err(InfrastructureError::ConfigError(format!(
            "Unknown check id(s) in selection: {}",
            unknown.join(", ")
        ))
        .into());
    }

    Ok(config
        .checks
        .iter()
        .filter(|c| select.iter().any(|s| s == c.id()))
        .collect())
}

/// `(test_id, artifact_path)` for every check of the suite, without building it.
pub fn suite_entries(config: &SuiteConfig) -> Vec<(String, PathBuf)> {
    let output = config.output_options();
    config
        .checks
        .iter()
        .map(|c| {
            let identity = CheckIdentity::new(config.tag.clone(), c.id());
            (c.id().to_string(), output.result_path(&identity))
        })
        .collect()
}

/// Rebuilds the summary from the artifacts already on disk.
pub fn summarize_suite(config: &SuiteConfig) -> Result<RunSummary, ProbityError> {
    summarize_entries(&RunnerOptions::from_suite(config), &suite_entries(config))
}

/// Deletes every artifact the suite produces, inside the suite's directory only.
pub fn clean_suite(config: &SuiteConfig) -> Result<Vec<PathBuf>, ProbityError> {
    let options = RunnerOptions::from_suite(config);
    let mut targets: Vec<PathBuf> = suite_entries(config)
        .into_iter()
        .map(|(_, path)| path)
        .collect();
    targets.push(options.summary_path());
    targets.push(options.log_path());

    clean_artifacts(&targets, &config.base_dir)
}
