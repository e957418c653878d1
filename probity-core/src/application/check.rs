// probity-core/src/application/check.rs

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::domain::check::{CheckIdentity, CheckOutcome, CheckResult, OutputOptions};
use crate::error::ProbityError;
use crate::infrastructure::store::ResultStore;

/// One executable check: fetch, evaluate, persist, report.
///
/// `run` persists exactly one result before returning. `Err` is reserved for
/// configuration errors (raised after the result was written) and for a
/// failure to write the result itself.
#[async_trait]
pub trait Check: Send + Sync {
    fn identity(&self) -> &CheckIdentity;

    fn output(&self) -> &OutputOptions;

    async fn run(&self) -> Result<CheckOutcome, ProbityError>;

    fn result_path(&self) -> PathBuf {
        self.output().result_path(self.identity())
    }
}

/// What a check knows once fetching and evaluating are over.
#[derive(Debug, Default)]
pub(crate) struct Verdicts {
    pub errors: Vec<String>,
    pub hard_error: Option<ProbityError>,
    pub extra: Map<String, Value>,
}

impl Verdicts {
    pub fn push(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn abort(&mut self, error: ProbityError) {
        self.hard_error = Some(error);
    }
}

/// Builds the result, persists it, then surfaces it.
///
/// A hard error is part of the persisted `errors` and is returned afterwards.
pub(crate) fn conclude(
    identity: &CheckIdentity,
    output: &OutputOptions,
    verdicts: Verdicts,
) -> Result<CheckOutcome, ProbityError> {
    let Verdicts {
        mut errors,
        hard_error,
        extra,
    } = verdicts;

    if let Some(e) = &hard_error {
        errors.push(e.to_string());
    }

    let mut result = CheckResult::from_errors(&errors);
    result.extra = extra;

    if output.save_to_file {
        ResultStore::new(output).save(identity, &result)?;
    } else {
        debug!(test_id = %identity.test_id, "Result kept in memory (save_to_file disabled)");
    }

    match hard_error {
        Some(e) => {
            warn!(test_id = %identity.test_id, error = %e, "Check aborted by a configuration error");
            Err(e)
        }
        None => {
            info!(test_id = %identity.test_id, success = result.success, "Check finished");
            Ok(CheckOutcome::from(&result))
        }
    }
}
