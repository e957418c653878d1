// probity-core/src/application/aggregate.rs

use std::path::PathBuf;
use tracing::{info, instrument};

use crate::domain::summary::RunSummary;
use crate::error::ProbityError;
use crate::infrastructure::store::ResultStore;

/// Loads the artifact of every registered check and rolls them up.
///
/// `entries` is `(test_id, artifact_path)` in registration order. A check
/// without an artifact never ran and is left out, it does not count as failed.
pub fn aggregate(
    entries: &[(String, PathBuf)],
    store: &ResultStore,
    include_success: bool,
    tag: &str,
) -> RunSummary {
    let loaded = entries
        .iter()
        .filter_map(|(id, path)| store.load(path).map(|result| (id.clone(), result)))
        .collect();
    RunSummary::from_results(loaded, include_success, tag)
}

/// `aggregate`, then overwrite the summary artifact.
#[instrument(skip(entries, store))]
pub fn aggregate_and_save(
    entries: &[(String, PathBuf)],
    store: &ResultStore,
    include_success: bool,
    tag: &str,
    results_file: &str,
) -> Result<RunSummary, ProbityError> {
    let summary = aggregate(entries, store, include_success, tag);
    let path = store.save_summary(results_file, &summary)?;
    info!(
        path = ?path,
        total = summary.statistics.total,
        failed = summary.statistics.failed,
        "Summary written"
    );
    Ok(summary)
}
