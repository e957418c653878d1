// probity-core/src/application/clean.rs

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::ProbityError;

/// Deletes the given artifacts and returns the ones that existed.
///
/// Every target must live under `project_dir`, otherwise nothing is deleted.
pub fn clean_artifacts(targets: &[PathBuf], project_dir: &Path) -> Result<Vec<PathBuf>, ProbityError> {
    tracing::info!("🧹 Removing run artifacts...");

    // Path traversal guard
    if let Some(unsafe_target) = targets.iter().find(|t| !is_contained(project_dir, t)) {
        return Err(ProbityError::UnsafePath(unsafe_target.display().to_string()));
    }

    let mut removed = Vec::new();
    for target in targets {
        if target.is_file() {
            fs::remove_file(target)?;
            tracing::debug!(path = ?target, "Artifact removed");
            removed.push(target.clone());
        }
    }

    Ok(removed)
}

fn is_contained(root: &Path, path: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
