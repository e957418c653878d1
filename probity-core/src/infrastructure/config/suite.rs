// probity-core/src/infrastructure/config/suite.rs

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::suite::SuiteConfig;
use crate::infrastructure::error::InfrastructureError;

const SUITE_FILE_CANDIDATES: [&str; 2] = ["probity.yaml", "probity.yml"];

/// Finds and loads the suite file of a project directory.
#[instrument(skip(project_dir))]
pub fn load_suite_config(project_dir: &Path) -> Result<SuiteConfig, InfrastructureError> {
    let suite_path = find_suite_file(project_dir)?;
    load_suite_file(&suite_path)
}

pub fn find_suite_file(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in SUITE_FILE_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No suite file found in {:?}. Checked: {:?}",
        root, SUITE_FILE_CANDIDATES
    )))
}

/// Parses, layers environment overrides, then validates.
///
/// Unknown keys anywhere in the file are rejected by the parser.
pub fn load_suite_file(path: &Path) -> Result<SuiteConfig, InfrastructureError> {
    info!(path = ?path, "Loading suite");

    let content = fs::read_to_string(path)?;
    let mut config: SuiteConfig = serde_yaml::from_str(&content)?;
    config.base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    apply_env_overrides(&mut config);
    validate_suite(&config)?;

    info!(checks = config.checks.len(), tag = %config.tag, "Suite loaded");
    Ok(config)
}

fn validate_suite(config: &SuiteConfig) -> Result<(), InfrastructureError> {
    config.validate()?;

    let mut seen = HashSet::new();
    for check in &config.checks {
        check.validate_entry()?;
        if !seen.insert(check.id()) {
            return Err(InfrastructureError::ConfigError(format!(
                "Duplicate check id '{}': result artifacts would collide",
                check.id()
            )));
        }
    }
    Ok(())
}

fn apply_env_overrides(config: &mut SuiteConfig) {
    // PROBITY_TAG=nightly probity run
    if let Ok(val) = std::env::var("PROBITY_TAG") {
        info!(old = %config.tag, new = %val, "Overriding tag via ENV");
        config.tag = val;
    }
    if let Ok(val) = std::env::var("PROBITY_FILE_PREFIX") {
        info!(old = %config.file_prefix, new = %val, "Overriding file prefix via ENV");
        config.file_prefix = val;
    }
    if let Ok(val) = std::env::var("PROBITY_DATABASE") {
        info!(old = %config.database.path, new = %val, "Overriding database via ENV");
        config.database.path = val;
    }
}
