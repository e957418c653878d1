// probity/src/commands/mod.rs

pub mod clean;
pub mod run;
pub mod summarize;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use std::path::{Path, PathBuf};

use probity_core::domain::summary::RunSummary;
use probity_core::domain::suite::SuiteConfig;
use probity_core::infrastructure::config::{load_suite_config, load_suite_file};

/// `--suite` wins over discovery in `--project-dir`.
///
/// Load errors are rendered as miette diagnostics (code + help) before bailing.
pub fn load_suite(project_dir: &Path, suite: Option<&PathBuf>) -> anyhow::Result<SuiteConfig> {
    println!("⚙️  Loading suite...");
    let loaded = match suite {
        Some(path) => load_suite_file(path),
        None => load_suite_config(project_dir),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            let source = suite.map_or(project_dir, PathBuf::as_path);
            anyhow::bail!("Failed to load suite from {:?}", source);
        }
    };

    let name = if config.name.is_empty() { "<unnamed>" } else { &config.name };
    println!("   Suite: {} ({} checks)", name, config.checks.len());
    Ok(config)
}

pub fn summary_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Check", "Status", "Errors"]);

    for id in &summary.test_ids {
        let row = match summary.failed.get(id) {
            Some(result) => vec![
                Cell::new(id),
                Cell::new("FAIL").fg(Color::Red),
                Cell::new(result.errors.as_deref().unwrap_or_default()),
            ],
            None => vec![
                Cell::new(id),
                Cell::new("PASS").fg(Color::Green),
                Cell::new(""),
            ],
        };
        table.add_row(row);
    }
    table
}

pub fn print_statistics(summary: &RunSummary) {
    let stats = summary.statistics;
    println!(
        "📊 Total: {} | Passed: {} | Failed: {}",
        stats.total, stats.passed, stats.failed
    );
}
