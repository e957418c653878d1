// probity/src/commands/summarize.rs
//
// USE CASE: Rebuild the summary from persisted results, without running checks.

use std::path::PathBuf;

use probity_core::application::summarize_suite;

use super::{load_suite, print_statistics, summary_table};

pub fn execute(project_dir: PathBuf, suite: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_suite(&project_dir, suite.as_ref())?;

    match summarize_suite(&config) {
        Ok(summary) => {
            println!("{}", summary_table(&summary));
            print_statistics(&summary);
            if !summary.all_passed() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("❌ Summarize failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
