// probity/src/commands/clean.rs
//
// USE CASE: Delete run artifacts.

use std::path::PathBuf;

use probity_core::application::clean_suite;

use super::load_suite;

pub fn execute(project_dir: PathBuf, suite: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_suite(&project_dir, suite.as_ref())?;

    match clean_suite(&config) {
        Ok(removed) => {
            for path in &removed {
                println!("   🗑️  Artifact removed: {}", path.display());
            }
            println!("✨ {} artifact(s) removed.", removed.len());
        }
        Err(e) => {
            eprintln!("❌ Clean failed: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}
