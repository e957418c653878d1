// probity/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "probity")]
#[command(about = "Declarative HTTP & SQL checks with machine-readable results", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs the checks of a suite, then writes the log and the summary
    Run {
        /// Project directory (holds probity.yaml)
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Explicit suite file, instead of discovering one in the project directory
        #[arg(long)]
        suite: Option<PathBuf>,

        /// Run only these checks (repeatable)
        #[arg(long, short)]
        select: Vec<String>,

        /// Tag for this run (namespaces the artifact file names)
        #[arg(long)]
        tag: Option<String>,

        /// Embed passed results in the summary too
        #[arg(long, default_value = "false")]
        include_success: bool,

        /// Text to put ahead of the run log (CI job URL, deploy id...)
        #[arg(long)]
        prepend_log: Option<String>,
    },

    /// 📊 Rebuilds the summary from result artifacts already on disk
    Summarize {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        suite: Option<PathBuf>,
    },

    /// 🧹 Deletes the result artifacts, summary and log of a suite
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        suite: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_run_defaults() -> Result<()> {
        let args = Cli::parse_from(["probity", "run"]);
        match args.command {
            Commands::Run {
                project_dir,
                suite,
                select,
                tag,
                include_success,
                prepend_log,
            } => {
                assert_eq!(project_dir.to_string_lossy(), ".");
                assert_eq!(suite, None);
                assert!(select.is_empty());
                assert_eq!(tag, None);
                assert!(!include_success);
                assert_eq!(prepend_log, None);
                Ok(())
            }
            _ => bail!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_select() -> Result<()> {
        let args = Cli::parse_from([
            "probity",
            "run",
            "--select",
            "health",
            "-s",
            "adults",
            "--project-dir",
            "/tmp",
            "--tag",
            "nightly",
        ]);
        match args.command {
            Commands::Run {
                project_dir,
                select,
                tag,
                ..
            } => {
                assert_eq!(project_dir.to_string_lossy(), "/tmp");
                assert_eq!(select, vec!["health", "adults"]);
                assert_eq!(tag.as_deref(), Some("nightly"));
                Ok(())
            }
            _ => bail!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_summarize() -> Result<()> {
        let args = Cli::parse_from(["probity", "summarize", "--suite", "checks/probity.yaml"]);
        match args.command {
            Commands::Summarize { suite, .. } => {
                assert_eq!(suite, Some(PathBuf::from("checks/probity.yaml")));
                Ok(())
            }
            _ => bail!("Expected Summarize command"),
        }
    }

    #[test]
    fn test_cli_parse_clean() -> Result<()> {
        let args = Cli::parse_from(["probity", "clean", "--project-dir", "suite"]);
        match args.command {
            Commands::Clean { project_dir, suite } => {
                assert_eq!(project_dir.to_string_lossy(), "suite");
                assert_eq!(suite, None);
                Ok(())
            }
            _ => bail!("Expected Clean command"),
        }
    }
}
