// probity/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug probity run ... to see every check step
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            project_dir,
            suite,
            select,
            tag,
            include_success,
            prepend_log,
        } => {
            commands::run::execute(
                project_dir,
                suite,
                select,
                tag,
                include_success,
                prepend_log,
            )
            .await
        }
        Commands::Summarize { project_dir, suite } => {
            commands::summarize::execute(project_dir, suite)
        }
        Commands::Clean { project_dir, suite } => commands::clean::execute(project_dir, suite),
    }
}
