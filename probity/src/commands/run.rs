// probity/src/commands/run.rs
//
// USE CASE: Run a suite of checks.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use probity_core::application::{CheckStatus, Collaborators, build_runner};
use probity_core::domain::suite::SuiteConfig;
use probity_core::infrastructure::adapters::duckdb::DuckDBConnectionFactory;
use probity_core::infrastructure::adapters::http::ReqwestClient;
use probity_core::infrastructure::compiler::jinja::JinjaRenderer;

use super::{load_suite, print_statistics, summary_table};

const IN_MEMORY: &str = ":memory:";

pub async fn execute(
    project_dir: PathBuf,
    suite: Option<PathBuf>,
    select: Vec<String>,
    tag: Option<String>,
    include_success: bool,
    prepend_log: Option<String>,
) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    // A. Load the Suite (Infra), CLI flags win over the file
    let mut config = load_suite(&project_dir, suite.as_ref())?;
    if let Some(tag) = tag {
        config.tag = tag;
    }
    config.include_success |= include_success;

    // B. Instantiate the Adapters
    let collaborators = collaborators(&config)?;

    // C. Run the Checks (Application Layer)
    let runner = build_runner(&config, &collaborators, &select)?;
    println!("🚀 Running {} check(s)...", runner.len());

    let report = match runner.run().await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("\n💥 CRITICAL RUN ERROR: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(text) = prepend_log {
        runner
            .insert_logs(&text)
            .context("Failed to prepend text to the run log")?;
    }

    for check in &report.checks {
        match &check.status {
            CheckStatus::Ok => println!("   ✅ {}", check.test_id),
            CheckStatus::Fail(_) => println!("   ❌ {}", check.test_id),
            CheckStatus::Error(e) => println!("   💥 {} ({})", check.test_id, e),
        }
    }

    println!("\n{}", summary_table(&report.summary));
    print_statistics(&report.summary);
    println!("📝 Log: {}", runner.log().path().display());

    if report.was_successful() {
        println!("\n✨ SUCCESS! Run finished in {:.2?}", start.elapsed());
    } else {
        eprintln!(
            "\n❌ FAILURE. {} failed, {} errored.",
            report.failures(),
            report.errors()
        );
        // Exit with error code for CI/CD
        std::process::exit(1);
    }

    Ok(())
}

fn collaborators(config: &SuiteConfig) -> anyhow::Result<Collaborators> {
    let db_path = if config.database.path == IN_MEMORY {
        IN_MEMORY.to_string()
    } else {
        config
            .resolve_path(&config.database.path)
            .to_string_lossy()
            .into_owned()
    };

    tracing::debug!(db = %db_path, "Opening database");
    let connections = DuckDBConnectionFactory::new(&db_path)
        .with_context(|| format!("Failed to initialize DuckDB at {}", db_path))?;
    let http = ReqwestClient::new().context("Failed to initialize the HTTP client")?;

    Ok(Collaborators {
        http: Arc::new(http),
        connections: Arc::new(connections),
        renderer: Arc::new(JinjaRenderer::new()),
    })
}
