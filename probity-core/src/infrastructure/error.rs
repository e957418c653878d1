// probity-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(probity::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Connection already released")]
    #[diagnostic(code(probity::infra::database::closed))]
    ConnectionClosed,

    #[error("Connection lock poisoned")]
    #[diagnostic(code(probity::infra::database::poisoned))]
    Poisoned,
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- NETWORK ---
    #[error("HTTP Transport Error: {0}")]
    #[diagnostic(code(probity::infra::http))]
    Http(#[from] reqwest::Error),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(probity::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML / JSON ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(probity::infra::yaml),
        help("Check your YAML syntax (indentation, types, unknown keys).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(probity::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(probity::infra::validation))]
    Validation(#[from] validator::ValidationErrors),

    #[error("Suite configuration not found at '{0}'")]
    #[diagnostic(code(probity::infra::config_missing))]
    ConfigNotFound(String),

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(
        code(probity::infra::template),
        help("Check your Jinja syntax ({{ ... }}) inside the SQL query.")
    )]
    TemplateError(#[from] minijinja::Error),
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
