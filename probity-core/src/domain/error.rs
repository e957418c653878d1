// probity-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

/// Configuration and rule errors.
///
/// These abort the evaluation of a check. They are recorded in the check's
/// result artifact and then surfaced to the caller as a hard error.
#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("ERROR. unrecognized evaluate attribute: {0}")]
    #[diagnostic(
        code(probity::domain::attribute),
        help("Use a response field (status_code, text, headers, ...), a check field (http_code, endpoint, ...) or a top-level JSON key.")
    )]
    UnrecognizedAttribute(String),

    #[error("expected column: {column} not found in results: {row}")]
    #[diagnostic(code(probity::domain::column))]
    MissingColumn { column: String, row: String },

    #[error("ERROR. unknown comparison operator '{0}'")]
    #[diagnostic(
        code(probity::domain::operator),
        help("Supported operators: =, !=, >=, <=, <, >")
    )]
    UnknownOperator(String),

    #[error("ERROR. value: {0} is not a mapping")]
    #[diagnostic(code(probity::domain::expectation))]
    InvalidExpectation(String),

    #[error("ERROR. invalid rule for '{attribute}': {reason}")]
    #[diagnostic(code(probity::domain::rule))]
    InvalidRule { attribute: String, reason: String },

    #[error("ERROR. invalid regex pattern '{pattern}'")]
    #[diagnostic(code(probity::domain::regex))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("ERROR. Error reading {path}. {reason}")]
    #[diagnostic(code(probity::domain::reference))]
    UnreadableReference { path: String, reason: String },

    #[error("ERROR. value: {0} is not a string literal")]
    #[diagnostic(code(probity::domain::query))]
    InvalidQuery(String),

    #[error("Check '{0}' is registered more than once")]
    #[diagnostic(
        code(probity::domain::duplicate_check),
        help("Every check needs a distinct id so its result artifact path is unique.")
    )]
    DuplicateCheck(String),
}
