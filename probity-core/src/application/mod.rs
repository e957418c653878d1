// probity-core/src/application/mod.rs

pub mod aggregate;
pub mod check;
pub mod clean;
pub mod function_check;
pub mod http_check;
pub mod ports;
pub mod runner;
pub mod sql_check;
pub mod suite;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI write `use probity_core::application::{build_runner, Runner};`
// without knowing the file layout.

pub use aggregate::{aggregate, aggregate_and_save};
pub use check::Check;
pub use clean::clean_artifacts;
pub use function_check::{CheckFn, FunctionCheck};
pub use http_check::HttpCheck;
pub use runner::{CheckReport, CheckStatus, RunReport, Runner, RunnerOptions};
pub use sql_check::SqlCheck;
pub use suite::{Collaborators, build_runner, clean_suite, summarize_suite, suite_entries};
