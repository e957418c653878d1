pub mod check;
pub mod error;
pub mod payload;
pub mod suite;
pub mod summary;
pub mod verification;

// Re-exports to keep imports short elsewhere
pub use check::{CheckIdentity, CheckOutcome, CheckResult, OutputOptions};
pub use error::DomainError;
pub use payload::{HttpRequest, HttpResponse, HttpVerb, Row, RowSet};
pub use summary::{RunSummary, Statistics};
