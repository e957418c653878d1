// probity-core/src/domain/verification/mod.rs
//
// Judges a fetched payload against declared rules.
// Resolver -> Comparator / Operator -> Engine.

pub mod comparator;
pub mod engine;
pub mod operator;
pub mod resolver;
pub mod rules;

pub use comparator::Verdict;
pub use engine::{EvaluationMode, verify_response, verify_rows};
pub use operator::Operator;
pub use resolver::ResolutionContext;
pub use rules::{ColumnRule, HttpExpectation, RowExpectation};
