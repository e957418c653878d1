// probity-core/src/lib.rs

// 1. Documentation is tracked module by module
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts towards the outside world (SQL connections, HTTP client).
pub mod ports;

// 2. Domain (business core)
// Check identity, resolver, comparator, verification engine, run statistics.
// Depends on NOTHING else (neither infra nor app).
pub mod domain;

// 3. Infrastructure (Adapters)
// Technical implementations (DuckDB, reqwest, result artifacts, suite files, Jinja).
// Depends on Domain and Ports.
pub mod infrastructure;

// 4. Application (Use Cases)
// Orchestration (check executors, runner, aggregation, cleanup).
// Depends on Domain, Infra and Ports.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// use probity_core::ProbityError;
pub use error::ProbityError;
