// probity-core/src/infrastructure/adapters/mod.rs

pub mod duckdb;
pub mod http;

pub use self::duckdb::{DuckDBConnectionFactory, DuckDBConnector};
pub use self::http::ReqwestClient;
