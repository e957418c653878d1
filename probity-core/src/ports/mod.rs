// probity-core/src/ports/mod.rs

pub mod connector;
pub mod http;

pub use connector::{ConnectionFactory, Connector};
pub use http::HttpClient;
