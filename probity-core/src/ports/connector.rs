// probity-core/src/ports/connector.rs

// This file defines what SQL checks need from a database, without knowing how it's done.
// One connection per check: acquired from a factory, probed, used for one query, closed.

use crate::domain::payload::RowSet;
use crate::error::ProbityError;
use async_trait::async_trait;
use serde_json::Value;

pub const LIVENESS_PROBE: &str = "SELECT 1";

#[async_trait]
pub trait Connector: Send + Sync {
    async fn execute(&self, query: &str) -> Result<(), ProbityError>;

    /// Runs `query` with positional parameters and collects every row.
    async fn query_rows(&self, query: &str, params: &[Value]) -> Result<RowSet, ProbityError>;

    /// Releases the underlying handle. Later calls fail.
    async fn close(&self) -> Result<(), ProbityError>;

    fn engine_name(&self) -> &str;

    async fn ping(&self) -> Result<(), ProbityError> {
        self.execute(LIVENESS_PROBE).await
    }
}

#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Connector>, ProbityError>;
}
