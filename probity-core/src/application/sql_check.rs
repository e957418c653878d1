// probity-core/src/application/sql_check.rs

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::application::check::{Check, Verdicts, conclude};
use crate::application::ports::TemplateEngine;
use crate::domain::check::{CheckIdentity, CheckOutcome, OutputOptions};
use crate::domain::payload::RowSet;
use crate::domain::suite::{ParamMode, SqlCheckConfig};
use crate::domain::verification::{EvaluationMode, RowExpectation, verify_rows};
use crate::error::ProbityError;
use crate::infrastructure::config::{read_expectation, read_query};
use crate::ports::connector::{ConnectionFactory, Connector};

pub const CONNECT_FAILED: &str = "ERROR. failed to connect to database";

pub struct SqlCheck {
    identity: CheckIdentity,
    output: OutputOptions,
    mode: EvaluationMode,
    config: SqlCheckConfig,
    /// Relative query/expectation paths are resolved from here.
    base_dir: PathBuf,
    connections: Arc<dyn ConnectionFactory>,
    renderer: Arc<dyn TemplateEngine>,
}

impl SqlCheck {
    pub fn new(
        tag: &str,
        config: SqlCheckConfig,
        connections: Arc<dyn ConnectionFactory>,
        renderer: Arc<dyn TemplateEngine>,
    ) -> Self {
        Self {
            identity: CheckIdentity::new(tag, config.id.clone()),
            output: OutputOptions::default(),
            mode: EvaluationMode::default(),
            config,
            base_dir: PathBuf::new(),
            connections,
            renderer,
        }
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    fn read_inputs(&self) -> Result<(String, RowExpectation), ProbityError> {
        let query = read_query(&self.config.query, &self.base_dir)?;
        let expected = read_expectation(&self.config.expected, &self.base_dir)?;
        Ok((query, RowExpectation::from_value(&expected)?))
    }

    /// Acquire, probe, query, release. The connection is closed on every path
    /// once it was acquired.
    async fn fetch(&self, query: &str) -> Result<RowSet, Vec<String>> {
        let conn = match self.connections.connect().await {
            Ok(conn) => conn,
            Err(e) => {
                debug!(error = %e, "Connection refused");
                return Err(vec![CONNECT_FAILED.to_string()]);
            }
        };

        let fetched = self.fetch_with(conn.as_ref(), query).await;

        if let Err(e) = conn.close().await {
            warn!(error = %e, engine = conn.engine_name(), "Failed to release connection");
        }
        fetched
    }

    async fn fetch_with(&self, conn: &dyn Connector, query: &str) -> Result<RowSet, Vec<String>> {
        if let Err(e) = conn.ping().await {
            return Err(vec![
                format!("ERROR. execute SQL SELECT 1 failed. {}", e),
                CONNECT_FAILED.to_string(),
            ]);
        }

        let params = Value::Object(self.config.params.clone());
        let (sql, bound) = match self.config.param_mode {
            ParamMode::Connection => (
                query.to_string(),
                self.config.params.values().cloned().collect::<Vec<_>>(),
            ),
            ParamMode::BeforeQuery if self.config.params.is_empty() => (query.to_string(), vec![]),
            ParamMode::BeforeQuery => match self.renderer.render(query, &params) {
                Ok(rendered) => (rendered, vec![]),
                Err(e) => return Err(vec![fetch_error(query, &params, &e)]),
            },
        };

        debug!(sql = %sql, bound = bound.len(), "Running query");
        conn.query_rows(&sql, &bound)
            .await
            .map_err(|e| vec![fetch_error(&sql, &params, &e)])
    }
}

fn fetch_error(query: &str, params: &Value, cause: &ProbityError) -> String {
    format!(
        "ERROR. Failed to fetch query {} with arguments {}. {}",
        query, params, cause
    )
}

#[async_trait]
impl Check for SqlCheck {
    fn identity(&self) -> &CheckIdentity {
        &self.identity
    }

    fn output(&self) -> &OutputOptions {
        &self.output
    }

    #[instrument(skip(self), fields(test_id = %self.identity.test_id))]
    async fn run(&self) -> Result<CheckOutcome, ProbityError> {
        let mut verdicts = Verdicts::default();

        let (query, expectation) = match self.read_inputs() {
            Ok(inputs) => inputs,
            Err(e) => {
                verdicts.abort(e);
                return conclude(&self.identity, &self.output, verdicts);
            }
        };

        let rows = match self.fetch(&query).await {
            Ok(rows) => Some(rows),
            Err(errors) => {
                verdicts.errors.extend(errors);
                None
            }
        };

        match verify_rows(&expectation, rows.as_ref(), self.mode) {
            Ok(failures) => verdicts.errors.extend(failures),
            Err(e) => verdicts.abort(e.into()),
        }

        conclude(&self.identity, &self.output, verdicts)
    }
}
