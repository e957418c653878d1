// probity-core/src/domain/suite/configuration.rs

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::domain::check::{DEFAULT_JSON_INDENT, OutputOptions};
use crate::domain::verification::{EvaluationMode, HttpExpectation};

pub const DEFAULT_RESULTS_FILE: &str = "test_results.json";
pub const DEFAULT_LOGS_FILE: &str = "test_logs.out";

/// A run: shared output options plus the checks, in execution order.
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub tag: String,

    #[serde(default)]
    pub file_prefix: String,

    #[serde(default = "default_results_file")]
    pub results_file: String,

    #[serde(default = "default_logs_file")]
    pub logs_file: String,

    #[validate(range(max = 16))]
    #[serde(default = "default_json_indent")]
    pub json_indent: usize,

    #[serde(default)]
    pub include_success: bool,

    #[serde(default = "default_true")]
    pub save_to_file: bool,

    #[validate(range(min = 1, max = 64))]
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub evaluation: EvaluationMode,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub checks: Vec<CheckConfig>,

    /// Directory relative paths are resolved against (the suite file's folder).
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl SuiteConfig {
    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            file_prefix: self.rebased_prefix(),
            json_indent: self.json_indent,
            save_to_file: self.save_to_file,
        }
    }

    /// `file_prefix` anchored at `base_dir` unless it is already absolute.
    pub fn rebased_prefix(&self) -> String {
        if self.base_dir.as_os_str().is_empty() || Path::new(&self.file_prefix).is_absolute() {
            self.file_prefix.clone()
        } else {
            format!("{}/{}", self.base_dir.display(), self.file_prefix)
        }
    }

    pub fn resolve_path(&self, raw: &str) -> PathBuf {
        self.base_dir.join(raw)
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            tag: String::new(),
            file_prefix: String::new(),
            results_file: default_results_file(),
            logs_file: default_logs_file(),
            json_indent: DEFAULT_JSON_INDENT,
            include_success: false,
            save_to_file: true,
            concurrency: default_concurrency(),
            evaluation: EvaluationMode::default(),
            database: DatabaseConfig::default(),
            checks: vec![],
            base_dir: PathBuf::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB database file, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CheckConfig {
    Http(HttpCheckConfig),
    Sql(SqlCheckConfig),
}

impl CheckConfig {
    pub fn id(&self) -> &str {
        match self {
            CheckConfig::Http(c) => &c.id,
            CheckConfig::Sql(c) => &c.id,
        }
    }

    pub fn validate_entry(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            CheckConfig::Http(c) => c.validate(),
            CheckConfig::Sql(c) => c.validate(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(deny_unknown_fields)]
pub struct HttpCheckConfig {
    #[validate(length(min = 1, message = "Check id cannot be empty"))]
    pub id: String,

    #[validate(url)]
    pub endpoint: String,

    /// Checked when the request is sent: an unknown verb fails the check,
    /// it does not abort the suite.
    #[serde(default = "default_verb")]
    pub verb: String,

    #[serde(default, deserialize_with = "scalar_strings")]
    pub headers: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "scalar_strings")]
    pub query_parameters: BTreeMap<String, String>,

    #[serde(default)]
    pub body: Option<Value>,

    #[serde(default)]
    pub verify_ssl: bool,

    #[serde(default = "HttpExpectation::status_ok")]
    pub evaluate: HttpExpectation,
}

/// How `params` reach the query.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParamMode {
    /// Bound by the driver, positionally, in declaration order.
    #[default]
    Connection,
    /// Rendered into the query text (Jinja) before execution.
    BeforeQuery,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(deny_unknown_fields)]
pub struct SqlCheckConfig {
    #[validate(length(min = 1, message = "Check id cannot be empty"))]
    pub id: String,

    /// Query text, or a path to a file holding it.
    pub query: Value,

    #[serde(default)]
    pub params: Map<String, Value>,

    #[serde(default)]
    pub param_mode: ParamMode,

    /// Column rules, or a path to a JSON/YAML document holding them.
    pub expected: Value,
}

/// Accepts numbers and booleans as well as strings (`page: 1`), stringified.
fn scalar_strings<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, Value>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => Ok((key, s)),
            Value::Number(_) | Value::Bool(_) => Ok((key, value.to_string())),
            other => Err(de::Error::custom(format!(
                "`{key}` must be a string, number or boolean, got {other}"
            ))),
        })
        .collect()
}

fn default_results_file() -> String {
    DEFAULT_RESULTS_FILE.to_string()
}
fn default_logs_file() -> String {
    DEFAULT_LOGS_FILE.to_string()
}
fn default_json_indent() -> usize {
    DEFAULT_JSON_INDENT
}
fn default_concurrency() -> usize {
    1
}
fn default_true() -> bool {
    true
}
fn default_verb() -> String {
    "get".to_string()
}
fn default_database_path() -> String {
    ":memory:".to_string()
}
