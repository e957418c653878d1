// probity-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, SecondsFormat, Utc};
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::{Config, Connection};
use serde_json::{Map, Number, Value};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// Hexagonal imports
use crate::domain::payload::{Row, RowSet};
use crate::error::ProbityError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::{ConnectionFactory, Connector, LIVENESS_PROBE};

pub struct DuckDBConnector {
    conn: Mutex<Option<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        Ok(Self::from_connection(open(db_path)?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>, ProbityError> {
        self.conn
            .lock()
            .map_err(|_| database_error(DatabaseError::Poisoned))
    }
}

fn open(db_path: &str) -> Result<Connection, InfrastructureError> {
    let config = Config::default();
    let conn = if db_path == ":memory:" {
        Connection::open_in_memory_with_flags(config)?
    } else {
        Connection::open_with_flags(db_path, config)?
    };
    Ok(conn)
}

fn database_error(err: DatabaseError) -> ProbityError {
    ProbityError::Infrastructure(InfrastructureError::Database(err))
}

fn duck(err: duckdb::Error) -> ProbityError {
    database_error(DatabaseError::DuckDB(err))
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn execute(&self, query: &str) -> Result<(), ProbityError> {
        let guard = self.lock()?;
        let conn = guard
            .as_ref()
            .ok_or_else(|| database_error(DatabaseError::ConnectionClosed))?;
        conn.execute(query, []).map(|_rows| ()).map_err(duck)
    }

    async fn query_rows(&self, query: &str, params: &[Value]) -> Result<RowSet, ProbityError> {
        let guard = self.lock()?;
        let conn = guard
            .as_ref()
            .ok_or_else(|| database_error(DatabaseError::ConnectionClosed))?;

        let bound: Vec<DuckValue> = params.iter().map(to_duck_value).collect();
        let mut stmt = conn.prepare(query).map_err(duck)?;
        let mut rows = stmt
            .query(duckdb::params_from_iter(bound.iter()))
            .map_err(duck)?;

        let column_names: Vec<String> = rows
            .as_ref()
            .map(|s| s.column_names())
            .unwrap_or_default();

        let mut collected = Vec::new();
        while let Some(row) = rows.next().map_err(duck)? {
            let mut record = Row::new();
            for (idx, name) in column_names.iter().enumerate() {
                let value: DuckValue = row.get(idx).map_err(duck)?;
                record.insert(name.clone(), from_duck_value(value));
            }
            collected.push(record);
        }

        debug!(rows = collected.len(), "Query fetched");
        Ok(RowSet::new(collected))
    }

    async fn ping(&self) -> Result<(), ProbityError> {
        let guard = self.lock()?;
        let conn = guard
            .as_ref()
            .ok_or_else(|| database_error(DatabaseError::ConnectionClosed))?;
        conn.query_row(LIVENESS_PROBE, [], |row| row.get::<_, i32>(0))
            .map(|_| ())
            .map_err(duck)
    }

    async fn close(&self) -> Result<(), ProbityError> {
        let mut guard = self.lock()?;
        match guard.take() {
            Some(conn) => conn.close().map_err(|(_conn, e)| duck(e)),
            None => Ok(()),
        }
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

/// Hands out one connection per check, all attached to the same database.
pub struct DuckDBConnectionFactory {
    root: Arc<Mutex<Connection>>,
}

impl DuckDBConnectionFactory {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        Ok(Self {
            root: Arc::new(Mutex::new(open(db_path)?)),
        })
    }
}

#[async_trait]
impl ConnectionFactory for DuckDBConnectionFactory {
    async fn connect(&self) -> Result<Box<dyn Connector>, ProbityError> {
        let root = self
            .root
            .lock()
            .map_err(|_| database_error(DatabaseError::Poisoned))?;
        let conn = root.try_clone().map_err(duck)?;
        Ok(Box::new(DuckDBConnector::from_connection(conn)))
    }
}

fn to_duck_value(value: &Value) -> DuckValue {
    match value {
        Value::Null => DuckValue::Null,
        Value::Bool(b) => DuckValue::Boolean(*b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => DuckValue::BigInt(i),
            (None, Some(f)) => DuckValue::Double(f),
            (None, None) => DuckValue::Text(n.to_string()),
        },
        Value::String(s) => DuckValue::Text(s.clone()),
        other => DuckValue::Text(other.to_string()),
    }
}

fn from_duck_value(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(i) => Value::from(i),
        DuckValue::SmallInt(i) => Value::from(i),
        DuckValue::Int(i) => Value::from(i),
        DuckValue::BigInt(i) => Value::from(i),
        DuckValue::HugeInt(i) => i64::try_from(i)
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(i.to_string())),
        DuckValue::UTinyInt(i) => Value::from(i),
        DuckValue::USmallInt(i) => Value::from(i),
        DuckValue::UInt(i) => Value::from(i),
        DuckValue::UBigInt(i) => Value::from(i),
        DuckValue::Float(f) => float(f64::from(f)),
        DuckValue::Double(f) => float(f),
        DuckValue::Decimal(d) => d
            .to_string()
            .parse::<f64>()
            .map(float)
            .unwrap_or_else(|_| Value::String(d.to_string())),
        DuckValue::Text(s) => Value::String(s),
        DuckValue::Blob(bytes) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        DuckValue::Enum(label) => Value::String(label),
        DuckValue::Date32(days) => date(days),
        DuckValue::Timestamp(unit, v) => timestamp(unit, v),
        DuckValue::Time64(unit, v) => time_of_day(unit, v),
        DuckValue::Interval {
            months,
            days,
            nanos,
        } => Value::String(interval(months, days, nanos)),
        DuckValue::List(items) | DuckValue::Array(items) => {
            Value::Array(items.into_iter().map(from_duck_value).collect())
        }
        DuckValue::Struct(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, v)| (name.clone(), from_duck_value(v.clone())))
                .collect(),
        ),
        DuckValue::Map(entries) => {
            let mut object = Map::new();
            for (key, v) in entries.iter() {
                let key = match from_duck_value(key.clone()) {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                object.insert(key, from_duck_value(v.clone()));
            }
            Value::Object(object)
        }
        DuckValue::Union(inner) => from_duck_value(*inner),
    }
}

/// Days since the epoch, as `YYYY-MM-DD`.
fn date(days: i32) -> Value {
    DateTime::<Utc>::from_timestamp(i64::from(days) * 86_400, 0)
        .map(|dt| Value::String(dt.date_naive().to_string()))
        .unwrap_or_else(|| Value::from(days))
}

/// RFC 3339 in UTC.
fn timestamp(unit: TimeUnit, v: i64) -> Value {
    DateTime::<Utc>::from_timestamp_micros(unit.to_micros(v))
        .map(|dt| Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
        .unwrap_or_else(|| Value::from(v))
}

fn time_of_day(unit: TimeUnit, v: i64) -> Value {
    let micros = unit.to_micros(v);
    let secs = u32::try_from(micros.div_euclid(1_000_000)).ok();
    let nanos = u32::try_from(micros.rem_euclid(1_000_000) * 1_000).ok();
    secs.zip(nanos)
        .and_then(|(s, n)| NaiveTime::from_num_seconds_from_midnight_opt(s, n))
        .map(|t| Value::String(t.to_string()))
        .unwrap_or_else(|| Value::from(v))
}

/// Same shape DuckDB prints: `1 year 2 months 3 days 04:05:06`.
fn interval(months: i32, days: i32, nanos: i64) -> String {
    fn unit(n: i64, name: &str) -> String {
        if n.abs() == 1 {
            format!("{n} {name}")
        } else {
            format!("{n} {name}s")
        }
    }

    let mut parts = Vec::new();
    let (years, months) = (months / 12, months % 12);
    if years != 0 {
        parts.push(unit(i64::from(years), "year"));
    }
    if months != 0 {
        parts.push(unit(i64::from(months), "month"));
    }
    if days != 0 {
        parts.push(unit(i64::from(days), "day"));
    }
    if nanos != 0 || parts.is_empty() {
        let sign = if nanos < 0 { "-" } else { "" };
        let micros = (nanos / 1_000).unsigned_abs();
        let (secs, frac) = (micros / 1_000_000, micros % 1_000_000);
        let mut clock = format!(
            "{sign}{:02}:{:02}:{:02}",
            secs / 3_600,
            (secs / 60) % 60,
            secs % 60
        );
        if frac != 0 {
            clock.push_str(&format!(".{frac:06}"));
        }
        parts.push(clock);
    }
    parts.join(" ")
}

fn float(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}
