//! PostgreSQL adapter.
//!
//! The pipeline is synchronous, so the adapter owns a current-thread tokio
//! runtime and blocks on every call. One connection is opened at startup,
//! used serially, and closed when the adapter is dropped, on every exit path.

use crate::{ConnectionConfig, DataSource, DataSourceError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::{Column, ConnectOptions, Connection, Executor, Row, TypeInfo};
use std::future::Future;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tally_types::{ResultSet, Value};
use tokio::runtime::{Builder, Runtime};

/// A single, serially used PostgreSQL connection.
pub struct PostgresDataSource {
    runtime: Runtime,
    connection: Option<PgConnection>,
    statement_timeout: Duration,
    target: String,
}

impl PostgresDataSource {
    /// Opens the connection, bounded by `config.connect_timeout`.
    pub fn connect(config: &ConnectionConfig) -> Result<Self, DataSourceError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let options = connect_options(config)?;
        let target = config.describe();

        info!("Connecting to {}", target);
        let connection = run_bounded(&runtime, config.connect_timeout, options.connect())
            .map_err(|e| match e {
                DataSourceError::Query(msg) => DataSourceError::Connect(msg),
                other => other,
            })?;

        Ok(Self {
            runtime,
            connection: Some(connection),
            statement_timeout: config.statement_timeout,
            target,
        })
    }

    /// Closes the connection gracefully. Dropping the adapter does the same.
    pub fn close(mut self) -> Result<(), DataSourceError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<(), DataSourceError> {
        match self.connection.take() {
            Some(conn) => {
                debug!("Closing connection to {}", self.target);
                self.runtime
                    .block_on(conn.close())
                    .map_err(|e| DataSourceError::Connect(e.to_string()))
            }
            None => Ok(()),
        }
    }
}

impl DataSource for PostgresDataSource {
    fn execute(&mut self, sql: &str) -> Result<ResultSet, DataSourceError> {
        let sql = sql.trim().trim_end_matches(';');
        let timeout = self.statement_timeout;
        let started = Instant::now();

        let conn = self.connection.as_mut().ok_or_else(|| {
            DataSourceError::Connect("connection already closed".to_string())
        })?;
        let rows = run_bounded(&self.runtime, timeout, sqlx::query(sql).fetch_all(&mut *conn))?;

        let result = if rows.is_empty() {
            // No row to read the header from; ask the server for it instead.
            let described = run_bounded(&self.runtime, timeout, conn.describe(sql))?;
            ResultSet::new(described.columns().iter().map(|c| c.name().to_string()))?
        } else {
            rows_to_result_set(&rows)?
        };

        debug!(
            "Fetched {} rows in {:?} from {}",
            result.len(),
            started.elapsed(),
            self.target
        );
        Ok(result)
    }

    fn ping(&mut self) -> Result<(), DataSourceError> {
        let timeout = self.statement_timeout;
        let runtime = &self.runtime;
        let conn = self.connection.as_mut().ok_or_else(|| {
            DataSourceError::Connect("connection already closed".to_string())
        })?;
        run_bounded(runtime, timeout, conn.ping())
    }

    fn describe(&self) -> String {
        self.target.clone()
    }
}

impl Drop for PostgresDataSource {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("Failed to close connection to {}: {}", self.target, e);
        }
    }
}

fn connect_options(config: &ConnectionConfig) -> Result<PgConnectOptions, DataSourceError> {
    let options = match &config.url {
        Some(url) => PgConnectOptions::from_str(url)
            .map_err(|e| DataSourceError::Connect(format!("invalid DB_URL: {}", e)))?,
        None => PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database),
    };

    let options = options
        .application_name("tally")
        .options([(
            "statement_timeout",
            format!("{}ms", config.statement_timeout.as_millis()),
        )]);

    Ok(if config.echo {
        options.log_statements(log::LevelFilter::Info)
    } else {
        options.disable_statement_logging()
    })
}

/// Blocks on `fut`, failing with [`DataSourceError::Timeout`] past `limit`.
fn run_bounded<T, F>(runtime: &Runtime, limit: Duration, fut: F) -> Result<T, DataSourceError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    runtime.block_on(async {
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result.map_err(|e| DataSourceError::Query(e.to_string())),
            Err(_) => Err(DataSourceError::Timeout(limit)),
        }
    })
}

fn rows_to_result_set(rows: &[PgRow]) -> Result<ResultSet, DataSourceError> {
    let Some(first) = rows.first() else {
        return Ok(ResultSet::default());
    };
    let columns: Vec<(String, String)> = first
        .columns()
        .iter()
        .map(|c| (c.name().to_string(), c.type_info().name().to_string()))
        .collect();

    let mut result = ResultSet::new(columns.iter().map(|(name, _)| name.clone()))?;
    for row in rows {
        let mut cells = Vec::with_capacity(columns.len());
        for (index, (name, type_name)) in columns.iter().enumerate() {
            cells.push(decode_cell(row, index, name, type_name)?);
        }
        result.push_row(cells)?;
    }
    Ok(result)
}

fn decode_cell(
    row: &PgRow,
    index: usize,
    name: &str,
    type_name: &str,
) -> Result<Value, DataSourceError> {
    let decode_err = |e: sqlx::Error| DataSourceError::Query(format!("column '{}': {}", name, e));

    let value = match type_name {
        "BOOL" => row.try_get::<Option<bool>, _>(index).map(Value::from),
        "INT2" => row
            .try_get::<Option<i16>, _>(index)
            .map(|v| Value::from(v.map(i64::from))),
        "INT4" => row
            .try_get::<Option<i32>, _>(index)
            .map(|v| Value::from(v.map(i64::from))),
        "INT8" => row.try_get::<Option<i64>, _>(index).map(Value::from),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(index)
            .map(|v| Value::from(v.map(f64::from))),
        "FLOAT8" => row.try_get::<Option<f64>, _>(index).map(Value::from),
        "NUMERIC" => row.try_get::<Option<Decimal>, _>(index).map(Value::from),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "\"CHAR\"" | "UNKNOWN" => {
            row.try_get::<Option<String>, _>(index).map(Value::from)
        }
        "DATE" => row.try_get::<Option<NaiveDate>, _>(index).map(Value::from),
        "TIMESTAMP" => row.try_get::<Option<NaiveDateTime>, _>(index).map(Value::from),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)
            .map(|v| Value::from(v.map(|ts| ts.naive_utc()))),
        other => {
            return Err(DataSourceError::UnsupportedType {
                column: name.to_string(),
                type_name: other.to_string(),
            });
        }
    };
    value.map_err(decode_err)
}
