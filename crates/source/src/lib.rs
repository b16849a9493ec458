//! Data source abstractions for the reporting pipeline.
//!
//! A data source executes one complete, fixed query string and returns a
//! [`ResultSet`]. It never retries and never rewrites the SQL it is given.
//!
//! ## Available Sources
//!
//! - [`StaticDataSource`]: canned results keyed by SQL text (tests, offline runs)
//! - [`PostgresDataSource`]: a single PostgreSQL connection (feature: `postgres`)
//!
//! ## Example
//!
//! ```ignore
//! use tally_source::{DataSource, PostgresDataSource, ConnectionConfig};
//!
//! let mut source = PostgresDataSource::connect(&ConnectionConfig::from_env())?;
//! let rows = source.execute("SELECT 1 AS one")?;
//! assert_eq!(rows.len(), 1);
//! ```

mod config;
mod error;
#[cfg(feature = "postgres")]
mod postgres;

pub use config::{ConnectionConfig, normalize_url};
pub use error::DataSourceError;
#[cfg(feature = "postgres")]
pub use postgres::PostgresDataSource;

use std::collections::HashMap;
use tally_types::ResultSet;

/// A relational store the pipeline can run report queries against.
///
/// Calls are strictly sequential: the pipeline never issues a second query
/// before the previous one returned.
pub trait DataSource {
    /// Executes a complete query and returns every row in store order.
    fn execute(&mut self, sql: &str) -> Result<ResultSet, DataSourceError>;

    /// Cheap liveness check.
    fn ping(&mut self) -> Result<(), DataSourceError> {
        self.execute("SELECT 1").map(|_| ())
    }

    /// Human-readable name of the backing store, for logs.
    fn describe(&self) -> String {
        "data source".to_string()
    }
}

impl<D: DataSource + ?Sized> DataSource for Box<D> {
    fn execute(&mut self, sql: &str) -> Result<ResultSet, DataSourceError> {
        (**self).execute(sql)
    }

    fn ping(&mut self) -> Result<(), DataSourceError> {
        (**self).ping()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// An in-memory source that answers known SQL strings with canned results.
///
/// Lookups compare whitespace-normalized SQL, so indentation differences in
/// query text do not matter.
#[derive(Debug, Default, Clone)]
pub struct StaticDataSource {
    results: HashMap<String, ResultSet>,
    executed: Vec<String>,
}

impl StaticDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the result returned for `sql`.
    pub fn with_result(mut self, sql: &str, result: ResultSet) -> Self {
        self.insert(sql, result);
        self
    }

    pub fn insert(&mut self, sql: &str, result: ResultSet) {
        self.results.insert(squash_whitespace(sql), result);
    }

    /// The SQL strings executed so far, in call order.
    pub fn executed(&self) -> &[String] {
        &self.executed
    }
}

impl DataSource for StaticDataSource {
    fn execute(&mut self, sql: &str) -> Result<ResultSet, DataSourceError> {
        let key = squash_whitespace(sql);
        self.executed.push(key.clone());
        self.results
            .get(&key)
            .cloned()
            .ok_or(DataSourceError::MissingResult(key))
    }

    fn ping(&mut self) -> Result<(), DataSourceError> {
        Ok(())
    }

    fn describe(&self) -> String {
        format!("in-memory source ({} queries)", self.results.len())
    }
}

fn squash_whitespace(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_types::Value;

    fn one_row() -> ResultSet {
        ResultSet::from_rows(["one"], vec![vec![Value::Int(1)]]).unwrap()
    }

    #[test]
    fn static_source_ignores_formatting() {
        let mut source = StaticDataSource::new().with_result("SELECT 1\n   AS one;", one_row());
        let result = source.execute("  SELECT 1 AS one;").unwrap();
        assert_eq!(result, one_row());
        assert_eq!(source.executed(), ["SELECT 1 AS one;"]);
    }

    #[test]
    fn static_source_reports_unknown_sql() {
        let mut source = StaticDataSource::new();
        let err = source.execute("SELECT 2").unwrap_err();
        assert!(matches!(err, DataSourceError::MissingResult(sql) if sql == "SELECT 2"));
    }

    #[test]
    fn boxed_source_delegates() {
        let mut source: Box<dyn DataSource> =
            Box::new(StaticDataSource::new().with_result("SELECT 1 AS one", one_row()));
        assert!(source.ping().is_ok());
        assert_eq!(source.execute("SELECT 1 AS one").unwrap().len(), 1);
    }
}
