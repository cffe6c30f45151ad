//! Relational store contract used by the account and statistics services
//!
//! Services only ever "run a statement, get rows back". Every user-controlled
//! value travels as a bound parameter (`?1`, `?2`, ...); statement text is
//! always a compile-time constant or built from a closed set of table names.

use thiserror::Error;

/// A single column value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Blob(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

/// One result row: column names mapped to values, in select order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    pub fn get_i64(&self, name: &str) -> Result<i64, StoreError> {
        match self.get(name) {
            Some(Value::Integer(value)) => Ok(*value),
            other => Err(StoreError::Decode(format!(
                "column '{name}' is not an integer: {other:?}"
            ))),
        }
    }

    pub fn get_text(&self, name: &str) -> Result<&str, StoreError> {
        match self.get(name) {
            Some(Value::Text(value)) => Ok(value),
            other => Err(StoreError::Decode(format!(
                "column '{name}' is not text: {other:?}"
            ))),
        }
    }

    /// Blob column, also accepting text for credentials written by older tools.
    pub fn get_blob(&self, name: &str) -> Result<&[u8], StoreError> {
        match self.get(name) {
            Some(Value::Blob(value)) => Ok(value),
            Some(Value::Text(value)) => Ok(value.as_bytes()),
            other => Err(StoreError::Decode(format!(
                "column '{name}' is not a blob: {other:?}"
            ))),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowSet {
    rows: Vec<Row>,
}

impl RowSet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl IntoIterator for RowSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Result of a mutating statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Executed {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

/// Failures reported by the store itself
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("cannot open store: {0}")]
    Connect(String),
    #[error("query failed: {0}")]
    Query(String),
    /// A uniqueness or key constraint rejected the statement
    #[error("constraint violated: {0}")]
    Conflict(String),
    #[error("unexpected column value: {0}")]
    Decode(String),
    /// The request deadline passed; any open transaction was rolled back
    #[error("request deadline passed")]
    Expired,
}

/// Synchronous query interface over a relational database
pub trait Store {
    fn query(&mut self, statement: &str, params: &[Value]) -> Result<RowSet, StoreError>;

    fn execute(&mut self, statement: &str, params: &[Value]) -> Result<Executed, StoreError>;

    /// True once the current request's deadline has passed.
    fn expired(&self) -> bool {
        false
    }

    /// Runs `work` as one atomic unit, rolling back when it fails.
    ///
    /// The deadline is checked again right before `COMMIT`: work that
    /// finishes late is rolled back and reported as [`StoreError::Expired`],
    /// so a timed-out request never leaves writes behind.
    fn atomically<T, F>(&mut self, work: F) -> Result<T, StoreError>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T, StoreError>,
    {
        self.execute("BEGIN IMMEDIATE", &[])?;
        let outcome = work(self).and_then(|value| {
            if self.expired() {
                return Err(StoreError::Expired);
            }
            self.execute("COMMIT", &[])?;
            Ok(value)
        });

        if let Err(e) = &outcome {
            // A failed COMMIT may leave the transaction open
            if let Err(rollback) = self.execute("ROLLBACK", &[]) {
                log::warn!("Rollback failed after '{}': {}", e, rollback);
            }
        }
        outcome
    }
}
