//! Store doubles for unit tests

use crate::store::{Executed, RowSet, Store, StoreError, Value};

/// Wraps a store and records every statement sent through it
pub struct Recording<S> {
    pub inner: S,
    pub statements: Vec<String>,
}

impl<S: Store> Recording<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            statements: Vec::new(),
        }
    }

    pub fn mutations(&self) -> usize {
        self.statements
            .iter()
            .filter(|s| s.starts_with("INSERT") || s.starts_with("UPDATE") || s.starts_with("DELETE"))
            .count()
    }
}

impl<S: Store> Store for Recording<S> {
    fn query(&mut self, statement: &str, params: &[Value]) -> Result<RowSet, StoreError> {
        self.statements.push(statement.trim().to_string());
        self.inner.query(statement, params)
    }

    fn execute(&mut self, statement: &str, params: &[Value]) -> Result<Executed, StoreError> {
        self.statements.push(statement.trim().to_string());
        self.inner.execute(statement, params)
    }

    fn expired(&self) -> bool {
        self.inner.expired()
    }
}

/// Store whose every call fails as an unreachable database would
pub struct Unreachable;

impl Store for Unreachable {
    fn query(&mut self, _statement: &str, _params: &[Value]) -> Result<RowSet, StoreError> {
        Err(StoreError::Connect("Can't connect to server".to_string()))
    }

    fn execute(&mut self, _statement: &str, _params: &[Value]) -> Result<Executed, StoreError> {
        Err(StoreError::Connect("Can't connect to server".to_string()))
    }
}

/// Store that answers reads from `inner` but fails every write
pub struct ReadOnly<S>(pub S);

impl<S: Store> Store for ReadOnly<S> {
    fn query(&mut self, statement: &str, params: &[Value]) -> Result<RowSet, StoreError> {
        self.0.query(statement, params)
    }

    fn execute(&mut self, statement: &str, params: &[Value]) -> Result<Executed, StoreError> {
        if statement.trim_start().starts_with("INSERT") {
            return Err(StoreError::Query("attempt to write a readonly database".to_string()));
        }
        self.0.execute(statement, params)
    }

    fn expired(&self) -> bool {
        self.0.expired()
    }
}
