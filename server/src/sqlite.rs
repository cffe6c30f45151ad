//! SQLite-backed implementation of the relational store

use crate::store::{Executed, Row, RowSet, Store, StoreError, Value};
use log::{debug, info};
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, ErrorCode, InterruptHandle, ToSql};
use shared::StatKind;
use std::path::Path;
use std::time::{Duration, Instant};

/// Tables used by the account and statistics services.
///
/// `users.name` carries a unique index so a registration racing past the
/// existence check is still refused by the database itself.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        passwd BLOB NOT NULL
    );
    CREATE TABLE IF NOT EXISTS player_data (
        id INTEGER PRIMARY KEY REFERENCES users(id)
    );
    CREATE TABLE IF NOT EXISTS stats_definitions (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS stats_global (
        player_id INTEGER NOT NULL REFERENCES player_data(id),
        stats_id INTEGER NOT NULL REFERENCES stats_definitions(id),
        value INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (player_id, stats_id)
    );
    CREATE TABLE IF NOT EXISTS stats_current (
        player_id INTEGER NOT NULL REFERENCES player_data(id),
        stats_id INTEGER NOT NULL REFERENCES stats_definitions(id),
        value INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (player_id, stats_id)
    );
";

pub struct SqliteStore {
    conn: Connection,
    deadline: Option<Instant>,
}

impl SqliteStore {
    /// Opens a connection to an existing database file.
    ///
    /// `busy_timeout` bounds how long a statement waits on another
    /// connection's lock before failing.
    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Connect(e.to_string()))?;
        conn.busy_timeout(busy_timeout)
            .map_err(|e| StoreError::Connect(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| StoreError::Connect(e.to_string()))?;
        Ok(Self {
            conn,
            deadline: None,
        })
    }

    /// Bounds all further transactions on this connection by `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Handle that aborts the statement currently running on this
    /// connection. Safe to fire from another thread.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.conn.get_interrupt_handle()
    }

    /// Opens a private in-memory database with the schema already in place.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Connect(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| StoreError::Connect(e.to_string()))?;
        let mut store = Self {
            conn,
            deadline: None,
        };
        store.bootstrap()?;
        Ok(store)
    }

    /// Creates missing tables and seeds the stat definitions. Idempotent.
    pub fn bootstrap(&mut self) -> Result<(), StoreError> {
        let mode: String = self
            .conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(map_error)?;
        debug!("SQLite journal mode: {}", mode);

        self.conn.execute_batch(SCHEMA).map_err(map_error)?;

        let seeded = self.atomically(|store| {
            let mut inserted = 0;
            for kind in StatKind::ALL {
                inserted += store
                    .execute(
                        "INSERT OR IGNORE INTO stats_definitions (id, name) VALUES (?1, ?2)",
                        &[kind.id().into(), kind.name().into()],
                    )?
                    .rows_affected;
            }
            Ok(inserted)
        })?;

        if seeded > 0 {
            info!("Seeded {} stat definitions", seeded);
        }
        Ok(())
    }
}

impl Store for SqliteStore {
    fn query(&mut self, statement: &str, params: &[Value]) -> Result<RowSet, StoreError> {
        let mut stmt = self.conn.prepare(statement).map_err(map_error)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt.query(params_from_iter(params.iter())).map_err(map_error)?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next().map_err(map_error)? {
            let mut columns = Vec::with_capacity(names.len());
            for (index, name) in names.iter().enumerate() {
                let value = row.get_ref(index).map_err(map_error)?;
                columns.push((name.clone(), from_value_ref(value)));
            }
            collected.push(Row::new(columns));
        }

        Ok(RowSet::new(collected))
    }

    fn execute(&mut self, statement: &str, params: &[Value]) -> Result<Executed, StoreError> {
        let rows_affected = self
            .conn
            .execute(statement, params_from_iter(params.iter()))
            .map_err(map_error)?;

        Ok(Executed {
            rows_affected: rows_affected as u64,
            last_insert_id: self.conn.last_insert_rowid(),
        })
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(v) => ToSqlOutput::Borrowed(ValueRef::Integer(*v)),
            Value::Real(v) => ToSqlOutput::Borrowed(ValueRef::Real(*v)),
            Value::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            Value::Blob(v) => ToSqlOutput::Borrowed(ValueRef::Blob(v)),
        })
    }
}

fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
        ValueRef::Blob(v) => Value::Blob(v.to_vec()),
    }
}

fn map_error(err: rusqlite::Error) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            StoreError::Conflict(err.to_string())
        }
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::CannotOpen => {
            StoreError::Connect(err.to_string())
        }
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::OperationInterrupted => {
            StoreError::Expired
        }
        _ => StoreError::Query(err.to_string()),
    }
}
