//! SQLite-backed storage gateway

use std::path::{Path, PathBuf};

use rusqlite::{params_from_iter, Connection, OptionalExtension};

use super::sql;
use crate::record::{Payload, QueryResult, Record};
use crate::value::Value;
use crate::{Error, Result};

/// Typed classification of a raw statement, decided by the caller.
///
/// The gateway never sniffs statement text to decide whether it returns rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Returns rows (SELECT and friends)
    Query,
    /// Returns counts and a last-inserted rowid
    Mutation,
}

/// Configuration for opening a gateway
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// Path to the database file (created if it does not exist)
    pub db_path: PathBuf,
    /// Optional raw SQL setup script, executed during open
    pub init_script: Option<String>,
}

impl GatewayConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        GatewayConfig {
            db_path: db_path.into(),
            init_script: None,
        }
    }

    pub fn with_init_script(mut self, script: impl Into<String>) -> Self {
        self.init_script = Some(script.into());
        self
    }
}

/// An owned handle to one embedded database connection.
///
/// All generic CRUD operations go through this handle. There is no pooling
/// and no transaction management; callers sequence operations explicitly.
pub struct Gateway {
    conn: Connection,
}

impl Gateway {
    /// Opens a database file (creates if it doesn't exist).
    ///
    /// If the config carries a setup script, the script runs before the
    /// gateway is handed out and a script failure fails the whole open. Both
    /// failure modes produce [`Error::Initialization`].
    pub fn open(config: &GatewayConfig) -> Result<Self> {
        let conn = Connection::open(&config.db_path)
            .map_err(|e| init_error(&config.db_path, e))?;
        if let Some(script) = &config.init_script {
            conn.execute_batch(script)
                .map_err(|e| init_error(&config.db_path, e))?;
        }
        tracing::info!("database initialized at {}", config.db_path.display());
        Ok(Gateway { conn })
    }

    /// Opens an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| init_error(Path::new(":memory:"), e))?;
        Ok(Gateway { conn })
    }

    /// Executes one parameterized statement.
    ///
    /// `Query` statements return every matching row as the payload; `Mutation`
    /// statements return the last-inserted rowid and the affected-row count.
    pub fn execute(&self, kind: StatementKind, sql_text: &str, params: &[Value]) -> Result<QueryResult> {
        match kind {
            StatementKind::Query => Ok(QueryResult::rows(self.run_query(sql_text, params)?)),
            StatementKind::Mutation => {
                let (last_id, changes) = self.run_mutation(sql_text, params)?;
                Ok(QueryResult::mutation(last_id, changes))
            }
        }
    }

    // ========== Generic CRUD Operations ==========

    /// Inserts one record, returning a result whose payload echoes the stored
    /// record with its new identifier: `{id: last_insert_id, ...record}`
    pub fn insert(&self, table: &str, record: &Record) -> Result<QueryResult> {
        let sql_text = sql::build_insert(table, record)?;
        let params: Vec<Value> = record.values().cloned().collect();
        let (last_id, changes) = self.run_mutation(&sql_text, &params)?;

        let mut stored = Record::new().with("id", last_id);
        for (column, value) in record.iter() {
            stored.set(column, value.clone());
        }
        Ok(QueryResult {
            last_insert_id: Some(last_id),
            rows_affected: Some(changes),
            payload: Some(Payload::One(stored)),
        })
    }

    /// Returns every row matching the AND-joined condition map.
    ///
    /// An empty condition map returns every row in the table.
    pub fn find_all(&self, table: &str, conditions: &Record) -> Result<Vec<Record>> {
        let sql_text = sql::build_select(table, conditions)?;
        let params: Vec<Value> = conditions.values().cloned().collect();
        self.run_query(&sql_text, &params)
    }

    /// Returns at most one matching row.
    ///
    /// When multiple rows match, which one is returned is whatever the engine
    /// yields first with no ORDER BY; callers must not rely on it.
    pub fn find_one(&self, table: &str, conditions: &Record) -> Result<Option<Record>> {
        Ok(self.find_all(table, conditions)?.into_iter().next())
    }

    /// Applies the update map to every row matching the condition map.
    ///
    /// If zero rows matched, the result carries `rows_affected == 0` and no
    /// payload. Otherwise the now-current matching record is re-fetched and
    /// returned. An empty condition map updates every row in the table.
    pub fn update(&self, table: &str, conditions: &Record, updates: &Record) -> Result<QueryResult> {
        let sql_text = sql::build_update(table, conditions, updates)?;
        let params: Vec<Value> = updates
            .values()
            .chain(conditions.values())
            .cloned()
            .collect();
        let (last_id, changes) = self.run_mutation(&sql_text, &params)?;
        if changes == 0 {
            return Ok(QueryResult {
                rows_affected: Some(0),
                ..QueryResult::default()
            });
        }
        let current = self.find_one(table, conditions)?;
        Ok(QueryResult {
            last_insert_id: Some(last_id),
            rows_affected: Some(changes),
            payload: current.map(Payload::One),
        })
    }

    /// Deletes every row matching the AND-joined condition map.
    ///
    /// An empty condition map deletes every row in the table.
    pub fn remove(&self, table: &str, conditions: &Record) -> Result<QueryResult> {
        let sql_text = sql::build_delete(table, conditions)?;
        let params: Vec<Value> = conditions.values().cloned().collect();
        let (last_id, changes) = self.run_mutation(&sql_text, &params)?;
        Ok(QueryResult::mutation(last_id, changes))
    }

    /// Checks the schema catalog for a table of the given name
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |_| Ok(()),
            )
            .optional()
            .map_err(|e| {
                tracing::error!("database error: {}", e);
                Error::Query(e)
            })?;
        Ok(found.is_some())
    }

    /// Releases the connection
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| {
            tracing::error!("database error: {}", e);
            Error::Query(e)
        })?;
        tracing::info!("database closed");
        Ok(())
    }

    // ========== Statement Execution ==========

    fn run_query(&self, sql_text: &str, params: &[Value]) -> Result<Vec<Record>> {
        let run = || -> rusqlite::Result<Vec<Record>> {
            let mut stmt = self.conn.prepare(sql_text)?;
            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
                let mut record = Record::new();
                for (i, column) in columns.iter().enumerate() {
                    record.set(column, Value::from(row.get_ref(i)?));
                }
                Ok(record)
            })?;
            rows.collect()
        };
        run().map_err(|e| {
            tracing::error!("database error: {}", e);
            Error::Query(e)
        })
    }

    fn run_mutation(&self, sql_text: &str, params: &[Value]) -> Result<(i64, usize)> {
        let changes = self
            .conn
            .execute(sql_text, params_from_iter(params.iter()))
            .map_err(|e| {
                tracing::error!("database error: {}", e);
                Error::Query(e)
            })?;
        Ok((self.conn.last_insert_rowid(), changes))
    }
}

fn init_error(path: &Path, source: rusqlite::Error) -> Error {
    let err = Error::Initialization {
        path: path.display().to_string(),
        source,
    };
    tracing::error!("database error: {}", err);
    err
}
