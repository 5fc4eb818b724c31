//! Process-wide shared gateway handle
//!
//! The service owns exactly one database connection per process. This module
//! holds that handle in a global slot with an explicit lifecycle: initialize
//! once, use through [`with`], close on shutdown. Initializing twice is an
//! error rather than a silent replacement of the live handle.

use std::sync::Mutex;

use once_cell::sync::OnceCell;

use super::sqlite::{Gateway, GatewayConfig};
use crate::record::{QueryResult, Record};
use crate::{Error, Result};

static GATEWAY: OnceCell<Mutex<Option<Gateway>>> = OnceCell::new();

fn slot() -> &'static Mutex<Option<Gateway>> {
    GATEWAY.get_or_init(|| Mutex::new(None))
}

/// Opens the process-wide gateway.
///
/// Fails with [`Error::AlreadyInitialized`] if a handle is already live, and
/// with [`Error::Initialization`] if the database cannot be opened or its
/// setup script fails.
pub fn initialize(config: &GatewayConfig) -> Result<()> {
    let mut guard = lock()?;
    if guard.is_some() {
        tracing::error!("database error: {}", Error::AlreadyInitialized);
        return Err(Error::AlreadyInitialized);
    }
    *guard = Some(Gateway::open(config)?);
    Ok(())
}

/// Runs an operation against the shared gateway.
///
/// Fails with [`Error::NotInitialized`] before [`initialize`] has succeeded;
/// no I/O is performed in that case.
pub fn with<T>(op: impl FnOnce(&Gateway) -> Result<T>) -> Result<T> {
    let guard = lock()?;
    match guard.as_ref() {
        Some(gateway) => op(gateway),
        None => {
            tracing::error!("database error: {}", Error::NotInitialized);
            Err(Error::NotInitialized)
        }
    }
}

/// Closes the shared gateway and empties the slot
pub fn close() -> Result<()> {
    let mut guard = lock()?;
    match guard.take() {
        Some(gateway) => gateway.close(),
        None => {
            tracing::error!("database error: {}", Error::NotInitialized);
            Err(Error::NotInitialized)
        }
    }
}

pub fn is_initialized() -> bool {
    slot().lock().map(|guard| guard.is_some()).unwrap_or(false)
}

// Convenience wrappers mirroring the Gateway surface

pub fn insert(table: &str, record: &Record) -> Result<QueryResult> {
    with(|gateway| gateway.insert(table, record))
}

pub fn find_all(table: &str, conditions: &Record) -> Result<Vec<Record>> {
    with(|gateway| gateway.find_all(table, conditions))
}

pub fn find_one(table: &str, conditions: &Record) -> Result<Option<Record>> {
    with(|gateway| gateway.find_one(table, conditions))
}

pub fn update(table: &str, conditions: &Record, updates: &Record) -> Result<QueryResult> {
    with(|gateway| gateway.update(table, conditions, updates))
}

pub fn remove(table: &str, conditions: &Record) -> Result<QueryResult> {
    with(|gateway| gateway.remove(table, conditions))
}

pub fn table_exists(name: &str) -> Result<bool> {
    with(|gateway| gateway.table_exists(name))
}

fn lock() -> Result<std::sync::MutexGuard<'static, Option<Gateway>>> {
    slot()
        .lock()
        .map_err(|_| Error::Statement("shared gateway lock poisoned".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // The slot is process-global, so the whole lifecycle runs in one test to
    // keep parallel test threads from interfering with each other.
    #[test]
    fn test_shared_lifecycle() {
        // Before initialize: every operation fails without touching a database
        assert!(!is_initialized());
        assert!(matches!(
            insert("users", &Record::new().with("name", "Ada")),
            Err(Error::NotInitialized)
        ));
        assert!(matches!(
            find_all("users", &Record::new()),
            Err(Error::NotInitialized)
        ));
        assert!(matches!(table_exists("users"), Err(Error::NotInitialized)));
        assert!(matches!(close(), Err(Error::NotInitialized)));

        let dir = tempfile::tempdir().unwrap();
        let config = GatewayConfig::new(dir.path().join("shared.db"))
            .with_init_script("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)");
        initialize(&config).unwrap();
        assert!(is_initialized());

        // Re-initialization is refused while a handle is live
        assert!(matches!(initialize(&config), Err(Error::AlreadyInitialized)));

        let result = insert("users", &Record::new().with("name", "Ada")).unwrap();
        assert_eq!(result.last_insert_id, Some(1));

        let found = find_one("users", &Record::new().with("name", "Ada"))
            .unwrap()
            .unwrap();
        assert_eq!(found.get("id"), Some(&crate::Value::Integer(1)));

        update(
            "users",
            &Record::new().with("id", 1),
            &Record::new().with("name", "Grace"),
        )
        .unwrap();
        assert!(table_exists("users").unwrap());
        remove("users", &Record::new()).unwrap();

        close().unwrap();
        assert!(!is_initialized());
        assert!(matches!(
            find_all("users", &Record::new()),
            Err(Error::NotInitialized)
        ));

        // The slot is reusable after close
        initialize(&config).unwrap();
        close().unwrap();
    }
}
