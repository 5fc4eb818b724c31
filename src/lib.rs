//! # Formbase - backend service skeleton
//!
//! A generic CRUD data-access layer over an embedded SQLite database, plus a
//! minimal HTTP front door.
//!
//! Formbase provides:
//! - A generic storage gateway (insert/find/update/delete) built from table
//!   names and column->value condition maps
//! - A process-wide shared connection handle with an explicit lifecycle
//! - An axum-based listener exposing one informational route

pub mod config;
pub mod gateway;
pub mod record;
pub mod server;
pub mod value;

// Re-exports for convenient access
pub use gateway::{Gateway, GatewayConfig, StatementKind};
pub use record::{Payload, QueryResult, Record};
pub use value::Value;

/// Result type alias for formbase operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for formbase operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An operation was attempted before the shared gateway was initialized
    #[error("database not initialized")]
    NotInitialized,

    /// The shared gateway was initialized a second time
    #[error("database already initialized")]
    AlreadyInitialized,

    /// The database file could not be opened, or its setup script failed
    #[error("failed to initialize database at {path}: {source}")]
    Initialization {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Statement execution failure (malformed SQL, constraint violation, I/O)
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// A caller-supplied table or column name failed the identifier allow-list
    #[error("invalid identifier {0:?}")]
    Identifier(String),

    /// Statement builder misuse, e.g. an empty record or update map
    #[error("statement error: {0}")]
    Statement(String),

    /// Configuration loading or validation error
    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
