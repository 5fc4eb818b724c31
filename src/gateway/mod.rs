//! Storage Gateway - generic CRUD over one embedded SQLite connection
//!
//! Insulates callers from hand-written SQL for the common operations:
//! - insert(table, record)
//! - find_all / find_one(table, conditions)
//! - update(table, conditions, updates)
//! - remove(table, conditions)
//!
//! Condition maps are AND-joined equality predicates. An empty condition map
//! means "every row", for reads and writes alike.

pub mod shared;
pub mod sql;
pub mod sqlite;

pub use sqlite::{Gateway, GatewayConfig, StatementKind};
