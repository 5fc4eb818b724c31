//! SQL statement builders for the generic CRUD operations
//!
//! Values are always bound positionally with `?` placeholders. Table and
//! column names cannot be parameter-bound, so every caller-supplied identifier
//! passes a strict allow-list check before it is spliced into a statement.

use crate::record::Record;
use crate::{Error, Result};

/// Rejects any identifier that is not plain ASCII alphanumeric/underscore.
///
/// Identifiers must be non-empty and must not start with a digit. This is
/// deliberately stricter than what SQLite would accept with quoting; the
/// gateway never quotes identifiers.
pub fn check_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::Identifier(name.to_string()))
    }
}

fn check_columns(record: &Record) -> Result<()> {
    for column in record.columns() {
        check_identifier(column)?;
    }
    Ok(())
}

/// Builds ` WHERE a = ? AND b = ?` from a condition map.
///
/// An empty map yields an empty string: the statement applies to every row in
/// the table. That is the documented contract for find/update/remove, not a
/// case to be rejected here.
fn where_clause(conditions: &Record) -> String {
    if conditions.is_empty() {
        return String::new();
    }
    let predicates: Vec<String> = conditions
        .columns()
        .map(|column| format!("{} = ?", column))
        .collect();
    format!(" WHERE {}", predicates.join(" AND "))
}

/// `INSERT INTO table (c1, c2) VALUES (?, ?)` with columns in insertion order
pub fn build_insert(table: &str, record: &Record) -> Result<String> {
    check_identifier(table)?;
    check_columns(record)?;
    if record.is_empty() {
        return Err(Error::Statement(format!(
            "insert into {} with no columns",
            table
        )));
    }
    let columns: Vec<&str> = record.columns().collect();
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    ))
}

/// `SELECT * FROM table` with AND-joined equality conditions
pub fn build_select(table: &str, conditions: &Record) -> Result<String> {
    check_identifier(table)?;
    check_columns(conditions)?;
    Ok(format!("SELECT * FROM {}{}", table, where_clause(conditions)))
}

/// `UPDATE table SET c1 = ?, c2 = ?` with AND-joined equality conditions.
///
/// Bind the update values first, then the condition values.
pub fn build_update(table: &str, conditions: &Record, updates: &Record) -> Result<String> {
    check_identifier(table)?;
    check_columns(conditions)?;
    check_columns(updates)?;
    if updates.is_empty() {
        return Err(Error::Statement(format!(
            "update of {} with no columns to set",
            table
        )));
    }
    let assignments: Vec<String> = updates
        .columns()
        .map(|column| format!("{} = ?", column))
        .collect();
    Ok(format!(
        "UPDATE {} SET {}{}",
        table,
        assignments.join(", "),
        where_clause(conditions)
    ))
}

/// `DELETE FROM table` with AND-joined equality conditions
pub fn build_delete(table: &str, conditions: &Record) -> Result<String> {
    check_identifier(table)?;
    check_columns(conditions)?;
    Ok(format!("DELETE FROM {}{}", table, where_clause(conditions)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_allow_list() {
        assert!(check_identifier("users").is_ok());
        assert!(check_identifier("_private").is_ok());
        assert!(check_identifier("col_2").is_ok());

        assert!(check_identifier("").is_err());
        assert!(check_identifier("2fast").is_err());
        assert!(check_identifier("name; DROP TABLE users").is_err());
        assert!(check_identifier("na me").is_err());
        assert!(check_identifier("\"quoted\"").is_err());
        assert!(check_identifier("col-dash").is_err());
    }

    #[test]
    fn test_build_insert() {
        let record = Record::new().with("name", "Ada").with("age", 36);
        let sql = build_insert("users", &record).unwrap();
        assert_eq!(sql, "INSERT INTO users (name, age) VALUES (?, ?)");
    }

    #[test]
    fn test_build_insert_rejects_empty_record() {
        let err = build_insert("users", &Record::new()).unwrap_err();
        assert!(matches!(err, Error::Statement(_)));
    }

    #[test]
    fn test_build_select() {
        let conditions = Record::new().with("name", "Ada").with("active", 1);
        let sql = build_select("users", &conditions).unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE name = ? AND active = ?");
    }

    #[test]
    fn test_build_select_empty_conditions_scans_table() {
        let sql = build_select("users", &Record::new()).unwrap();
        assert_eq!(sql, "SELECT * FROM users");
    }

    #[test]
    fn test_build_update() {
        let conditions = Record::new().with("id", 1);
        let updates = Record::new().with("name", "Grace");
        let sql = build_update("users", &conditions, &updates).unwrap();
        assert_eq!(sql, "UPDATE users SET name = ? WHERE id = ?");
    }

    #[test]
    fn test_build_update_empty_conditions_hits_every_row() {
        let updates = Record::new().with("name", "Grace");
        let sql = build_update("users", &Record::new(), &updates).unwrap();
        assert_eq!(sql, "UPDATE users SET name = ?");
    }

    #[test]
    fn test_build_update_rejects_empty_updates() {
        let err = build_update("users", &Record::new().with("id", 1), &Record::new()).unwrap_err();
        assert!(matches!(err, Error::Statement(_)));
    }

    #[test]
    fn test_build_delete_empty_conditions_hits_every_row() {
        let sql = build_delete("users", &Record::new()).unwrap();
        assert_eq!(sql, "DELETE FROM users");
    }

    #[test]
    fn test_injection_attempt_is_rejected() {
        let conditions = Record::new().with("name = ? OR 1=1 --", "x");
        assert!(build_select("users", &conditions).is_err());
        assert!(build_select("users; DROP TABLE users", &Record::new()).is_err());
    }
}
