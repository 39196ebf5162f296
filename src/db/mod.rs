//! Database module
//!
//! Handles SQLite connection and migrations.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};

/// Open an in-memory connection with the schema applied (for tests)
#[cfg(test)]
pub(crate) fn test_conn() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    migrations::run_migrations(&conn).unwrap();
    conn
}

/// In-memory pooled database with the schema applied (for tests)
#[cfg(test)]
pub(crate) fn test_database() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.with_conn(migrations::run_migrations).unwrap();
    db
}
