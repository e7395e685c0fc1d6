//! SQLite storage for the database-backed student adapter.
//!
//! # Responsibility
//! - Open SQLite connections with the `students` table in place.
//! - Provide `SqliteStudentStore`, the persistence API the adapter consumes.
//!
//! # Invariants
//! - The schema is created idempotently; existing tables are never altered.
//! - No student row is read or written before the schema exists.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
mod student_store;

pub use open::{open_db, open_db_in_memory};
pub use student_store::SqliteStudentStore;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
