//! Storage backend selection.
//!
//! # Responsibility
//! - Describe which backend holds the student collection.
//! - Open a ready-to-use repository for that description.
//!
//! # Invariants
//! - Every returned repository has already run its initial `load`.

use crate::db::SqliteStudentStore;
use crate::repo::db_adapter::DbStudentRepository;
use crate::repo::json_repo::JsonStudentRepository;
use crate::repo::student_repo::{RepoResult, StudentRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const JSON_SCHEME: &str = "json:";
const SQLITE_SCHEME: &str = "sqlite:";
const SQLITE_MEMORY: &str = ":memory:";

/// Backend holding the student collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// JSON snapshot file (file-backed repository).
    JsonFile(PathBuf),
    /// SQLite database file (database adapter).
    Sqlite(PathBuf),
    /// Private in-memory SQLite database (database adapter).
    SqliteInMemory,
}

/// Storage description that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for ConfigError {}

impl StorageConfig {
    /// Parses `json:<path>`, `sqlite:<path>` or `sqlite::memory:`.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let value = value.trim();
        if let Some(path) = value.strip_prefix(JSON_SCHEME) {
            return non_empty_path(path).map(Self::JsonFile);
        }
        if let Some(path) = value.strip_prefix(SQLITE_SCHEME) {
            if path == SQLITE_MEMORY {
                return Ok(Self::SqliteInMemory);
            }
            return non_empty_path(path).map(Self::Sqlite);
        }
        Err(ConfigError(format!(
            "unsupported storage `{value}`; expected json:<path>|sqlite:<path>|sqlite::memory:"
        )))
    }
}

fn non_empty_path(path: &str) -> Result<PathBuf, ConfigError> {
    let path = path.trim();
    if path.is_empty() {
        return Err(ConfigError("storage path cannot be empty".to_string()));
    }
    Ok(PathBuf::from(path))
}

/// Opens the repository described by `config`.
pub fn open_repository(config: &StorageConfig) -> RepoResult<Box<dyn StudentRepository>> {
    let repo: Box<dyn StudentRepository> = match config {
        StorageConfig::JsonFile(path) => Box::new(JsonStudentRepository::open(path)?),
        StorageConfig::Sqlite(path) => {
            Box::new(DbStudentRepository::new(SqliteStudentStore::open(path)?)?)
        }
        StorageConfig::SqliteInMemory => {
            Box::new(DbStudentRepository::new(SqliteStudentStore::open_in_memory()?)?)
        }
    };
    Ok(repo)
}
