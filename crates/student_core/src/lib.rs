//! Core domain logic for the student registry.
//! This crate is the single source of truth for student invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{open_repository, ConfigError, StorageConfig};
pub use db::SqliteStudentStore;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::ingest::{FieldValue, ParseError, StudentError, StudentInput};
pub use model::student::{Student, StudentId, StudentRecord};
pub use model::validate::{ValidationError, ValidationRegime};
pub use repo::db_adapter::{DbStudentRepository, StudentStore};
pub use repo::json_repo::{JsonStudentRepository, LoadDiagnostic, StudentField};
pub use repo::query::QueryDecorator;
pub use repo::student_repo::{paginate, RepoError, RepoResult, StudentRepository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
