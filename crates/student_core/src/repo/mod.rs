//! Student repositories.
//!
//! # Responsibility
//! - Define the repository contract every backend implements.
//! - Provide the file-backed repository, the database adapter and the query
//!   decorator.
//!
//! # Invariants
//! - Repository writes validate through `Student::from_record` first.
//! - Lookups by id never report absence as an error.

pub mod db_adapter;
pub mod json_repo;
pub mod query;
pub mod student_repo;
