//! Student domain model.
//!
//! # Responsibility
//! - Define the validated `Student` entity and its canonical record.
//! - Keep input-shape parsing separate from field validation.
//!
//! # Invariants
//! - Every input shape converges on `StudentRecord` before any rule runs.
//! - `Student::from_record` is the only validation path.

pub mod ingest;
pub mod student;
pub mod validate;
