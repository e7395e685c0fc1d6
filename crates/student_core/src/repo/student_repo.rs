//! Student repository contract shared by every backend.
//!
//! # Responsibility
//! - Define CRUD, paginated listing and load/save lifecycle for students.
//! - Own the id-assignment and page-window rules so backends agree on them.
//!
//! # Invariants
//! - New ids are `max(existing) + 1`, or 1 for an empty collection.
//! - Page `n` of size `k` covers offsets `(n-1)*k ..= (n-1)*k + k - 1`.
//! - Lookups by id report absence with `None`/`false`, never an error.

use crate::db::DbError;
use crate::model::ingest::StudentError;
use crate::model::student::{Student, StudentId, StudentRecord};
use crate::model::validate::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input could not be parsed or violates a field rule.
    Validation(StudentError),
    Db(DbError),
    Io(std::io::Error),
    Serialize(serde_json::Error),
    /// Backing store holds data that no longer satisfies entity rules.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize students: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<StudentError> for RepoError {
    fn from(value: StudentError) -> Self {
        Self::Validation(value)
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(StudentError::Validation(value))
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Repository interface for student CRUD, listing and persistence.
pub trait StudentRepository {
    /// Assigns the next id, validates `data` and stores the new student.
    ///
    /// Any id carried by `data` is ignored.
    fn create(&mut self, data: StudentRecord) -> RepoResult<Student>;
    fn get_by_id(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Replaces every field of student `id`, keeping `id` itself.
    ///
    /// Returns `Ok(None)` when no student has `id`. A validation failure
    /// leaves the stored student untouched.
    fn update(&mut self, id: StudentId, data: StudentRecord) -> RepoResult<Option<Student>>;
    /// Returns whether a student was removed.
    fn delete(&mut self, id: StudentId) -> RepoResult<bool>;
    fn count(&self) -> RepoResult<usize>;
    /// Brief summaries of page `page` (1-based) with `page_size` entries.
    fn get_page(&self, page_size: usize, page: usize) -> RepoResult<Vec<String>>;
    /// Full collection in repository order, bypassing pagination.
    fn students(&self) -> RepoResult<Vec<Student>>;
    /// Replaces in-memory state from the backing store.
    fn load(&mut self) -> RepoResult<()>;
    /// Flushes in-memory state to the backing store.
    fn save(&mut self) -> RepoResult<()>;
}

/// Returns the page window of `items`.
///
/// Out-of-range pages, a zero page size and page number 0 all yield an empty
/// page.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Vec<T> {
    if page_size == 0 || page == 0 {
        return Vec::new();
    }
    let Some(start) = (page - 1).checked_mul(page_size) else {
        return Vec::new();
    };
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(items.len());
    items[start..end].to_vec()
}

/// Returns the id the next created student receives.
///
/// # Errors
/// - Returns `InvalidData` when the largest id is already `StudentId::MAX`.
pub fn next_student_id<I>(existing: I) -> RepoResult<StudentId>
where
    I: IntoIterator<Item = StudentId>,
{
    match existing.into_iter().max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| RepoError::InvalidData(format!("no student id left after {max}"))),
    }
}

/// Maps students to their brief summaries.
pub fn brief_summaries(students: &[Student]) -> Vec<String> {
    students.iter().map(Student::brief_summary).collect()
}
