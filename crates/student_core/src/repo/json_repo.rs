//! File-backed student repository persisted as one JSON snapshot.
//!
//! # Responsibility
//! - Hold the whole collection in memory and implement the repository
//!   contract over it.
//! - Load and save the collection as a JSON array of canonical records.
//!
//! # Invariants
//! - One bad record never aborts a load; it is skipped and reported.
//! - Ids stay unique: a record repeating an earlier id is skipped.
//! - A missing or unparsable file loads as an empty collection.
//! - Mutations touch memory only; `save` is the sole write path.
//! - `save` replaces the target file through a rename, never in place.

use crate::model::ingest::parse_json_value;
use crate::model::student::{Student, StudentId, StudentRecord};
use crate::repo::student_repo::{
    brief_summaries, next_student_id, paginate, RepoResult, StudentRepository,
};
use log::{info, warn};
use serde_json::Value;
use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Problem found while loading the backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadDiagnostic {
    /// Position of the rejected record; `None` when the whole file was rejected.
    pub index: Option<usize>,
    pub message: String,
}

/// Field used to reorder the in-memory collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentField {
    Id,
    FirstName,
    LastName,
    Patronymic,
    Address,
    Phone,
    MinRequiredFacultativeHours,
}

impl StudentField {
    fn compare(self, left: &Student, right: &Student) -> Ordering {
        match self {
            Self::Id => left.id().cmp(&right.id()),
            Self::FirstName => left.first_name().cmp(right.first_name()),
            Self::LastName => left.last_name().cmp(right.last_name()),
            Self::Patronymic => left.patronymic().cmp(&right.patronymic()),
            Self::Address => left.address().cmp(right.address()),
            Self::Phone => left.phone().cmp(right.phone()),
            Self::MinRequiredFacultativeHours => left
                .min_required_facultative_hours()
                .cmp(&right.min_required_facultative_hours()),
        }
    }
}

/// Student repository backed by a JSON file.
#[derive(Debug)]
pub struct JsonStudentRepository {
    path: PathBuf,
    students: Vec<Student>,
    diagnostics: Vec<LoadDiagnostic>,
}

impl JsonStudentRepository {
    /// Opens the repository and loads `path` immediately.
    ///
    /// # Errors
    /// - Returns `RepoError::Io` when the file exists but cannot be read.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let mut repo = Self {
            path: path.as_ref().to_path_buf(),
            students: Vec::new(),
            diagnostics: Vec::new(),
        };
        repo.load()?;
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Diagnostics produced by the most recent load.
    pub fn diagnostics(&self) -> &[LoadDiagnostic] {
        &self.diagnostics
    }

    /// Stable in-memory reorder by one field; affects later pages.
    pub fn sort_by(&mut self, field: StudentField) {
        self.students.sort_by(|left, right| field.compare(left, right));
    }

    fn position(&self, id: StudentId) -> Option<usize> {
        self.students.iter().position(|student| student.id() == id)
    }

    fn reject_file(&mut self, message: String) {
        warn!(
            "event=repo_load module=repo status=skipped path={} reason={}",
            self.path.display(),
            message
        );
        self.diagnostics.push(LoadDiagnostic {
            index: None,
            message,
        });
    }
}

impl StudentRepository for JsonStudentRepository {
    fn create(&mut self, mut data: StudentRecord) -> RepoResult<Student> {
        let id = next_student_id(self.students.iter().map(Student::id))?;
        data.student_id = i64::from(id);
        let student = Student::from_record(&data)?;
        self.students.push(student.clone());
        Ok(student)
    }

    fn get_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        Ok(self.position(id).map(|index| self.students[index].clone()))
    }

    fn update(&mut self, id: StudentId, mut data: StudentRecord) -> RepoResult<Option<Student>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        data.student_id = i64::from(id);
        let student = Student::from_record(&data)?;
        self.students[index] = student.clone();
        Ok(Some(student))
    }

    fn delete(&mut self, id: StudentId) -> RepoResult<bool> {
        match self.position(id) {
            Some(index) => {
                self.students.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn count(&self) -> RepoResult<usize> {
        Ok(self.students.len())
    }

    fn get_page(&self, page_size: usize, page: usize) -> RepoResult<Vec<String>> {
        Ok(brief_summaries(&paginate(&self.students, page_size, page)))
    }

    fn students(&self) -> RepoResult<Vec<Student>> {
        Ok(self.students.clone())
    }

    fn load(&mut self) -> RepoResult<()> {
        self.students.clear();
        self.diagnostics.clear();

        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=repo_load module=repo status=ok path={} loaded=0 skipped=0 reason=missing_file",
                    self.path.display()
                );
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let items = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                self.reject_file("top-level JSON value is not an array".to_string());
                return Ok(());
            }
            Err(err) => {
                self.reject_file(format!("invalid JSON: {err}"));
                return Ok(());
            }
        };

        for (index, item) in items.iter().enumerate() {
            let parsed = parse_json_value(item)
                .map_err(|err| err.to_string())
                .and_then(|record| Student::from_record(&record).map_err(|err| err.to_string()))
                .and_then(|student| match self.position(student.id()) {
                    Some(_) => Err(format!("duplicate student id {}", student.id())),
                    None => Ok(student),
                });
            match parsed {
                Ok(student) => self.students.push(student),
                Err(message) => {
                    warn!(
                        "event=record_skipped module=repo status=error path={} index={} error={}",
                        self.path.display(),
                        index,
                        message
                    );
                    self.diagnostics.push(LoadDiagnostic {
                        index: Some(index),
                        message,
                    });
                }
            }
        }

        info!(
            "event=repo_load module=repo status=ok path={} loaded={} skipped={}",
            self.path.display(),
            self.students.len(),
            self.diagnostics.len()
        );
        Ok(())
    }

    fn save(&mut self) -> RepoResult<()> {
        let records: Vec<StudentRecord> = self.students.iter().map(Student::to_record).collect();
        let payload = serde_json::to_string_pretty(&records)?;

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);
        fs::write(&staging, payload)?;
        fs::rename(&staging, &self.path)?;

        info!(
            "event=repo_save module=repo status=ok path={} saved={}",
            self.path.display(),
            records.len()
        );
        Ok(())
    }
}
