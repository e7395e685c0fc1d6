//! SQLite implementation of the student persistence API.
//!
//! # Responsibility
//! - Keep SQL for the `students` table inside the db boundary.
//! - Serve the `StudentStore` calls consumed by `DbStudentRepository`.
//!
//! # Invariants
//! - Writes validate through `Student::from_record` before any SQL runs.
//! - Reads re-validate rows; invalid persisted rows are reported, not masked.
//! - New ids are `MAX(student_id) + 1`.

use crate::db::{open_db, open_db_in_memory};
use crate::model::student::{Student, StudentId, StudentRecord};
use crate::repo::db_adapter::StudentStore;
use crate::repo::student_repo::{next_student_id, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const STUDENT_SELECT_SQL: &str = "SELECT
    student_id,
    first_name,
    last_name,
    patronymic,
    address,
    phone,
    min_required_facultative_hours
FROM students";

/// `StudentStore` backed by a SQLite connection from `open_db`.
pub struct SqliteStudentStore {
    conn: Connection,
}

impl SqliteStudentStore {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Underlying connection, for maintenance and diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn max_id(&self) -> RepoResult<Option<StudentId>> {
        let max = self
            .conn
            .query_row("SELECT MAX(student_id) FROM students;", [], |row| {
                row.get::<_, Option<u32>>(0)
            })?;
        Ok(max)
    }
}

impl StudentStore for SqliteStudentStore {
    fn get_count(&self) -> RepoResult<usize> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM students;", [], |row| row.get::<_, i64>(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative student count {count}")))
    }

    fn get_page(&self, page_size: usize, page: usize) -> RepoResult<Vec<Student>> {
        if page_size == 0 || page == 0 {
            return Ok(Vec::new());
        }
        let limit = i64::try_from(page_size).unwrap_or(i64::MAX);
        let offset = (page - 1)
            .checked_mul(page_size)
            .and_then(|offset| i64::try_from(offset).ok());
        let Some(offset) = offset else {
            return Ok(Vec::new());
        };

        let mut stmt = self.conn.prepare(&format!(
            "{STUDENT_SELECT_SQL}
             ORDER BY student_id ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![limit, offset])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }

    fn get_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE student_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_student_row(row)?)),
            None => Ok(None),
        }
    }

    fn create(&self, data: &StudentRecord) -> RepoResult<Student> {
        let id = next_student_id(self.max_id()?)?;
        let student = Student::from_record(&StudentRecord {
            student_id: i64::from(id),
            ..data.clone()
        })?;

        self.conn.execute(
            "INSERT INTO students (
                student_id,
                first_name,
                last_name,
                patronymic,
                address,
                phone,
                min_required_facultative_hours
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                student.id(),
                student.first_name(),
                student.last_name(),
                student.patronymic(),
                student.address(),
                student.phone(),
                student.min_required_facultative_hours(),
            ],
        )?;
        Ok(student)
    }

    fn update(&self, id: StudentId, data: &StudentRecord) -> RepoResult<Option<Student>> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM students WHERE student_id = ?1;",
                [id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        if exists.is_none() {
            return Ok(None);
        }

        let student = Student::from_record(&StudentRecord {
            student_id: i64::from(id),
            ..data.clone()
        })?;
        self.conn.execute(
            "UPDATE students
             SET
                first_name = ?2,
                last_name = ?3,
                patronymic = ?4,
                address = ?5,
                phone = ?6,
                min_required_facultative_hours = ?7
             WHERE student_id = ?1;",
            params![
                student.id(),
                student.first_name(),
                student.last_name(),
                student.patronymic(),
                student.address(),
                student.phone(),
                student.min_required_facultative_hours(),
            ],
        )?;
        Ok(Some(student))
    }

    fn delete(&self, id: StudentId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE student_id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let record = StudentRecord {
        student_id: row.get("student_id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        patronymic: row.get("patronymic")?,
        address: row.get("address")?,
        phone: row.get("phone")?,
        min_required_facultative_hours: row.get("min_required_facultative_hours")?,
    };
    Student::from_record(&record).map_err(|err| {
        RepoError::InvalidData(format!(
            "row student_id={} in students: {err}",
            record.student_id
        ))
    })
}
