//! Database-backed student repository adapter.
//!
//! # Responsibility
//! - Expose an external persistence API (`StudentStore`) through the shared
//!   `StudentRepository` contract.
//! - Keep a local cache that mirrors the store after every mutation.
//!
//! # Invariants
//! - The cache is refetched in full after create/update/delete, never patched.
//! - A committed store write is reported as such; a failed refetch afterwards
//!   is logged and leaves the previous cache in place.
//! - Listing asks the store for `get_count()` records and slices locally.
//! - `save` is a no-op: the store owns durability.

use crate::model::student::{Student, StudentId, StudentRecord};
use crate::repo::student_repo::{brief_summaries, paginate, RepoResult, StudentRepository};
use log::{debug, error};

/// External persistence API consumed by `DbStudentRepository`.
///
/// Implementations own durability and error mapping.
pub trait StudentStore {
    fn get_count(&self) -> RepoResult<usize>;
    /// Students of page `page` (1-based), ordered by id.
    fn get_page(&self, page_size: usize, page: usize) -> RepoResult<Vec<Student>>;
    fn get_by_id(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Stores `data` under a store-assigned id.
    fn create(&self, data: &StudentRecord) -> RepoResult<Student>;
    fn update(&self, id: StudentId, data: &StudentRecord) -> RepoResult<Option<Student>>;
    fn delete(&self, id: StudentId) -> RepoResult<bool>;
}

/// Adapter presenting a `StudentStore` as a `StudentRepository`.
pub struct DbStudentRepository<S: StudentStore> {
    store: S,
    cache: Vec<Student>,
}

impl<S: StudentStore> DbStudentRepository<S> {
    /// Wraps `store` and loads the initial cache.
    pub fn new(store: S) -> RepoResult<Self> {
        let mut repo = Self {
            store,
            cache: Vec::new(),
        };
        repo.load()?;
        Ok(repo)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Students as of the last refresh.
    pub fn cached(&self) -> &[Student] {
        &self.cache
    }

    /// Refetches everything and orders the cache by last, first and
    /// patronymic (absent patronymic sorts as empty).
    ///
    /// The result is a snapshot: `get_page` and `students` still list in
    /// store order. Use `QueryDecorator::with_sort_key` for sorted pages.
    pub fn sort_by_name(&mut self) -> RepoResult<Vec<Student>> {
        let mut students = self.fetch_all()?;
        students.sort_by(|left, right| left.name_key().cmp(&right.name_key()));
        self.cache = students.clone();
        Ok(students)
    }

    fn refresh_after_write(&mut self, action: &'static str) {
        if let Err(err) = self.load() {
            error!(
                "event=adapter_refresh module=repo status=error action={action} cached={} error={err}",
                self.cache.len()
            );
        }
    }

    fn fetch_all(&self) -> RepoResult<Vec<Student>> {
        let count = self.store.get_count()?;
        if count == 0 {
            return Ok(Vec::new());
        }
        self.store.get_page(count, 1)
    }
}

impl<S: StudentStore> StudentRepository for DbStudentRepository<S> {
    fn create(&mut self, data: StudentRecord) -> RepoResult<Student> {
        let student = self.store.create(&data)?;
        self.refresh_after_write("create");
        Ok(student)
    }

    fn get_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        self.store.get_by_id(id)
    }

    fn update(&mut self, id: StudentId, data: StudentRecord) -> RepoResult<Option<Student>> {
        let updated = self.store.update(id, &data)?;
        self.refresh_after_write("update");
        Ok(updated)
    }

    fn delete(&mut self, id: StudentId) -> RepoResult<bool> {
        let removed = self.store.delete(id)?;
        self.refresh_after_write("delete");
        Ok(removed)
    }

    fn count(&self) -> RepoResult<usize> {
        self.store.get_count()
    }

    fn get_page(&self, page_size: usize, page: usize) -> RepoResult<Vec<String>> {
        let students = self.fetch_all()?;
        Ok(brief_summaries(&paginate(&students, page_size, page)))
    }

    fn students(&self) -> RepoResult<Vec<Student>> {
        self.fetch_all()
    }

    fn load(&mut self) -> RepoResult<()> {
        self.cache = self.fetch_all()?;
        debug!(
            "event=adapter_refresh module=repo status=ok cached={}",
            self.cache.len()
        );
        Ok(())
    }

    fn save(&mut self) -> RepoResult<()> {
        Ok(())
    }
}
