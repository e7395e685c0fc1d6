//! Filter/sort/paginate decorator over any student repository.
//!
//! # Responsibility
//! - Compose an optional filter and an optional sort key on top of a
//!   repository's full listing.
//!
//! # Invariants
//! - Never mutates the wrapped repository and keeps no cached results.
//! - Evaluation order is fetch all -> filter -> stable sort -> paginate.

use crate::model::student::Student;
use crate::repo::student_repo::{brief_summaries, paginate, RepoResult, StudentRepository};
use std::cmp::Ordering;

type Filter<'a> = Box<dyn Fn(&Student) -> bool + 'a>;
type Comparator<'a> = Box<dyn Fn(&Student, &Student) -> Ordering + 'a>;

/// Read-only query view of a wrapped repository.
pub struct QueryDecorator<'a, R: StudentRepository + ?Sized> {
    repo: &'a R,
    filter: Option<Filter<'a>>,
    comparator: Option<Comparator<'a>>,
}

impl<'a, R: StudentRepository + ?Sized> QueryDecorator<'a, R> {
    /// Wraps `repo` with no filter and no sort.
    pub fn new(repo: &'a R) -> Self {
        Self {
            repo,
            filter: None,
            comparator: None,
        }
    }

    /// Keeps only students for which `filter` returns true.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Student) -> bool + 'a,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Orders students by the key `extract` returns; ties keep repository
    /// order.
    pub fn with_sort_key<K, F>(mut self, extract: F) -> Self
    where
        K: Ord + 'a,
        F: Fn(&Student) -> K + 'a,
    {
        self.comparator = Some(Box::new(move |left: &Student, right: &Student| {
            extract(left).cmp(&extract(right))
        }));
        self
    }

    /// Students on page `page` (1-based) of the filtered, sorted listing.
    pub fn page_students(&self, page_size: usize, page: usize) -> RepoResult<Vec<Student>> {
        let mut students = self.filtered()?;
        if let Some(comparator) = &self.comparator {
            students.sort_by(|left, right| comparator(left, right));
        }
        Ok(paginate(&students, page_size, page))
    }

    /// Brief summaries of `page_students`.
    pub fn get_page(&self, page_size: usize, page: usize) -> RepoResult<Vec<String>> {
        Ok(brief_summaries(&self.page_students(page_size, page)?))
    }

    /// Number of students passing the filter.
    pub fn get_count(&self) -> RepoResult<usize> {
        Ok(self.filtered()?.len())
    }

    fn filtered(&self) -> RepoResult<Vec<Student>> {
        let mut students = self.repo.students()?;
        if let Some(filter) = &self.filter {
            students.retain(|student| filter(student));
        }
        Ok(students)
    }
}
