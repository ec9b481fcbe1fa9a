// Course Repository Port (Interface)

use crate::domain::{Course, CourseDraft, CourseEnrollment, CourseId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Course persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert a new course, returning the storage-assigned id
    async fn insert(&self, draft: &CourseDraft) -> Result<CourseId>;

    /// Find course by ID
    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>>;

    /// Find course by exact (case-sensitive) name
    async fn find_by_name(&self, name: &str) -> Result<Option<Course>>;

    /// All courses ordered by name
    async fn list_all(&self) -> Result<Vec<Course>>;

    /// Overwrite name and description; false if no row matched
    async fn update(&self, id: CourseId, draft: &CourseDraft) -> Result<bool>;

    /// Delete the course row only; false if no row matched
    async fn delete(&self, id: CourseId) -> Result<bool>;

    /// Delete the course and every student referencing it, atomically
    async fn delete_with_students(&self, id: CourseId) -> Result<bool>;

    async fn exists(&self, id: CourseId) -> Result<bool>;

    /// Courses whose name contains `pattern`, ordered by name
    async fn search_by_name(&self, pattern: &str) -> Result<Vec<Course>>;

    async fn count(&self) -> Result<i64>;

    /// Student count per course (zero included), ordered by course name
    async fn enrollment(&self) -> Result<Vec<CourseEnrollment>>;
}
