// Student Repository Port (Interface)

use crate::domain::{CourseId, Student, StudentDraft, StudentId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Student persistence
///
/// Every read joins the course to fill `Student::course_name`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Insert a new student, returning the storage-assigned id
    async fn insert(&self, draft: &StudentDraft) -> Result<StudentId>;

    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>>;

    /// Find by already-normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>>;

    /// All students ordered by name
    async fn list_all(&self) -> Result<Vec<Student>>;

    /// Overwrite all writable fields; false if no row matched
    async fn update(&self, id: StudentId, draft: &StudentDraft) -> Result<bool>;

    async fn delete(&self, id: StudentId) -> Result<bool>;

    async fn exists(&self, id: StudentId) -> Result<bool>;

    /// Students whose name contains `pattern`, ordered by name
    async fn search_by_name(&self, pattern: &str) -> Result<Vec<Student>>;

    /// Students enrolled in `course_id`, ordered by name
    async fn find_by_course(&self, course_id: CourseId) -> Result<Vec<Student>>;

    /// Students whose course name contains `pattern`, ordered by name
    async fn search_by_course_name(&self, pattern: &str) -> Result<Vec<Student>>;

    /// Students with `min <= age <= max`, ordered by age then name
    async fn find_by_age_range(&self, min: i32, max: i32) -> Result<Vec<Student>>;

    /// Whether another student (not `exclude`) already holds `email`
    async fn is_email_taken(&self, email: &str, exclude: Option<StudentId>) -> Result<bool>;

    async fn count_by_course(&self, course_id: CourseId) -> Result<i64>;

    async fn count(&self) -> Result<i64>;

    /// None when there are no students
    async fn average_age(&self) -> Result<Option<f64>>;
}
