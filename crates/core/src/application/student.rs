// Student Service - reference, uniqueness and range checks around StudentRepository

use crate::domain::validation;
use crate::domain::{normalize_email, CourseId, Student, StudentDraft, StudentId};
use crate::error::{AppError, Result};
use crate::port::{CourseRepository, StudentRepository};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StudentService {
    students: Arc<dyn StudentRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl StudentService {
    pub fn new(students: Arc<dyn StudentRepository>, courses: Arc<dyn CourseRepository>) -> Self {
        Self { students, courses }
    }

    /// Add a new student
    ///
    /// The email is normalized before the uniqueness check and before storage.
    pub async fn add(&self, draft: StudentDraft) -> Result<StudentId> {
        let draft = draft.normalized();
        validation::validate_student(&draft)?;

        self.ensure_course(draft.course_id).await?;
        self.ensure_email_free(&draft.email, None).await?;

        let id = self.students.insert(&draft).await?;
        info!(student_id = id, course_id = draft.course_id, "Student created");
        Ok(id)
    }

    /// Replace all writable fields of an existing student
    pub async fn update(&self, id: StudentId, draft: StudentDraft) -> Result<()> {
        let draft = draft.normalized();
        validation::validate_student(&draft)?;

        if !self.students.exists(id).await? {
            return Err(not_found(id));
        }
        self.ensure_course(draft.course_id).await?;
        self.ensure_email_free(&draft.email, Some(id)).await?;

        if !self.students.update(id, &draft).await? {
            return Err(not_found(id));
        }
        info!(student_id = id, "Student updated");
        Ok(())
    }

    pub async fn delete(&self, id: StudentId) -> Result<()> {
        if !self.students.exists(id).await? || !self.students.delete(id).await? {
            return Err(not_found(id));
        }
        info!(student_id = id, "Student deleted");
        Ok(())
    }

    /// Get student by ID (with joined course name)
    pub async fn get(&self, id: StudentId) -> Result<Student> {
        self.students
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Student>> {
        self.students.find_by_email(&normalize_email(email)).await
    }

    pub async fn list(&self) -> Result<Vec<Student>> {
        self.students.list_all().await
    }

    pub async fn exists(&self, id: StudentId) -> Result<bool> {
        self.students.exists(id).await
    }

    /// Substring search on name; a blank pattern lists everything
    pub async fn search(&self, pattern: &str) -> Result<Vec<Student>> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return self.list().await;
        }
        debug!(pattern, "Searching students by name");
        self.students.search_by_name(pattern).await
    }

    /// Students of one course; the course must exist
    pub async fn by_course(&self, course_id: CourseId) -> Result<Vec<Student>> {
        self.ensure_course(course_id).await?;
        self.students.find_by_course(course_id).await
    }

    /// Substring match on the course name; a blank pattern lists everything
    pub async fn by_course_name(&self, pattern: &str) -> Result<Vec<Student>> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return self.list().await;
        }
        debug!(pattern, "Filtering students by course name");
        self.students.search_by_course_name(pattern).await
    }

    /// Students with age in `[min, max]`, ordered by age then name
    pub async fn by_age_range(&self, min: i32, max: i32) -> Result<Vec<Student>> {
        validation::check_age_range(min, max)?;
        self.students.find_by_age_range(min, max).await
    }

    async fn ensure_course(&self, course_id: CourseId) -> Result<()> {
        if !self.courses.exists(course_id).await? {
            warn!(course_id, "Rejected reference to missing course");
            return Err(AppError::InvalidReference(format!(
                "Course with ID {} does not exist",
                course_id
            )));
        }
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str, exclude: Option<StudentId>) -> Result<()> {
        if self.students.is_email_taken(email, exclude).await? {
            warn!(email, "Rejected duplicate student email");
            return Err(AppError::DuplicateEmail(format!(
                "Email address '{}' is already in use",
                email
            )));
        }
        Ok(())
    }
}

fn not_found(id: StudentId) -> AppError {
    AppError::NotFound(format!("Student with ID {} does not exist", id))
}
