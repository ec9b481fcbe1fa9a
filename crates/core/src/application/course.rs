// Course Service - uniqueness and deletion policy around CourseRepository

use crate::domain::validation;
use crate::domain::{Course, CourseDeletePolicy, CourseDraft, CourseId};
use crate::error::{AppError, Result};
use crate::port::{CourseRepository, StudentRepository};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    students: Arc<dyn StudentRepository>,
    delete_policy: CourseDeletePolicy,
}

impl CourseService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        students: Arc<dyn StudentRepository>,
        delete_policy: CourseDeletePolicy,
    ) -> Self {
        Self {
            courses,
            students,
            delete_policy,
        }
    }

    pub fn delete_policy(&self) -> CourseDeletePolicy {
        self.delete_policy
    }

    /// Add a new course
    ///
    /// Fails with `DuplicateName` if a course with the same (exact) name exists.
    pub async fn add(&self, draft: CourseDraft) -> Result<CourseId> {
        let draft = tidy(draft);
        validation::validate_course(&draft)?;

        if self.courses.find_by_name(&draft.name).await?.is_some() {
            warn!(name = %draft.name, "Rejected duplicate course name");
            return Err(AppError::DuplicateName(format!(
                "Course with name '{}' already exists",
                draft.name
            )));
        }

        let id = self.courses.insert(&draft).await?;
        info!(course_id = id, name = %draft.name, "Course created");
        Ok(id)
    }

    /// Replace name and description of an existing course
    pub async fn update(&self, id: CourseId, draft: CourseDraft) -> Result<()> {
        let draft = tidy(draft);
        validation::validate_course(&draft)?;

        if !self.courses.exists(id).await? {
            return Err(not_found(id));
        }

        if let Some(holder) = self.courses.find_by_name(&draft.name).await? {
            if holder.id != id {
                warn!(course_id = id, holder_id = holder.id, name = %draft.name, "Rejected duplicate course name");
                return Err(AppError::DuplicateName(format!(
                    "Another course with name '{}' already exists",
                    draft.name
                )));
            }
        }

        if !self.courses.update(id, &draft).await? {
            return Err(not_found(id));
        }
        info!(course_id = id, "Course updated");
        Ok(())
    }

    /// Delete a course, applying the configured policy to its students
    pub async fn delete(&self, id: CourseId) -> Result<()> {
        if !self.courses.exists(id).await? {
            return Err(not_found(id));
        }

        let deleted = match self.delete_policy {
            CourseDeletePolicy::Restrict => {
                let dependents = self.students.count_by_course(id).await?;
                if dependents > 0 {
                    return Err(AppError::Conflict(format!(
                        "Course with ID {} still has {} enrolled student(s)",
                        id, dependents
                    )));
                }
                self.courses.delete(id).await?
            }
            CourseDeletePolicy::Cascade => self.courses.delete_with_students(id).await?,
            CourseDeletePolicy::Orphan => self.courses.delete(id).await?,
        };

        if !deleted {
            return Err(not_found(id));
        }
        info!(course_id = id, policy = %self.delete_policy, "Course deleted");
        Ok(())
    }

    /// Get course by ID
    pub async fn get(&self, id: CourseId) -> Result<Course> {
        self.courses
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Course>> {
        self.courses.find_by_name(name.trim()).await
    }

    pub async fn list(&self) -> Result<Vec<Course>> {
        self.courses.list_all().await
    }

    pub async fn exists(&self, id: CourseId) -> Result<bool> {
        self.courses.exists(id).await
    }

    /// Substring search on name; a blank pattern lists everything
    pub async fn search(&self, pattern: &str) -> Result<Vec<Course>> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return self.list().await;
        }
        debug!(pattern, "Searching courses by name");
        self.courses.search_by_name(pattern).await
    }
}

fn tidy(draft: CourseDraft) -> CourseDraft {
    CourseDraft {
        name: draft.name.trim().to_string(),
        description: draft
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
    }
}

fn not_found(id: CourseId) -> AppError {
    AppError::NotFound(format!("Course with ID {} does not exist", id))
}
