// SQLite CourseRepository Implementation

use crate::error::map_sqlx_error;
use crate::pattern::contains_pattern;
use async_trait::async_trait;
use registrar_core::domain::{Course, CourseDraft, CourseEnrollment, CourseId};
use registrar_core::error::Result;
use registrar_core::port::{Clock, CourseRepository};
use sqlx::SqlitePool;
use std::sync::Arc;

const SELECT_COURSES: &str =
    "SELECT course_id, course_name, description, created_at, updated_at FROM courses";

pub struct SqliteCourseRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteCourseRepository {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl CourseRepository for SqliteCourseRepository {
    async fn insert(&self, draft: &CourseDraft) -> Result<CourseId> {
        let now = self.clock.now_millis();

        let result = sqlx::query(
            r#"
            INSERT INTO courses (course_name, description, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(&format!("{SELECT_COURSES} WHERE course_id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(CourseRow::into_course))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Course>> {
        let row =
            sqlx::query_as::<_, CourseRow>(&format!("{SELECT_COURSES} WHERE course_name = ?"))
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(row.map(CourseRow::into_course))
    }

    async fn list_all(&self) -> Result<Vec<Course>> {
        let rows: Vec<CourseRow> = sqlx::query_as(&format!("{SELECT_COURSES} ORDER BY course_name"))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CourseRow::into_course).collect())
    }

    async fn update(&self, id: CourseId, draft: &CourseDraft) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE courses
            SET course_name = ?, description = ?, updated_at = ?
            WHERE course_id = ?
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(self.clock.now_millis())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: CourseId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE course_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_with_students(&self, id: CourseId) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let removed_students = sqlx::query("DELETE FROM students WHERE course_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .rows_affected();

        let result = sqlx::query("DELETE FROM courses WHERE course_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        tracing::debug!(course_id = id, removed_students, "Cascade delete committed");
        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: CourseId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE course_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count > 0)
    }

    async fn search_by_name(&self, pattern: &str) -> Result<Vec<Course>> {
        let rows: Vec<CourseRow> = sqlx::query_as(&format!(
            r"{SELECT_COURSES} WHERE course_name LIKE ? ESCAPE '\' ORDER BY course_name"
        ))
        .bind(contains_pattern(pattern))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CourseRow::into_course).collect())
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn enrollment(&self) -> Result<Vec<CourseEnrollment>> {
        let rows: Vec<EnrollmentRow> = sqlx::query_as(
            r#"
            SELECT c.course_id, c.course_name, COUNT(s.student_id) AS students
            FROM courses c
            LEFT JOIN students s ON s.course_id = c.course_id
            GROUP BY c.course_id, c.course_name
            ORDER BY c.course_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| CourseEnrollment {
                course_id: row.course_id,
                course_name: row.course_name,
                students: row.students,
            })
            .collect())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    course_id: i64,
    course_name: String,
    description: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl CourseRow {
    fn into_course(self) -> Course {
        Course {
            id: self.course_id,
            name: self.course_name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EnrollmentRow {
    course_id: i64,
    course_name: String,
    students: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations, PoolConfig, SqliteStudentRepository};
    use registrar_core::domain::StudentDraft;
    use registrar_core::port::{FixedClock, StudentRepository};

    async fn setup_test_db() -> (SqlitePool, Arc<dyn Clock>) {
        let pool = create_pool("sqlite::memory:", &PoolConfig::default())
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(1_700_000_000_000));
        (pool, clock)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let (pool, clock) = setup_test_db().await;
        let repo = SqliteCourseRepository::new(pool, clock);

        let draft = CourseDraft::new("Computer Science", Some("CS program".to_string()));
        let id = repo.insert(&draft).await.unwrap();
        assert_eq!(id, 1);

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.to_draft(), draft);
        assert_eq!(found.created_at, 1_700_000_000_000);

        let by_name = repo.find_by_name("Computer Science").await.unwrap();
        assert_eq!(by_name.map(|c| c.id), Some(id));

        // Exact, case-sensitive match
        assert!(repo.find_by_name("computer science").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_ordered_by_name() {
        let (pool, clock) = setup_test_db().await;
        let repo = SqliteCourseRepository::new(pool, clock);

        for name in ["Physics", "Art", "Mathematics"] {
            repo.insert(&CourseDraft::new(name, None)).await.unwrap();
        }

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Art", "Mathematics", "Physics"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_report_matches() {
        let (pool, clock) = setup_test_db().await;
        let repo = SqliteCourseRepository::new(pool, clock);

        let id = repo.insert(&CourseDraft::new("Physics", None)).await.unwrap();
        let changed = CourseDraft::new("Applied Physics", Some("Labs".to_string()));
        assert!(repo.update(id, &changed).await.unwrap());
        assert!(!repo.update(id + 100, &changed).await.unwrap());
        assert_eq!(repo.find_by_id(id).await.unwrap().unwrap().to_draft(), changed);

        assert!(repo.exists(id).await.unwrap());
        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert!(!repo.exists(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_name_surfaces_as_storage_error() {
        let (pool, clock) = setup_test_db().await;
        let repo = SqliteCourseRepository::new(pool, clock);

        repo.insert(&CourseDraft::new("Physics", None)).await.unwrap();
        let err = repo
            .insert(&CourseDraft::new("Physics", None))
            .await
            .unwrap_err();
        assert!(matches!(err, registrar_core::AppError::Storage(_)));
    }

    #[tokio::test]
    async fn test_search_is_literal_substring() {
        let (pool, clock) = setup_test_db().await;
        let repo = SqliteCourseRepository::new(pool, clock);

        repo.insert(&CourseDraft::new("Data_Science", None)).await.unwrap();
        repo.insert(&CourseDraft::new("DataXScience", None)).await.unwrap();
        repo.insert(&CourseDraft::new("Computer Science", None)).await.unwrap();

        let hits = repo.search_by_name("science").await.unwrap();
        assert_eq!(hits.len(), 3);

        // `_` is not a wildcard
        let hits = repo.search_by_name("a_S").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Data_Science");
    }

    #[tokio::test]
    async fn test_delete_with_students_and_enrollment() {
        let (pool, clock) = setup_test_db().await;
        let courses = SqliteCourseRepository::new(pool.clone(), clock.clone());
        let students = SqliteStudentRepository::new(pool, clock);

        let cs = courses.insert(&CourseDraft::new("Computer Science", None)).await.unwrap();
        let art = courses.insert(&CourseDraft::new("Art", None)).await.unwrap();
        students
            .insert(&StudentDraft::new("Ana Lee", 20, "ana@x.com", cs))
            .await
            .unwrap();
        students
            .insert(&StudentDraft::new("Bo Chen", 22, "bo@x.com", cs))
            .await
            .unwrap();

        let enrollment = courses.enrollment().await.unwrap();
        assert_eq!(
            enrollment,
            vec![
                CourseEnrollment {
                    course_id: art,
                    course_name: "Art".to_string(),
                    students: 0
                },
                CourseEnrollment {
                    course_id: cs,
                    course_name: "Computer Science".to_string(),
                    students: 2
                },
            ]
        );

        assert!(courses.delete_with_students(cs).await.unwrap());
        assert_eq!(students.count().await.unwrap(), 0);
        assert_eq!(courses.count().await.unwrap(), 1);
    }
}
