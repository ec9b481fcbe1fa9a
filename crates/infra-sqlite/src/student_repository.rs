// SQLite StudentRepository Implementation

use crate::error::map_sqlx_error;
use crate::pattern::contains_pattern;
use async_trait::async_trait;
use registrar_core::domain::{CourseId, Student, StudentDraft, StudentId};
use registrar_core::error::Result;
use registrar_core::port::{Clock, StudentRepository};
use sqlx::SqlitePool;
use std::sync::Arc;

// LEFT JOIN: a student whose course row is gone reads back with no course name
const SELECT_STUDENTS: &str = r#"
    SELECT s.student_id, s.name, s.age, s.email, s.course_id, c.course_name,
           s.created_at, s.updated_at
    FROM students s
    LEFT JOIN courses c ON s.course_id = c.course_id
"#;

pub struct SqliteStudentRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteStudentRepository {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    async fn fetch_one_where(&self, filter: &str, value: &str) -> Result<Option<Student>> {
        let row = sqlx::query_as::<_, StudentRow>(&format!("{SELECT_STUDENTS} WHERE {filter}"))
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(StudentRow::into_student))
    }

    async fn fetch_all_like(&self, column: &str, pattern: &str) -> Result<Vec<Student>> {
        let rows: Vec<StudentRow> = sqlx::query_as(&format!(
            r"{SELECT_STUDENTS} WHERE {column} LIKE ? ESCAPE '\' ORDER BY s.name"
        ))
        .bind(contains_pattern(pattern))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(StudentRow::into_student).collect())
    }
}

#[async_trait]
impl StudentRepository for SqliteStudentRepository {
    async fn insert(&self, draft: &StudentDraft) -> Result<StudentId> {
        let now = self.clock.now_millis();

        let result = sqlx::query(
            r#"
            INSERT INTO students (name, age, email, course_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&draft.name)
        .bind(draft.age)
        .bind(&draft.email)
        .bind(draft.course_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>> {
        let row =
            sqlx::query_as::<_, StudentRow>(&format!("{SELECT_STUDENTS} WHERE s.student_id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(row.map(StudentRow::into_student))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>> {
        self.fetch_one_where("s.email = ?", email).await
    }

    async fn list_all(&self) -> Result<Vec<Student>> {
        let rows: Vec<StudentRow> = sqlx::query_as(&format!("{SELECT_STUDENTS} ORDER BY s.name"))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(StudentRow::into_student).collect())
    }

    async fn update(&self, id: StudentId, draft: &StudentDraft) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET name = ?, age = ?, email = ?, course_id = ?, updated_at = ?
            WHERE student_id = ?
            "#,
        )
        .bind(&draft.name)
        .bind(draft.age)
        .bind(&draft.email)
        .bind(draft.course_id)
        .bind(self.clock.now_millis())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: StudentId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM students WHERE student_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: StudentId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE student_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count > 0)
    }

    async fn search_by_name(&self, pattern: &str) -> Result<Vec<Student>> {
        self.fetch_all_like("s.name", pattern).await
    }

    async fn find_by_course(&self, course_id: CourseId) -> Result<Vec<Student>> {
        let rows: Vec<StudentRow> = sqlx::query_as(&format!(
            "{SELECT_STUDENTS} WHERE s.course_id = ? ORDER BY s.name"
        ))
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(StudentRow::into_student).collect())
    }

    async fn search_by_course_name(&self, pattern: &str) -> Result<Vec<Student>> {
        self.fetch_all_like("c.course_name", pattern).await
    }

    async fn find_by_age_range(&self, min: i32, max: i32) -> Result<Vec<Student>> {
        let rows: Vec<StudentRow> = sqlx::query_as(&format!(
            "{SELECT_STUDENTS} WHERE s.age BETWEEN ? AND ? ORDER BY s.age, s.name"
        ))
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(StudentRow::into_student).collect())
    }

    async fn is_email_taken(&self, email: &str, exclude: Option<StudentId>) -> Result<bool> {
        // AUTOINCREMENT ids start at 1, so 0 never excludes a real row
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE email = ? AND student_id != ?")
                .bind(email)
                .bind(exclude.unwrap_or(0))
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(count > 0)
    }

    async fn count_by_course(&self, course_id: CourseId) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE course_id = ?")
            .bind(course_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn average_age(&self) -> Result<Option<f64>> {
        sqlx::query_scalar("SELECT AVG(age) FROM students")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

/// SQLite row representation (students LEFT JOIN courses)
#[derive(Debug, sqlx::FromRow)]
struct StudentRow {
    student_id: i64,
    name: String,
    age: i32,
    email: String,
    course_id: i64,
    course_name: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl StudentRow {
    fn into_student(self) -> Student {
        Student {
            id: self.student_id,
            name: self.name,
            age: self.age,
            email: self.email,
            course_id: self.course_id,
            course_name: self.course_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations, PoolConfig, SqliteCourseRepository};
    use registrar_core::domain::CourseDraft;
    use registrar_core::port::{CourseRepository, SystemClock};

    struct Fixture {
        students: SqliteStudentRepository,
        courses: SqliteCourseRepository,
        cs: CourseId,
        art: CourseId,
    }

    async fn setup_test_db() -> Fixture {
        let pool = create_pool("sqlite::memory:", &PoolConfig::default())
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let courses = SqliteCourseRepository::new(pool.clone(), clock.clone());
        let cs = courses
            .insert(&CourseDraft::new("Computer Science", None))
            .await
            .unwrap();
        let art = courses.insert(&CourseDraft::new("Fine Art", None)).await.unwrap();

        Fixture {
            students: SqliteStudentRepository::new(pool, clock),
            courses,
            cs,
            art,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_joins_course_name() {
        let f = setup_test_db().await;
        let id = f
            .students
            .insert(&StudentDraft::new("Ana Lee", 20, "ana@x.com", f.cs))
            .await
            .unwrap();

        let student = f.students.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(student.name, "Ana Lee");
        assert_eq!(student.course_name.as_deref(), Some("Computer Science"));

        let by_email = f.students.find_by_email("ana@x.com").await.unwrap();
        assert_eq!(by_email.map(|s| s.id), Some(id));
        assert!(f.students.find_by_id(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dangling_course_reads_as_none() {
        let f = setup_test_db().await;
        let id = f
            .students
            .insert(&StudentDraft::new("Ana Lee", 20, "ana@x.com", f.art))
            .await
            .unwrap();

        assert!(f.courses.delete(f.art).await.unwrap());

        let student = f.students.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(student.course_id, f.art);
        assert_eq!(student.course_name, None);
    }

    #[tokio::test]
    async fn test_age_range_ordering() {
        let f = setup_test_db().await;
        for (name, age, email) in [
            ("Zoe", 19, "zoe@x.com"),
            ("Ana", 22, "ana@x.com"),
            ("Bo", 19, "bo@x.com"),
            ("Cy", 40, "cy@x.com"),
        ] {
            f.students
                .insert(&StudentDraft::new(name, age, email, f.cs))
                .await
                .unwrap();
        }

        let names: Vec<String> = f
            .students
            .find_by_age_range(19, 22)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Bo", "Zoe", "Ana"]);
    }

    #[tokio::test]
    async fn test_filters_by_course() {
        let f = setup_test_db().await;
        f.students
            .insert(&StudentDraft::new("Ana", 20, "ana@x.com", f.cs))
            .await
            .unwrap();
        f.students
            .insert(&StudentDraft::new("Bo", 21, "bo@x.com", f.art))
            .await
            .unwrap();

        let cs = f.students.find_by_course(f.cs).await.unwrap();
        assert_eq!(cs.len(), 1);
        assert_eq!(cs[0].name, "Ana");

        let art = f.students.search_by_course_name("art").await.unwrap();
        assert_eq!(art.len(), 1);
        assert_eq!(art[0].name, "Bo");

        assert_eq!(f.students.count_by_course(f.cs).await.unwrap(), 1);
        assert_eq!(f.students.search_by_name("o").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_email_taken_respects_exclusion() {
        let f = setup_test_db().await;
        let id = f
            .students
            .insert(&StudentDraft::new("Ana", 20, "ana@x.com", f.cs))
            .await
            .unwrap();

        assert!(f.students.is_email_taken("ana@x.com", None).await.unwrap());
        assert!(!f.students.is_email_taken("ana@x.com", Some(id)).await.unwrap());
        assert!(!f.students.is_email_taken("bo@x.com", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_delete_and_aggregates() {
        let f = setup_test_db().await;
        assert_eq!(f.students.average_age().await.unwrap(), None);

        let ana = f
            .students
            .insert(&StudentDraft::new("Ana", 20, "ana@x.com", f.cs))
            .await
            .unwrap();
        f.students
            .insert(&StudentDraft::new("Bo", 30, "bo@x.com", f.cs))
            .await
            .unwrap();
        assert_eq!(f.students.average_age().await.unwrap(), Some(25.0));

        let moved = StudentDraft::new("Ana Lee", 21, "ana.lee@x.com", f.art);
        assert!(f.students.update(ana, &moved).await.unwrap());
        let reread = f.students.find_by_id(ana).await.unwrap().unwrap();
        assert_eq!(reread.to_draft(), moved);
        assert_eq!(reread.course_name.as_deref(), Some("Fine Art"));

        assert!(f.students.delete(ana).await.unwrap());
        assert!(!f.students.exists(ana).await.unwrap());
        assert_eq!(f.students.count().await.unwrap(), 1);
    }
}
