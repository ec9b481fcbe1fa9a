//! Shared wiring for end-to-end tests

use registrar_core::application::{CourseService, ReportService, StudentService};
use registrar_core::domain::CourseDeletePolicy;
use registrar_core::port::{Clock, CourseRepository, StudentRepository, SystemClock};
use registrar_infra_sqlite::{
    create_pool, run_migrations, PoolConfig, SqliteCourseRepository, SqliteStudentRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;

#[allow(dead_code)]
pub struct Registrar {
    pub pool: SqlitePool,
    pub courses: CourseService,
    pub students: StudentService,
    pub reports: ReportService,
}

pub async fn open(url: &str, policy: CourseDeletePolicy) -> Registrar {
    let pool = create_pool(url, &PoolConfig::default()).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let courses: Arc<dyn CourseRepository> =
        Arc::new(SqliteCourseRepository::new(pool.clone(), clock.clone()));
    let students: Arc<dyn StudentRepository> =
        Arc::new(SqliteStudentRepository::new(pool.clone(), clock));

    Registrar {
        pool,
        courses: CourseService::new(courses.clone(), students.clone(), policy),
        students: StudentService::new(students.clone(), courses.clone()),
        reports: ReportService::new(students, courses),
    }
}

pub async fn in_memory(policy: CourseDeletePolicy) -> Registrar {
    open("sqlite::memory:", policy).await
}
