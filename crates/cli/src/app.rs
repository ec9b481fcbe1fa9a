//! Composition root: settings in, wired services out.

use crate::config::{resolve_database_url, Settings};
use anyhow::{Context, Result};
use registrar_core::application::{CourseService, ReportService, StudentService};
use registrar_core::domain::CourseDeletePolicy;
use registrar_core::port::{Clock, CourseRepository, StudentRepository, SystemClock};
use registrar_infra_sqlite::{
    create_pool, run_migrations, PoolConfig, SqliteCourseRepository, SqliteStudentRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

pub struct App {
    pub courses: CourseService,
    pub students: StudentService,
    pub reports: ReportService,
}

impl App {
    /// Open the configured database, migrate it, and wire the services
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let url = resolve_database_url(&settings.database_url)?;
        let pool_config = PoolConfig {
            max_connections: settings.max_connections,
            acquire_timeout: settings.acquire_timeout(),
        };

        let pool = create_pool(&url, &pool_config)
            .await
            .with_context(|| format!("Failed to open database {}", url))?;
        run_migrations(&pool)
            .await
            .context("Failed to migrate database")?;

        info!(
            database = %url,
            delete_policy = %settings.course_delete_policy,
            "Registrar ready"
        );
        Ok(Self::from_pool(pool, settings.course_delete_policy))
    }

    /// Wire services over an already-migrated pool
    pub fn from_pool(pool: SqlitePool, delete_policy: CourseDeletePolicy) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let courses: Arc<dyn CourseRepository> =
            Arc::new(SqliteCourseRepository::new(pool.clone(), clock.clone()));
        let students: Arc<dyn StudentRepository> =
            Arc::new(SqliteStudentRepository::new(pool, clock));

        Self {
            courses: CourseService::new(courses.clone(), students.clone(), delete_policy),
            students: StudentService::new(students.clone(), courses.clone()),
            reports: ReportService::new(students, courses),
        }
    }
}

#[cfg(test)]
pub(crate) async fn test_app(delete_policy: CourseDeletePolicy) -> App {
    let pool = create_pool("sqlite::memory:", &PoolConfig::default())
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    App::from_pool(pool, delete_policy)
}
