// Registrar Infrastructure - SQLite Adapter
// Implements: CourseRepository, StudentRepository

mod connection;
mod course_repository;
mod error;
mod migration;
mod pattern;
mod student_repository;

pub use connection::{create_pool, PoolConfig};
pub use course_repository::SqliteCourseRepository;
pub use migration::run_migrations;
pub use student_repository::SqliteStudentRepository;

// Note: sqlx::Error conversion goes through error::map_sqlx_error
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
