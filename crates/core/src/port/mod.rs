// Port Layer - Interfaces for external dependencies

pub mod clock;
pub mod course_repository;
pub mod student_repository;

// Re-exports
pub use clock::{Clock, FixedClock, SystemClock};
pub use course_repository::CourseRepository;
pub use student_repository::StudentRepository;

#[cfg(test)]
pub use course_repository::MockCourseRepository;
#[cfg(test)]
pub use student_repository::MockStudentRepository;
