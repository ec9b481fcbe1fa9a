// Domain Layer - Entities and validation rules

pub mod course;
pub mod error;
pub mod report;
pub mod student;
pub mod validation;

// Re-exports
pub use course::{Course, CourseDeletePolicy, CourseDraft, CourseEnrollment, CourseId};
pub use error::DomainError;
pub use report::Report;
pub use student::{normalize_email, Student, StudentDraft, StudentId};
