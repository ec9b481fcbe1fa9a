// Application Layer - Domain services over the repository ports

pub mod course;
pub mod report;
pub mod student;

// Re-exports
pub use course::CourseService;
pub use report::ReportService;
pub use student::StudentService;
