// Report Service - aggregate figures over students and courses

use crate::domain::Report;
use crate::error::Result;
use crate::port::{CourseRepository, StudentRepository};
use std::sync::Arc;

pub struct ReportService {
    students: Arc<dyn StudentRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl ReportService {
    pub fn new(students: Arc<dyn StudentRepository>, courses: Arc<dyn CourseRepository>) -> Self {
        Self { students, courses }
    }

    /// Totals, average age and per-course enrollment
    pub async fn summary(&self) -> Result<Report> {
        Ok(Report {
            total_students: self.students.count().await?,
            total_courses: self.courses.count().await?,
            average_age: self.students.average_age().await?,
            enrollment: self.courses.enrollment().await?,
        })
    }
}
