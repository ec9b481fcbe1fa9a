// Report Model

use super::course::CourseEnrollment;
use serde::{Deserialize, Serialize};

/// Aggregate figures over all students and courses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub total_students: i64,
    pub total_courses: i64,
    /// None when there are no students
    pub average_age: Option<f64>,
    /// One row per course, ordered by course name
    pub enrollment: Vec<CourseEnrollment>,
}
