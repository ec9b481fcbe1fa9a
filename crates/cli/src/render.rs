//! Text rendering for records and reports.

use chrono::DateTime;
use registrar_core::domain::{Course, Report, Student};
use tabled::settings::Style;
use tabled::{Table, Tabled};

const DESCRIPTION_PREVIEW_LEN: usize = 50;
const NOT_AVAILABLE: &str = "N/A";

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Age")]
    age: i32,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Course")]
    course: String,
}

impl From<&Student> for StudentRow {
    fn from(s: &Student) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            age: s.age,
            email: s.email.clone(),
            course: course_label(s),
        }
    }
}

#[derive(Tabled)]
struct CourseRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Course Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Course> for CourseRow {
    fn from(c: &Course) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            description: c
                .description
                .as_deref()
                .map(|d| truncate(d, DESCRIPTION_PREVIEW_LEN))
                .unwrap_or_default(),
        }
    }
}

fn course_label(s: &Student) -> String {
    s.course_name
        .clone()
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Shorten to `max` characters, marking the cut with "..."
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Epoch milliseconds as a UTC timestamp
pub fn timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

pub fn student_table(students: &[Student]) -> String {
    if students.is_empty() {
        return "No students found.".to_string();
    }
    let rows: Vec<StudentRow> = students.iter().map(StudentRow::from).collect();
    Table::new(rows).with(Style::modern()).to_string()
}

pub fn course_table(courses: &[Course]) -> String {
    if courses.is_empty() {
        return "No courses found.".to_string();
    }
    let rows: Vec<CourseRow> = courses.iter().map(CourseRow::from).collect();
    Table::new(rows).with(Style::modern()).to_string()
}

pub fn student_detail(s: &Student) -> String {
    [
        format!("  ID:       {}", s.id),
        format!("  Name:     {}", s.name),
        format!("  Age:      {}", s.age),
        format!("  Email:    {}", s.email),
        format!("  Course:   {} (#{})", course_label(s), s.course_id),
        format!("  Created:  {}", timestamp(s.created_at)),
        format!("  Updated:  {}", timestamp(s.updated_at)),
    ]
    .join("\n")
}

pub fn course_detail(c: &Course) -> String {
    [
        format!("  ID:          {}", c.id),
        format!("  Name:        {}", c.name),
        format!(
            "  Description: {}",
            c.description.as_deref().unwrap_or(NOT_AVAILABLE)
        ),
        format!("  Created:     {}", timestamp(c.created_at)),
        format!("  Updated:     {}", timestamp(c.updated_at)),
    ]
    .join("\n")
}

pub fn report(report: &Report) -> String {
    let mut lines = vec![
        format!("Total Students: {}", report.total_students),
        format!("Total Courses: {}", report.total_courses),
    ];

    match report.average_age {
        Some(avg) => lines.push(format!("Average Student Age: {:.1} years", avg)),
        None => lines.push("Average Student Age: N/A".to_string()),
    }

    if !report.enrollment.is_empty() {
        lines.push(String::new());
        lines.push("Students per Course:".to_string());
        for row in &report.enrollment {
            lines.push(format!("  {}: {} students", row.course_name, row.students));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_core::domain::CourseEnrollment;

    fn student(course_name: Option<&str>) -> Student {
        Student {
            id: 7,
            name: "Ana Lee".to_string(),
            age: 20,
            email: "ana@x.com".to_string(),
            course_id: 1,
            course_name: course_name.map(str::to_string),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 50), "short");
        let long = "x".repeat(60);
        let cut = truncate(&long, 50);
        assert_eq!(cut.chars().count(), 50);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_student_table_shows_missing_course_as_na() {
        let table = student_table(&[student(None)]);
        assert!(table.contains("Ana Lee"));
        assert!(table.contains("N/A"));

        let table = student_table(&[student(Some("Computer Science"))]);
        assert!(table.contains("Computer Science"));
        assert!(!table.contains("N/A"));
    }

    #[test]
    fn test_empty_tables() {
        assert_eq!(student_table(&[]), "No students found.");
        assert_eq!(course_table(&[]), "No courses found.");
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(timestamp(0), "1970-01-01 00:00:00 UTC");
    }

    #[test]
    fn test_report_text() {
        let text = report(&Report {
            total_students: 2,
            total_courses: 1,
            average_age: Some(21.0),
            enrollment: vec![CourseEnrollment {
                course_id: 1,
                course_name: "Computer Science".to_string(),
                students: 2,
            }],
        });
        assert!(text.contains("Total Students: 2"));
        assert!(text.contains("Average Student Age: 21.0 years"));
        assert!(text.contains("Computer Science: 2 students"));

        let empty = report(&Report {
            total_students: 0,
            total_courses: 0,
            average_age: None,
            enrollment: vec![],
        });
        assert!(empty.contains("Average Student Age: N/A"));
    }
}
