// Student Domain Model

use super::course::CourseId;
use serde::{Deserialize, Serialize};

/// Student ID (assigned by storage)
pub type StudentId = i64;

/// Inclusive age bounds for a student
pub const MIN_AGE: i32 = 16;
pub const MAX_AGE: i32 = 100;

/// Writable student fields (no identity, no timestamps, no joined data)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub name: String,
    pub age: i32,
    pub email: String,
    pub course_id: CourseId,
}

impl StudentDraft {
    pub fn new(
        name: impl Into<String>,
        age: i32,
        email: impl Into<String>,
        course_id: CourseId,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            email: email.into(),
            course_id,
        }
    }

    /// Copy with surrounding whitespace removed and the email normalized
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            age: self.age,
            email: normalize_email(&self.email),
            course_id: self.course_id,
        }
    }
}

/// Student Entity as read back from storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub age: i32,
    pub email: String,
    pub course_id: CourseId,

    /// Joined from the course at read time; None if the course is gone
    pub course_name: Option<String>,

    pub created_at: i64, // epoch ms
    pub updated_at: i64, // epoch ms
}

impl Student {
    pub fn to_draft(&self) -> StudentDraft {
        StudentDraft {
            name: self.name.clone(),
            age: self.age,
            email: self.email.clone(),
            course_id: self.course_id,
        }
    }
}

/// Trimmed, lower-cased email used for storage and comparison
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@domain` with exactly one `@`, a non-empty local part and a dot
/// inside the domain (not at either end)
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
