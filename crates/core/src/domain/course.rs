// Course Domain Model

use serde::{Deserialize, Serialize};

/// Course ID (assigned by storage)
pub type CourseId = i64;

/// Writable course fields (no identity, no timestamps)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDraft {
    pub name: String,
    pub description: Option<String>,
}

impl CourseDraft {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }
}

/// Course Entity as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub description: Option<String>,

    pub created_at: i64, // epoch ms
    pub updated_at: i64, // epoch ms
}

impl Course {
    /// Writable fields of this course, e.g. as the base for an edit
    pub fn to_draft(&self) -> CourseDraft {
        CourseDraft {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// What happens to students when the course they reference is deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseDeletePolicy {
    /// Refuse with `Conflict` while any student references the course
    #[default]
    Restrict,
    /// Delete the referencing students together with the course
    Cascade,
    /// Delete only the course; students keep a dangling reference
    Orphan,
}

impl std::fmt::Display for CourseDeletePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseDeletePolicy::Restrict => write!(f, "restrict"),
            CourseDeletePolicy::Cascade => write!(f, "cascade"),
            CourseDeletePolicy::Orphan => write!(f, "orphan"),
        }
    }
}

impl std::str::FromStr for CourseDeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restrict" => Ok(CourseDeletePolicy::Restrict),
            "cascade" => Ok(CourseDeletePolicy::Cascade),
            "orphan" => Ok(CourseDeletePolicy::Orphan),
            other => Err(format!(
                "unknown course delete policy '{}' (expected restrict, cascade or orphan)",
                other
            )),
        }
    }
}

/// Number of students referencing one course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEnrollment {
    pub course_id: CourseId,
    pub course_name: String,
    pub students: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse_roundtrips_display() {
        for policy in [
            CourseDeletePolicy::Restrict,
            CourseDeletePolicy::Cascade,
            CourseDeletePolicy::Orphan,
        ] {
            let parsed: CourseDeletePolicy = policy.to_string().parse().unwrap();
            assert_eq!(parsed, policy);
        }
        assert_eq!(
            " Cascade ".parse::<CourseDeletePolicy>().unwrap(),
            CourseDeletePolicy::Cascade
        );
        assert!("nullify".parse::<CourseDeletePolicy>().is_err());
    }

    #[test]
    fn test_default_policy_is_restrict() {
        assert_eq!(CourseDeletePolicy::default(), CourseDeletePolicy::Restrict);
    }
}
