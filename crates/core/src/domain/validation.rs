//! Field validation for courses and students.
//!
//! All rules live in the two tables below and are checked in order; the
//! first failing rule is reported. Services run the tables before touching
//! storage, and the form parsers run them after converting raw input.

use super::course::CourseDraft;
use super::error::{DomainError, Result};
use super::student::{is_valid_email, StudentDraft, MAX_AGE, MIN_AGE};

pub const COURSE_NAME_MIN_LEN: usize = 3;
pub const COURSE_NAME_MAX_LEN: usize = 100;
pub const COURSE_DESCRIPTION_MAX_LEN: usize = 1000;

/// One declarative check over a record
pub struct Rule<T> {
    pub field: &'static str,
    pub check: fn(&T) -> bool,
    pub message: &'static str,
}

pub const COURSE_RULES: &[Rule<CourseDraft>] = &[
    Rule {
        field: "name",
        check: course_name_present,
        message: "Course name is required",
    },
    Rule {
        field: "name",
        check: course_name_long_enough,
        message: "Course name must be at least 3 characters long",
    },
    Rule {
        field: "name",
        check: course_name_short_enough,
        message: "Course name cannot exceed 100 characters",
    },
    Rule {
        field: "description",
        check: course_description_short_enough,
        message: "Course description cannot exceed 1000 characters",
    },
];

pub const STUDENT_RULES: &[Rule<StudentDraft>] = &[
    Rule {
        field: "name",
        check: student_name_present,
        message: "Name is required",
    },
    Rule {
        field: "age",
        check: student_age_in_bounds,
        message: "Age must be between 16 and 100",
    },
    Rule {
        field: "email",
        check: student_email_present,
        message: "Email is required",
    },
    Rule {
        field: "email",
        check: student_email_well_formed,
        message: "Invalid email format",
    },
    Rule {
        field: "course",
        check: student_course_positive,
        message: "Invalid course selection",
    },
];

fn course_name_present(c: &CourseDraft) -> bool {
    !c.name.trim().is_empty()
}

fn course_name_long_enough(c: &CourseDraft) -> bool {
    c.name.trim().chars().count() >= COURSE_NAME_MIN_LEN
}

fn course_name_short_enough(c: &CourseDraft) -> bool {
    c.name.trim().chars().count() <= COURSE_NAME_MAX_LEN
}

fn course_description_short_enough(c: &CourseDraft) -> bool {
    c.description
        .as_ref()
        .map_or(true, |d| d.chars().count() <= COURSE_DESCRIPTION_MAX_LEN)
}

fn student_name_present(s: &StudentDraft) -> bool {
    !s.name.trim().is_empty()
}

fn student_age_in_bounds(s: &StudentDraft) -> bool {
    (MIN_AGE..=MAX_AGE).contains(&s.age)
}

fn student_email_present(s: &StudentDraft) -> bool {
    !s.email.trim().is_empty()
}

fn student_email_well_formed(s: &StudentDraft) -> bool {
    is_valid_email(&s.email)
}

fn student_course_positive(s: &StudentDraft) -> bool {
    s.course_id > 0
}

/// Run a rule table against a record, reporting the first failure
pub fn apply<T>(rules: &[Rule<T>], value: &T) -> Result<()> {
    match rules.iter().find(|rule| !(rule.check)(value)) {
        Some(rule) => Err(DomainError::Validation {
            field: rule.field,
            message: rule.message.to_string(),
        }),
        None => Ok(()),
    }
}

pub fn validate_course(draft: &CourseDraft) -> Result<()> {
    apply(COURSE_RULES, draft)
}

pub fn validate_student(draft: &StudentDraft) -> Result<()> {
    apply(STUDENT_RULES, draft)
}

/// Age range filter bounds: both non-negative and ordered
pub fn check_age_range(min: i32, max: i32) -> Result<()> {
    if min < 0 || max < 0 || min > max {
        return Err(DomainError::InvalidRange { min, max });
    }
    Ok(())
}

/// Build a course draft from raw form input (blank description = none)
pub fn parse_course_form(name: &str, description: &str) -> Result<CourseDraft> {
    let description = description.trim();
    let draft = CourseDraft {
        name: name.trim().to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
    };
    validate_course(&draft)?;
    Ok(draft)
}

/// Build a student draft from raw form input
pub fn parse_student_form(name: &str, age: &str, email: &str, course: &str) -> Result<StudentDraft> {
    let age = parse_number(
        "age",
        age,
        "Age is required",
        "Age must be a valid number",
    )?;
    let course_id = parse_number(
        "course",
        course,
        "Course selection is required",
        "Invalid course selection",
    )?;

    let draft = StudentDraft {
        name: name.trim().to_string(),
        age,
        email: email.trim().to_string(),
        course_id: i64::from(course_id),
    };
    validate_student(&draft)?;
    Ok(draft)
}

fn parse_number(
    field: &'static str,
    raw: &str,
    missing: &'static str,
    invalid: &'static str,
) -> Result<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::Validation {
            field,
            message: missing.to_string(),
        });
    }
    raw.parse::<i32>().map_err(|_| DomainError::Validation {
        field,
        message: invalid.to_string(),
    })
}
