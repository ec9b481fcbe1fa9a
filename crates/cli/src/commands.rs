//! One-shot subcommands.

use crate::app::App;
use crate::render;
use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use registrar_core::domain::validation::{parse_course_form, parse_student_form};
use registrar_core::AppError;
use serde::Serialize;

#[derive(Subcommand)]
pub enum CourseCommand {
    /// Add a new course
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List all courses
    List,

    /// Show one course
    Show { id: i64 },

    /// Search courses by name substring
    Search { pattern: String },

    /// Update a course; omitted fields keep their current value
    Update {
        id: i64,

        #[arg(short, long)]
        name: Option<String>,

        /// Empty string clears the description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a course (students are handled per the configured policy)
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum StudentCommand {
    /// Add a new student
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        age: String,

        #[arg(short, long)]
        email: String,

        /// Course ID
        #[arg(short, long)]
        course: String,
    },

    /// List all students
    List,

    /// Show one student
    Show { id: i64 },

    /// Search students by name substring
    Search { pattern: String },

    /// Students referencing a course ID
    ByCourse { course_id: i64 },

    /// Students whose course name contains a substring
    ByCourseName { pattern: String },

    /// Students within an inclusive age range
    #[command(allow_negative_numbers = true)]
    ByAge { min: i32, max: i32 },

    /// Update a student; omitted fields keep their current value
    Update {
        id: i64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        age: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        course: Option<String>,
    },

    /// Delete a student
    Delete { id: i64 },
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn done(message: String) {
    println!("{}", format!("✓ {}", message).green().bold());
}

pub async fn run_course(app: &App, command: CourseCommand, json: bool) -> Result<()> {
    match command {
        CourseCommand::Add { name, description } => {
            let draft = parse_course_form(&name, &description).map_err(AppError::from)?;
            let id = app.courses.add(draft).await?;
            done(format!("Course added with ID {}", id));
        }

        CourseCommand::List => {
            let courses = app.courses.list().await?;
            if json {
                return print_json(&courses);
            }
            println!("{}", render::course_table(&courses));
        }

        CourseCommand::Show { id } => {
            let course = app.courses.get(id).await?;
            if json {
                return print_json(&course);
            }
            println!("{}", format!("Course #{}", id).cyan().bold());
            println!("{}", render::course_detail(&course));
        }

        CourseCommand::Search { pattern } => {
            let courses = app.courses.search(&pattern).await?;
            if json {
                return print_json(&courses);
            }
            println!("{}", render::course_table(&courses));
        }

        CourseCommand::Update {
            id,
            name,
            description,
        } => {
            let current = app.courses.get(id).await?;
            let name = name.unwrap_or(current.name);
            let description = description.or(current.description).unwrap_or_default();
            let draft = parse_course_form(&name, &description).map_err(AppError::from)?;
            app.courses.update(id, draft).await?;
            done(format!("Course {} updated", id));
        }

        CourseCommand::Delete { id } => {
            app.courses.delete(id).await?;
            done(format!(
                "Course {} deleted ({} policy)",
                id,
                app.courses.delete_policy()
            ));
        }
    }

    Ok(())
}

pub async fn run_student(app: &App, command: StudentCommand, json: bool) -> Result<()> {
    let listing = match command {
        StudentCommand::Add {
            name,
            age,
            email,
            course,
        } => {
            let draft = parse_student_form(&name, &age, &email, &course).map_err(AppError::from)?;
            let id = app.students.add(draft).await?;
            done(format!("Student added with ID {}", id));
            return Ok(());
        }

        StudentCommand::Show { id } => {
            let student = app.students.get(id).await?;
            if json {
                return print_json(&student);
            }
            println!("{}", format!("Student #{}", id).cyan().bold());
            println!("{}", render::student_detail(&student));
            return Ok(());
        }

        StudentCommand::Update {
            id,
            name,
            age,
            email,
            course,
        } => {
            let current = app.students.get(id).await?;
            let draft = parse_student_form(
                &name.unwrap_or(current.name),
                &age.unwrap_or_else(|| current.age.to_string()),
                &email.unwrap_or(current.email),
                &course.unwrap_or_else(|| current.course_id.to_string()),
            )
            .map_err(AppError::from)?;
            app.students.update(id, draft).await?;
            done(format!("Student {} updated", id));
            return Ok(());
        }

        StudentCommand::Delete { id } => {
            app.students.delete(id).await?;
            done(format!("Student {} deleted", id));
            return Ok(());
        }

        StudentCommand::List => app.students.list().await?,
        StudentCommand::Search { pattern } => app.students.search(&pattern).await?,
        StudentCommand::ByCourse { course_id } => app.students.by_course(course_id).await?,
        StudentCommand::ByCourseName { pattern } => app.students.by_course_name(&pattern).await?,
        StudentCommand::ByAge { min, max } => app.students.by_age_range(min, max).await?,
    };

    if json {
        return print_json(&listing);
    }
    println!("{}", render::student_table(&listing));
    Ok(())
}

pub async fn run_report(app: &App, json: bool) -> Result<()> {
    let report = app.reports.summary().await?;
    if json {
        return print_json(&report);
    }
    println!("{}", "Registrar Report".cyan().bold());
    println!();
    println!("{}", render::report(&report));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_app;
    use registrar_core::domain::CourseDeletePolicy;

    #[tokio::test]
    async fn test_update_merges_unspecified_fields() {
        let app = test_app(CourseDeletePolicy::Restrict).await;

        run_course(
            &app,
            CourseCommand::Add {
                name: "Computer Science".to_string(),
                description: "CS program".to_string(),
            },
            false,
        )
        .await
        .unwrap();
        run_student(
            &app,
            StudentCommand::Add {
                name: "Ana Lee".to_string(),
                age: "20".to_string(),
                email: "ana@x.com".to_string(),
                course: "1".to_string(),
            },
            false,
        )
        .await
        .unwrap();

        run_student(
            &app,
            StudentCommand::Update {
                id: 1,
                name: None,
                age: Some("21".to_string()),
                email: None,
                course: None,
            },
            false,
        )
        .await
        .unwrap();

        let student = app.students.get(1).await.unwrap();
        assert_eq!(student.age, 21);
        assert_eq!(student.email, "ana@x.com");
        assert_eq!(student.course_name.as_deref(), Some("Computer Science"));

        run_course(
            &app,
            CourseCommand::Update {
                id: 1,
                name: None,
                description: Some(String::new()),
            },
            false,
        )
        .await
        .unwrap();
        let course = app.courses.get(1).await.unwrap();
        assert_eq!(course.name, "Computer Science");
        assert_eq!(course.description, None);
    }

    #[tokio::test]
    async fn test_errors_propagate_as_app_errors() {
        let app = test_app(CourseDeletePolicy::Restrict).await;

        let err = run_student(&app, StudentCommand::ByAge { min: 30, max: 20 }, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::Domain(_))
        ));

        let err = run_course(&app, CourseCommand::Delete { id: 9 }, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::NotFound(_))
        ));
    }
}
