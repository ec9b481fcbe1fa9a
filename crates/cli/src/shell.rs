//! Interactive menu shell.
//!
//! Generic over its input and output so scripted sessions can drive it.
//! Service errors are printed and the menu continues; end of input exits.

use crate::app::App;
use crate::render;
use colored::Colorize;
use registrar_core::domain::validation::{parse_course_form, parse_student_form};
use registrar_core::domain::{Course, DomainError, Student};
use registrar_core::AppError;
use std::io::{self, BufRead, Write};

/// Why a menu action stopped early
enum Interrupt {
    /// Input closed
    Eof,
    Io(io::Error),
    App(AppError),
}

impl From<io::Error> for Interrupt {
    fn from(e: io::Error) -> Self {
        Interrupt::Io(e)
    }
}

impl From<AppError> for Interrupt {
    fn from(e: AppError) -> Self {
        Interrupt::App(e)
    }
}

impl From<DomainError> for Interrupt {
    fn from(e: DomainError) -> Self {
        Interrupt::App(e.into())
    }
}

type Step = std::result::Result<(), Interrupt>;

pub struct Shell<'a, R, W> {
    app: &'a App,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(app: &'a App, input: R, output: W) -> Self {
        Self { app, input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the main menu until the user exits or input ends
    pub async fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "{}", "=== Registrar ===".cyan().bold())?;

        match self.main_menu().await {
            Ok(()) | Err(Interrupt::Eof) => {}
            Err(Interrupt::Io(e)) => return Err(e),
            // Unreachable: app errors are recovered inside the menus
            Err(Interrupt::App(e)) => writeln!(self.output, "{}", e.to_string().red())?,
        }

        writeln!(self.output, "Goodbye!")?;
        self.output.flush()
    }

    async fn main_menu(&mut self) -> Step {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{}", "=== MAIN MENU ===".bold())?;
            writeln!(self.output, "1. Student Management")?;
            writeln!(self.output, "2. Course Management")?;
            writeln!(self.output, "3. Reports")?;
            writeln!(self.output, "0. Exit")?;

            match self.prompt("Choose an option: ")?.trim() {
                "1" => self.student_menu().await?,
                "2" => self.course_menu().await?,
                "3" => {
                    let result = self.show_report().await;
                    self.recover(result)?
                }
                "0" => return Ok(()),
                _ => self.invalid_choice()?,
            }
        }
    }

    async fn student_menu(&mut self) -> Step {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{}", "=== STUDENT MANAGEMENT ===".bold())?;
            writeln!(self.output, "1. Add Student")?;
            writeln!(self.output, "2. View All Students")?;
            writeln!(self.output, "3. Search Student by Name")?;
            writeln!(self.output, "4. Filter Students by Course")?;
            writeln!(self.output, "5. Filter Students by Age Range")?;
            writeln!(self.output, "6. Update Student")?;
            writeln!(self.output, "7. Delete Student")?;
            writeln!(self.output, "0. Back to Main Menu")?;

            let result = match self.prompt("Choose an option: ")?.trim() {
                "1" => self.add_student().await,
                "2" => self.list_students().await,
                "3" => self.search_students().await,
                "4" => self.students_by_course().await,
                "5" => self.students_by_age().await,
                "6" => self.update_student().await,
                "7" => self.delete_student().await,
                "0" => return Ok(()),
                _ => self.invalid_choice(),
            };
            self.recover(result)?;
        }
    }

    async fn course_menu(&mut self) -> Step {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{}", "=== COURSE MANAGEMENT ===".bold())?;
            writeln!(self.output, "1. Add Course")?;
            writeln!(self.output, "2. View All Courses")?;
            writeln!(self.output, "3. Update Course")?;
            writeln!(self.output, "4. Delete Course")?;
            writeln!(self.output, "0. Back to Main Menu")?;

            let result = match self.prompt("Choose an option: ")?.trim() {
                "1" => self.add_course().await,
                "2" => self.list_courses().await,
                "3" => self.update_course().await,
                "4" => self.delete_course().await,
                "0" => return Ok(()),
                _ => self.invalid_choice(),
            };
            self.recover(result)?;
        }
    }

    // Students

    async fn add_student(&mut self) -> Step {
        writeln!(self.output, "\n--- Add New Student ---")?;
        let name = self.prompt("Enter student name: ")?;
        let age = self.prompt("Enter student age: ")?;
        let email = self.prompt("Enter student email: ")?;

        if !self.show_course_choices().await? {
            return Ok(());
        }
        let course = self.prompt("Enter course ID: ")?;

        let draft = parse_student_form(&name, &age, &email, &course)?;
        let id = self.app.students.add(draft).await?;
        self.success(&format!("Student added successfully with ID: {}", id))
    }

    async fn list_students(&mut self) -> Step {
        writeln!(self.output, "\n--- All Students ---")?;
        let students = self.app.students.list().await?;
        writeln!(self.output, "{}", render::student_table(&students))?;
        Ok(())
    }

    async fn search_students(&mut self) -> Step {
        let pattern = self.prompt("Enter name to search: ")?;
        let students = self.app.students.search(&pattern).await?;
        if students.is_empty() {
            writeln!(self.output, "No students found with name containing: {}", pattern.trim())?;
            return Ok(());
        }
        writeln!(self.output, "Search results:")?;
        writeln!(self.output, "{}", render::student_table(&students))?;
        Ok(())
    }

    async fn students_by_course(&mut self) -> Step {
        let pattern = self.prompt("Enter course name to filter by: ")?;
        let students = self.app.students.by_course_name(&pattern).await?;
        if students.is_empty() {
            writeln!(self.output, "No students found in course: {}", pattern.trim())?;
            return Ok(());
        }
        writeln!(self.output, "Students in course '{}':", pattern.trim())?;
        writeln!(self.output, "{}", render::student_table(&students))?;
        Ok(())
    }

    async fn students_by_age(&mut self) -> Step {
        let min = parse_age_bound(&self.prompt("Enter minimum age: ")?)?;
        let max = parse_age_bound(&self.prompt("Enter maximum age: ")?)?;

        let students = self.app.students.by_age_range(min, max).await?;
        if students.is_empty() {
            writeln!(self.output, "No students found in age range: {}-{}", min, max)?;
            return Ok(());
        }
        writeln!(self.output, "Students aged {}-{}:", min, max)?;
        writeln!(self.output, "{}", render::student_table(&students))?;
        Ok(())
    }

    async fn update_student(&mut self) -> Step {
        let id = parse_id(&self.prompt("Enter student ID to update: ")?)?;
        let current = self.app.students.get(id).await?;
        self.show_student(&current)?;

        let name = self.prompt("Enter new name (or press Enter to keep current): ")?;
        let age = self.prompt("Enter new age (or press Enter to keep current): ")?;
        let email = self.prompt("Enter new email (or press Enter to keep current): ")?;
        self.show_course_choices().await?;
        let course = self.prompt("Enter new course ID (or press Enter to keep current): ")?;

        let draft = parse_student_form(
            &keep_or(name, current.name),
            &keep_or(age, current.age.to_string()),
            &keep_or(email, current.email),
            &keep_or(course, current.course_id.to_string()),
        )?;
        self.app.students.update(id, draft).await?;
        self.success("Student updated successfully!")
    }

    async fn delete_student(&mut self) -> Step {
        let id = parse_id(&self.prompt("Enter student ID to delete: ")?)?;
        let current = self.app.students.get(id).await?;
        self.show_student(&current)?;

        if !self.confirm("Are you sure you want to delete this student? (y/N): ")? {
            writeln!(self.output, "Deletion cancelled.")?;
            return Ok(());
        }
        self.app.students.delete(id).await?;
        self.success("Student deleted successfully!")
    }

    fn show_student(&mut self, s: &Student) -> Step {
        writeln!(self.output, "Current student information:")?;
        writeln!(self.output, "{}", render::student_detail(s))?;
        Ok(())
    }

    // Courses

    async fn add_course(&mut self) -> Step {
        writeln!(self.output, "\n--- Add New Course ---")?;
        let name = self.prompt("Enter course name: ")?;
        let description = self.prompt("Enter course description (optional): ")?;

        let draft = parse_course_form(&name, &description)?;
        let id = self.app.courses.add(draft).await?;
        self.success(&format!("Course added successfully with ID: {}", id))
    }

    async fn list_courses(&mut self) -> Step {
        writeln!(self.output, "\n--- All Courses ---")?;
        let courses = self.app.courses.list().await?;
        writeln!(self.output, "{}", render::course_table(&courses))?;
        Ok(())
    }

    async fn update_course(&mut self) -> Step {
        let id = parse_id(&self.prompt("Enter course ID to update: ")?)?;
        let current = self.app.courses.get(id).await?;
        self.show_course(&current)?;

        let name = self.prompt("Enter new name (or press Enter to keep current): ")?;
        let description =
            self.prompt("Enter new description (or press Enter to keep current): ")?;

        let draft = parse_course_form(
            &keep_or(name, current.name),
            &keep_or(description, current.description.unwrap_or_default()),
        )?;
        self.app.courses.update(id, draft).await?;
        self.success("Course updated successfully!")
    }

    async fn delete_course(&mut self) -> Step {
        let id = parse_id(&self.prompt("Enter course ID to delete: ")?)?;
        let current = self.app.courses.get(id).await?;
        self.show_course(&current)?;

        if !self.confirm("Are you sure you want to delete this course? (y/N): ")? {
            writeln!(self.output, "Deletion cancelled.")?;
            return Ok(());
        }
        self.app.courses.delete(id).await?;
        self.success("Course deleted successfully!")
    }

    fn show_course(&mut self, c: &Course) -> Step {
        writeln!(self.output, "Current course information:")?;
        writeln!(self.output, "{}", render::course_detail(c))?;
        Ok(())
    }

    /// Print the course list as choices; false when there is nothing to pick
    async fn show_course_choices(&mut self) -> std::result::Result<bool, Interrupt> {
        let courses = self.app.courses.list().await?;
        if courses.is_empty() {
            writeln!(self.output, "No courses available. Please add courses first.")?;
            return Ok(false);
        }
        writeln!(self.output, "Available courses:")?;
        for course in &courses {
            writeln!(self.output, "{}. {}", course.id, course.name)?;
        }
        Ok(true)
    }

    // Reports

    async fn show_report(&mut self) -> Step {
        let report = self.app.reports.summary().await?;
        writeln!(self.output, "\n{}", "=== REPORTS ===".bold())?;
        writeln!(self.output, "{}", render::report(&report))?;
        Ok(())
    }

    // Plumbing

    fn prompt(&mut self, label: &str) -> std::result::Result<String, Interrupt> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Interrupt::Eof);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn confirm(&mut self, label: &str) -> std::result::Result<bool, Interrupt> {
        let answer = self.prompt(label)?;
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn success(&mut self, message: &str) -> Step {
        writeln!(self.output, "{}", message.green())?;
        Ok(())
    }

    fn invalid_choice(&mut self) -> Step {
        writeln!(self.output, "Invalid choice. Please try again.")?;
        Ok(())
    }

    /// Print an application error and carry on; pass anything else through
    fn recover(&mut self, result: Step) -> Step {
        match result {
            Err(Interrupt::App(e)) => {
                tracing::warn!(kind = e.kind(), error = %e, "Shell action failed");
                writeln!(self.output, "{}", format!("Error: {}", e).red())?;
                Ok(())
            }
            other => other,
        }
    }
}

fn keep_or(input: String, current: String) -> String {
    if input.trim().is_empty() {
        current
    } else {
        input
    }
}

fn parse_id(raw: &str) -> std::result::Result<i64, DomainError> {
    raw.trim().parse().map_err(|_| DomainError::Validation {
        field: "id",
        message: "ID must be a valid number".to_string(),
    })
}

fn parse_age_bound(raw: &str) -> std::result::Result<i32, DomainError> {
    raw.trim().parse().map_err(|_| DomainError::Validation {
        field: "age",
        message: "Age must be a valid number".to_string(),
    })
}
