//! Registrar CLI - student and course records over SQLite

mod app;
mod commands;
mod config;
mod logging;
mod render;
mod shell;

use anyhow::Result;
use app::App;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{CourseCommand, StudentCommand};
use config::Settings;
use registrar_core::domain::CourseDeletePolicy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "registrar")]
#[command(about = "Student and course registrar", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database URL, overrides configuration
    #[arg(long, global = true, env = "REGISTRAR_DATABASE_URL")]
    database_url: Option<String>,

    /// What happens to students when their course is deleted
    #[arg(long, global = true)]
    delete_policy: Option<CourseDeletePolicy>,

    /// Print records as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Shell,

    /// Manage courses
    #[command(subcommand)]
    Course(CourseCommand),

    /// Manage students
    #[command(subcommand)]
    Student(StudentCommand),

    /// Totals, average age and enrollment per course
    Report,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}", format!("✗ {:#}", e).red().bold());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(url) = cli.database_url {
        settings.database_url = url;
    }
    if let Some(policy) = cli.delete_policy {
        settings.course_delete_policy = policy;
    }

    let command = cli.command.unwrap_or(Commands::Shell);
    let default_filter = match command {
        Commands::Shell if settings.log_dir.is_none() => logging::QUIET_FILTER,
        _ => logging::VERBOSE_FILTER,
    };
    let _log_guard = logging::init(
        settings.log_format,
        settings.log_dir.as_deref(),
        default_filter,
    );

    let app = App::connect(&settings).await?;

    match command {
        Commands::Shell => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            shell::Shell::new(&app, stdin.lock(), stdout.lock())
                .run()
                .await?;
        }
        Commands::Course(cmd) => commands::run_course(&app, cmd, cli.json).await?,
        Commands::Student(cmd) => commands::run_student(&app, cmd, cli.json).await?,
        Commands::Report => commands::run_report(&app, cli.json).await?,
    }

    Ok(())
}
