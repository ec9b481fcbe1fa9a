//! Layered settings: defaults, optional TOML file, `REGISTRAR_*` environment.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use registrar_core::domain::CourseDeletePolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "REGISTRAR";
const CONFIG_FILE_NAME: &str = "registrar.toml";
const DATABASE_FILE_NAME: &str = "registrar.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub course_delete_policy: CourseDeletePolicy,
    pub log_format: LogFormat,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    /// Load settings; an explicit `config_path` must exist, the default one may not
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("database_url", default_database_url())?
            .set_default("max_connections", 5)?
            .set_default("acquire_timeout_secs", 5)?
            .set_default("course_delete_policy", "restrict")?
            .set_default("log_format", "pretty")?;

        builder = match config_path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => match default_config_file() {
                Some(path) => builder.add_source(config::File::from(path).required(false)),
                None => builder,
            },
        };

        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "registrar", "registrar")
}

fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn default_database_url() -> String {
    let path = project_dirs()
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME));
    format!("sqlite://{}", path.display())
}

/// Expand `~` in a file-backed SQLite URL and make sure its directory exists
pub fn resolve_database_url(raw: &str) -> Result<String> {
    let Some(rest) = raw
        .strip_prefix("sqlite://")
        .or_else(|| raw.strip_prefix("sqlite:"))
    else {
        return Ok(raw.to_string());
    };
    if rest.starts_with(":memory:") {
        return Ok(raw.to_string());
    }

    let (file, query) = match rest.split_once('?') {
        Some((file, query)) => (file, format!("?{}", query)),
        None => (rest, String::new()),
    };
    let expanded = shellexpand::tilde(file).into_owned();

    if let Some(parent) = Path::new(&expanded).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
    }

    Ok(format!("sqlite://{}{}", expanded, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_memory_url_untouched() {
        assert_eq!(resolve_database_url("sqlite::memory:").unwrap(), "sqlite::memory:");
    }

    #[test]
    fn test_file_url_creates_parent_and_keeps_query() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("registrar.db");
        let url = format!("sqlite://{}?mode=rwc", db.display());

        let resolved = resolve_database_url(&url).unwrap();
        assert_eq!(resolved, url);
        assert!(db.parent().unwrap().is_dir());
    }

    #[test]
    fn test_load_from_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "database_url = \"sqlite::memory:\"\nmax_connections = 2\ncourse_delete_policy = \"cascade\"\nlog_format = \"json\""
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.max_connections, 2);
        assert_eq!(settings.acquire_timeout(), Duration::from_secs(5));
        assert_eq!(settings.course_delete_policy, CourseDeletePolicy::Cascade);
        assert_eq!(settings.log_format, LogFormat::Json);
        assert!(settings.log_dir.is_none());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }
}
