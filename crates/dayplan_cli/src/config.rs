//! Runtime configuration for the CLI.
//!
//! # Responsibility
//! - Resolve database path, log directory and log level.
//!
//! # Invariants
//! - Flag and environment values are already merged by clap; blank values
//!   fall back to defaults.
//! - Default paths live under the OS temp directory.

use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE_NAME: &str = "dayplan.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "dayplan-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl PlannerConfig {
    pub fn resolve(
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Self {
        Self::resolve_in(std::env::temp_dir().as_path(), db_path, log_dir, log_level)
    }

    fn resolve_in(
        base_dir: &Path,
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Self {
        Self {
            db_path: non_blank_path(db_path).unwrap_or_else(|| base_dir.join(DEFAULT_DB_FILE_NAME)),
            log_dir: non_blank_path(log_dir)
                .map(|dir| absolutize(base_dir, dir))
                .unwrap_or_else(|| base_dir.join(DEFAULT_LOG_DIR_NAME)),
            log_level: log_level
                .map(|level| level.trim().to_string())
                .filter(|level| !level.is_empty())
                .unwrap_or_else(|| dayplan_core::default_log_level().to_string()),
        }
    }
}

fn non_blank_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|value| !value.as_os_str().to_string_lossy().trim().is_empty())
}

// The logger only accepts absolute directories.
fn absolutize(base_dir: &Path, dir: PathBuf) -> PathBuf {
    if dir.is_absolute() {
        return dir;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&dir))
        .unwrap_or_else(|_| base_dir.join(dir))
}
