//! Runtime configuration for core callers.
//!
//! # Responsibility
//! - Resolve database, logging, timer, and suggestion settings from the
//!   environment.
//! - Load the canned suggestion list used when no generator is reachable.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - A loaded suggestion list is never empty.

use crate::assistant::Suggestion;
use crate::logging::default_log_level;
use crate::pomodoro::PomodoroConfig;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "TASKMATE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "TASKMATE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKMATE_LOG_DIR";
pub const ENV_SUGGESTIONS_PATH: &str = "TASKMATE_SUGGESTIONS_PATH";
pub const ENV_POMODORO_WORK_SECS: &str = "TASKMATE_POMODORO_WORK_SECS";
pub const ENV_POMODORO_BREAK_SECS: &str = "TASKMATE_POMODORO_BREAK_SECS";

const DEFAULT_DB_FILE_NAME: &str = "taskmate.sqlite3";
const BUILTIN_SUGGESTIONS: &str = include_str!("fallback_suggestions.json");

/// Configuration loading failures.
#[derive(Debug)]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    InvalidNumber { key: &'static str, value: String },
    /// Suggestion file could not be read.
    Io { path: PathBuf, source: std::io::Error },
    /// Suggestion JSON is malformed.
    Json(serde_json::Error),
    /// Suggestion list has no entries.
    EmptySuggestions,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { key, value } => {
                write!(f, "`{key}` must be a positive integer, got `{value}`")
            }
            Self::Io { path, source } => {
                write!(f, "cannot read `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "invalid suggestion list: {err}"),
            Self::EmptySuggestions => write!(f, "suggestion list must not be empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays disabled when unset.
    pub log_dir: Option<PathBuf>,
    pub suggestions_path: Option<PathBuf>,
    pub pomodoro: PomodoroConfig,
}

impl CoreConfig {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to a value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let defaults = PomodoroConfig::default();
        let pomodoro = PomodoroConfig {
            work_secs: parse_secs(ENV_POMODORO_WORK_SECS, value(ENV_POMODORO_WORK_SECS))?
                .unwrap_or(defaults.work_secs),
            break_secs: parse_secs(ENV_POMODORO_BREAK_SECS, value(ENV_POMODORO_BREAK_SECS))?
                .unwrap_or(defaults.break_secs),
        };

        Ok(Self {
            db_path: value(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: value(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: value(ENV_LOG_DIR).map(PathBuf::from),
            suggestions_path: value(ENV_SUGGESTIONS_PATH).map(PathBuf::from),
            pomodoro,
        })
    }

    /// Loads canned suggestions from `suggestions_path`, or the built-in list.
    pub fn fallback_suggestions(&self) -> Result<Vec<Suggestion>, ConfigError> {
        match self.suggestions_path.as_deref() {
            Some(path) => load_fallback_suggestions(path),
            None => builtin_fallback_suggestions(),
        }
    }
}

/// Returns the built-in canned suggestion list.
pub fn builtin_fallback_suggestions() -> Result<Vec<Suggestion>, ConfigError> {
    parse_suggestions(BUILTIN_SUGGESTIONS)
}

/// Loads a canned suggestion list from a JSON file.
pub fn load_fallback_suggestions(path: &Path) -> Result<Vec<Suggestion>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_suggestions(&raw)
}

fn parse_suggestions(raw: &str) -> Result<Vec<Suggestion>, ConfigError> {
    let suggestions: Vec<Suggestion> = serde_json::from_str(raw)?;
    if suggestions.is_empty() {
        return Err(ConfigError::EmptySuggestions);
    }
    Ok(suggestions)
}

fn parse_secs(key: &'static str, value: Option<String>) -> Result<Option<u32>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.parse::<u32>() {
            Ok(secs) if secs > 0 => Ok(Some(secs)),
            _ => Err(ConfigError::InvalidNumber { key, value: raw }),
        },
    }
}
