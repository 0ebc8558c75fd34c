//! Core domain logic for TaskMate.
//! This crate is the single source of truth for task invariants.

pub mod analytics;
pub mod assistant;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod parser;
pub mod pomodoro;
pub mod repo;
pub mod service;

pub use analytics::{compute_analytics, DailyCompletion, PriorityBreakdown, TaskAnalytics};
pub use assistant::{
    parse_suggestion_text, FallbackSuggester, Suggestion, SuggestionError, SuggestionProvider,
    UnconfiguredProvider, DEFAULT_TASK_PROMPT,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{
    SubTask, SubTaskId, Task, TaskCategory, TaskDraft, TaskId, TaskPriority, TaskValidationError,
};
pub use parser::{
    extract_date_time, extract_tags, guess_category, guess_priority,
    parse_natural_language_task, suggest_deadline,
};
pub use pomodoro::{PomodoroConfig, PomodoroTimer, TimerEvent, TimerMode};
pub use repo::task_repo::{
    RepoError, RepoResult, SqliteTaskRepository, TaskListQuery, TaskRepository, TaskSort,
};
pub use service::task_service::{TaskFilter, TaskService, TaskServiceError};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
