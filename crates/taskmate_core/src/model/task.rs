//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its subtasks.
//! - Define the partial record produced by natural-language parsing.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is never blank for a persisted task.
//! - `tags` are lowercase and unique once normalized by the repository.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Stable identifier for a subtask, unique within the whole store.
pub type SubTaskId = Uuid;

/// Fixed task category set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskCategory {
    Work,
    Personal,
    Health,
    Shopping,
    Education,
    Finance,
    Other,
}

impl TaskCategory {
    /// All categories in display order.
    pub const ALL: [TaskCategory; 7] = [
        TaskCategory::Work,
        TaskCategory::Personal,
        TaskCategory::Health,
        TaskCategory::Shopping,
        TaskCategory::Education,
        TaskCategory::Finance,
        TaskCategory::Other,
    ];

    /// Returns the canonical label, also used as the storage value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Health => "Health",
            Self::Shopping => "Shopping",
            Self::Education => "Education",
            Self::Finance => "Finance",
            Self::Other => "Other",
        }
    }
}

impl Display for TaskCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = String;

    /// Parses a category label case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown task category `{trimmed}`"))
    }
}

/// Task urgency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    /// Returns the canonical lowercase label, also used as the storage value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl Display for TaskPriority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown task priority `{other}`")),
        }
    }
}

/// Checklist item owned by a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: SubTaskId,
    pub title: String,
    pub completed: bool,
}

impl SubTask {
    /// Creates an open subtask with a generated ID.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
        }
    }
}

/// Validation errors for task invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task ID must not be the nil UUID.
    NilId,
    /// Title is empty after trimming.
    BlankTitle,
    /// Subtask title is empty after trimming.
    BlankSubTaskTitle(SubTaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be nil"),
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::BlankSubTaskTitle(id) => write!(f, "subtask title must not be blank: {id}"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Assigned by the owning service at creation time.
    pub id: TaskId,
    pub title: String,
    pub description: String,
    /// `None` means "unspecified", not a failure to parse.
    pub due_date: Option<DateTime<Local>>,
    pub category: TaskCategory,
    pub completed: bool,
    /// Assigned by the owning service at creation time.
    pub created_at: DateTime<Local>,
    pub priority: TaskPriority,
    pub tags: Vec<String>,
    /// Ordered checklist; order is preserved by storage.
    pub subtasks: Vec<SubTask>,
}

impl Task {
    /// Validates task invariants before persistence.
    ///
    /// # Errors
    /// - `NilId` when `id` is nil.
    /// - `BlankTitle` when `title` is blank after trim.
    /// - `BlankSubTaskTitle` for the first blank subtask title.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        if let Some(subtask) = self
            .subtasks
            .iter()
            .find(|subtask| subtask.title.trim().is_empty())
        {
            return Err(TaskValidationError::BlankSubTaskTitle(subtask.id));
        }
        Ok(())
    }

    /// Returns the subtask with the given ID, if present.
    pub fn subtask(&self, subtask_id: SubTaskId) -> Option<&SubTask> {
        self.subtasks.iter().find(|subtask| subtask.id == subtask_id)
    }
}

/// Partial task record: every field except the store-assigned `id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Local>>,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub tags: Vec<String>,
    pub completed: bool,
    pub subtasks: Vec<SubTask>,
}

impl TaskDraft {
    /// Creates a draft with the given title and default classification.
    ///
    /// Defaults match manual task entry: `Personal`, `Medium`, no due date.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date: None,
            category: TaskCategory::Personal,
            priority: TaskPriority::Medium,
            tags: Vec::new(),
            completed: false,
            subtasks: Vec::new(),
        }
    }

    /// Completes the draft with store-assigned identity and creation time.
    pub fn into_task(self, id: TaskId, created_at: DateTime<Local>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            category: self.category,
            completed: self.completed,
            created_at,
            priority: self.priority,
            tags: self.tags,
            subtasks: self.subtasks,
        }
    }
}
