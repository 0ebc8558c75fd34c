//! Task use-case service.
//!
//! # Responsibility
//! - Assign store-owned fields (`id`, `created_at`) to drafts.
//! - Provide task, subtask, search, sharing, and analytics use-cases.
//! - Bridge natural-language parsing and deadline suggestion to storage.
//!
//! # Invariants
//! - Every write returns the record as read back from storage.
//! - Service APIs never bypass repository validation.
//! - All "now" reads go through the injected clock.

use crate::analytics::{compute_analytics, TaskAnalytics};
use crate::clock::Clock;
use crate::model::task::{SubTask, SubTaskId, Task, TaskCategory, TaskDraft, TaskId};
use crate::parser::{parse_natural_language_task, suggest_deadline};
use crate::repo::task_repo::{RepoError, TaskListQuery, TaskRepository};
use chrono::{DateTime, Local};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Title input is blank after trim.
    InvalidTitle,
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Target subtask does not exist on the task.
    SubTaskNotFound {
        task_id: TaskId,
        subtask_id: SubTaskId,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but read-back disagrees.
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "title must not be blank"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::SubTaskNotFound {
                task_id,
                subtask_id,
            } => write!(f, "subtask {subtask_id} not found on task {task_id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, TaskServiceError>;

/// Search text plus category selection, `None` meaning all categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub search: String,
    pub category: Option<TaskCategory>,
    /// Hide completed tasks when set.
    pub pending_only: bool,
}

/// Task service facade over a repository and a clock.
pub struct TaskService<R: TaskRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: TaskRepository, C: Clock> TaskService<R, C> {
    /// Creates a service using the provided repository and clock.
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Persists a draft, assigning a fresh ID and the current time.
    pub fn add_task(&mut self, draft: TaskDraft) -> ServiceResult<Task> {
        if draft.title.trim().is_empty() {
            return Err(TaskServiceError::InvalidTitle);
        }
        let task = draft.into_task(Uuid::new_v4(), self.clock.now());
        let id = self.repo.create_task(&task)?;
        info!(
            "event=task_create module=service status=ok task_id={} category={} priority={}",
            id, task.category, task.priority
        );
        self.read_back(id, "created task not found in read-back")
    }

    /// Parses free text and persists the resulting draft.
    ///
    /// Blank input is rejected; otherwise `text` is parsed exactly as given.
    pub fn create_from_text(&mut self, text: &str) -> ServiceResult<Task> {
        if text.trim().is_empty() {
            return Err(TaskServiceError::InvalidTitle);
        }
        let draft = parse_natural_language_task(text, &self.clock);
        self.add_task(draft)
    }

    /// Replaces an existing task. `created_at` is kept as stored.
    pub fn update_task(&mut self, task: &Task) -> ServiceResult<Task> {
        if task.title.trim().is_empty() {
            return Err(TaskServiceError::InvalidTitle);
        }
        self.repo.update_task(task)?;
        info!(
            "event=task_update module=service status=ok task_id={}",
            task.id
        );
        self.read_back(task.id, "updated task not found in read-back")
    }

    /// Deletes a task and its subtasks.
    pub fn delete_task(&mut self, id: TaskId) -> ServiceResult<()> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    /// Gets one task by ID.
    pub fn get_task(&self, id: TaskId) -> ServiceResult<Option<Task>> {
        Ok(self.repo.get_task(id)?)
    }

    /// Flips the completion flag of a task.
    pub fn toggle_task_completion(&mut self, id: TaskId) -> ServiceResult<Task> {
        self.modify(id, |task| {
            task.completed = !task.completed;
            Ok(())
        })
    }

    /// Sets the completion flag of a task; repeating the call is a no-op.
    pub fn set_task_completed(&mut self, id: TaskId, completed: bool) -> ServiceResult<Task> {
        self.modify(id, |task| {
            task.completed = completed;
            Ok(())
        })
    }

    /// Lists tasks matching the filter, newest first.
    pub fn list_tasks(&self, filter: &TaskFilter) -> ServiceResult<Vec<Task>> {
        let query = TaskListQuery {
            search: Some(filter.search.clone()).filter(|text| !text.is_empty()),
            category: filter.category,
            completed: filter.pending_only.then_some(false),
            ..TaskListQuery::default()
        };
        Ok(self.repo.list_tasks(&query)?)
    }

    /// Lists tasks with full repository query control.
    pub fn query_tasks(&self, query: &TaskListQuery) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.list_tasks(query)?)
    }

    /// Lists tag names in use.
    pub fn list_tags(&self) -> ServiceResult<Vec<String>> {
        Ok(self.repo.list_tags()?)
    }

    /// Appends an open subtask.
    pub fn add_subtask(&mut self, task_id: TaskId, title: &str) -> ServiceResult<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskServiceError::InvalidTitle);
        }
        self.modify(task_id, |task| {
            task.subtasks.push(SubTask::new(title));
            Ok(())
        })
    }

    /// Replaces a subtask with the same ID.
    pub fn update_subtask(&mut self, task_id: TaskId, subtask: SubTask) -> ServiceResult<Task> {
        if subtask.title.trim().is_empty() {
            return Err(TaskServiceError::InvalidTitle);
        }
        self.modify(task_id, |task| {
            let slot = find_subtask_mut(task, subtask.id)?;
            *slot = subtask;
            Ok(())
        })
    }

    /// Removes a subtask.
    pub fn delete_subtask(&mut self, task_id: TaskId, subtask_id: SubTaskId) -> ServiceResult<Task> {
        self.modify(task_id, |task| {
            let before = task.subtasks.len();
            task.subtasks.retain(|subtask| subtask.id != subtask_id);
            if task.subtasks.len() == before {
                return Err(TaskServiceError::SubTaskNotFound {
                    task_id,
                    subtask_id,
                });
            }
            Ok(())
        })
    }

    /// Flips the completion flag of a subtask.
    pub fn toggle_subtask_completion(
        &mut self,
        task_id: TaskId,
        subtask_id: SubTaskId,
    ) -> ServiceResult<Task> {
        self.modify(task_id, |task| {
            let subtask = find_subtask_mut(task, subtask_id)?;
            subtask.completed = !subtask.completed;
            Ok(())
        })
    }

    /// Suggests a due date using every stored task as history.
    pub fn suggest_deadline(&self, title: &str, description: &str) -> ServiceResult<DateTime<Local>> {
        let history = self.repo.list_tasks(&TaskListQuery::default())?;
        Ok(suggest_deadline(title, description, &history, &self.clock))
    }

    /// Renders a plain-text summary for sharing.
    pub fn share_text(&self, id: TaskId) -> ServiceResult<String> {
        let task = self
            .repo
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        Ok(format_share_text(&task))
    }

    /// Computes analytics over all stored tasks.
    pub fn analytics(&self) -> ServiceResult<TaskAnalytics> {
        let tasks = self.repo.list_tasks(&TaskListQuery::default())?;
        Ok(compute_analytics(&tasks, &self.clock))
    }

    fn modify(
        &mut self,
        id: TaskId,
        change: impl FnOnce(&mut Task) -> ServiceResult<()>,
    ) -> ServiceResult<Task> {
        let mut task = self
            .repo
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        change(&mut task)?;
        self.repo.update_task(&task)?;
        self.read_back(id, "modified task not found in read-back")
    }

    fn read_back(&self, id: TaskId, details: &'static str) -> ServiceResult<Task> {
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::InconsistentState(details))
    }
}

/// Formats `Task/Due/Description` lines for sharing.
pub fn format_share_text(task: &Task) -> String {
    let due = task
        .due_date
        .map(|due| due.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "No due date".to_string());
    format!(
        "Task: {}\nDue: {}\nDescription: {}",
        task.title, due, task.description
    )
}

fn find_subtask_mut(task: &mut Task, subtask_id: SubTaskId) -> ServiceResult<&mut SubTask> {
    let task_id = task.id;
    task.subtasks
        .iter_mut()
        .find(|subtask| subtask.id == subtask_id)
        .ok_or(TaskServiceError::SubTaskNotFound {
            task_id,
            subtask_id,
        })
}
