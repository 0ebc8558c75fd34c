//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist tasks with their ordered subtasks and tag links.
//! - Provide filtered, sorted, paginated task listing.
//!
//! # Invariants
//! - Create/update write the task row, subtasks, and tags in one transaction.
//! - Updates never touch `created_at`.
//! - Tag names are normalized to trimmed lowercase and deduplicated.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::task::{
    SubTask, Task, TaskCategory, TaskId, TaskPriority, TaskValidationError,
};
use chrono::{DateTime, Local, TimeZone};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    due_date,
    category,
    priority,
    completed,
    created_at
FROM tasks";

const REQUIRED_TABLES: [&str; 4] = ["tasks", "subtasks", "tags", "task_tags"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
    /// Connection was not migrated before use.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Sort order for task listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskSort {
    /// Newest first.
    #[default]
    CreatedAtDesc,
    CreatedAtAsc,
    /// Earliest due date first; undated tasks last.
    DueDateAsc,
}

impl TaskSort {
    fn order_by(self) -> &'static str {
        match self {
            Self::CreatedAtDesc => " ORDER BY created_at DESC, id ASC",
            Self::CreatedAtAsc => " ORDER BY created_at ASC, id ASC",
            Self::DueDateAsc => " ORDER BY due_date IS NULL, due_date ASC, created_at DESC, id ASC",
        }
    }
}

/// Query options for listing tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    /// Substring matched against title, description, or tags after Unicode
    /// lowercasing both sides.
    pub search: Option<String>,
    pub category: Option<TaskCategory>,
    pub priority: Option<TaskPriority>,
    pub completed: Option<bool>,
    pub sort: TaskSort,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    fn create_task(&mut self, task: &Task) -> RepoResult<TaskId>;
    /// Replaces scalar fields, subtasks, and tags of an existing task.
    fn update_task(&mut self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    /// Hard-deletes a task; subtasks and tag links cascade.
    fn delete_task(&mut self, id: TaskId) -> RepoResult<()>;
    /// Returns tag names attached to at least one task, sorted.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when the schema has not been applied.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in REQUIRED_TABLES {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&mut self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO tasks (
                id,
                title,
                description,
                due_date,
                category,
                priority,
                completed,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.description.as_str(),
                task.due_date.map(|due| due.timestamp_millis()),
                task.category.as_str(),
                task.priority.as_str(),
                bool_to_int(task.completed),
                task.created_at.timestamp_millis(),
            ],
        )?;
        let id_text = task.id.to_string();
        write_subtasks(&tx, &id_text, &task.subtasks)?;
        write_tags(&tx, &id_text, &task.tags)?;
        tx.commit()?;

        debug!(
            "event=task_insert module=repo status=ok subtasks={} tags={}",
            task.subtasks.len(),
            task.tags.len()
        );
        Ok(task.id)
    }

    fn update_task(&mut self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let id_text = task.id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                due_date = ?3,
                category = ?4,
                priority = ?5,
                completed = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?7;",
            params![
                task.title.as_str(),
                task.description.as_str(),
                task.due_date.map(|due| due.timestamp_millis()),
                task.category.as_str(),
                task.priority.as_str(),
                bool_to_int(task.completed),
                id_text.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }

        tx.execute("DELETE FROM subtasks WHERE task_id = ?1;", [id_text.as_str()])?;
        tx.execute("DELETE FROM task_tags WHERE task_id = ?1;", [id_text.as_str()])?;
        write_subtasks(&tx, &id_text, &task.subtasks)?;
        write_tags(&tx, &id_text, &task.tags)?;
        tx.commit()?;
        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(load_task(self.conn, row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(search) = query.search.as_deref().filter(|text| !text.is_empty()) {
            let pattern = like_pattern(&search.to_lowercase());
            sql.push_str(
                " AND (
                    fold_case(title) LIKE ? ESCAPE '\\'
                    OR fold_case(description) LIKE ? ESCAPE '\\'
                    OR EXISTS (
                        SELECT 1
                        FROM task_tags tt
                        INNER JOIN tags t ON t.id = tt.tag_id
                        WHERE tt.task_id = tasks.id
                          AND fold_case(t.name) LIKE ? ESCAPE '\\'
                    )
                )",
            );
            for _ in 0..3 {
                bind_values.push(Value::Text(pattern.clone()));
            }
        }

        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }

        if let Some(priority) = query.priority {
            sql.push_str(" AND priority = ?");
            bind_values.push(Value::Text(priority.as_str().to_string()));
        }

        if let Some(completed) = query.completed {
            sql.push_str(" AND completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }

        sql.push_str(query.sort.order_by());

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(load_task(self.conn, row)?);
        }
        Ok(tasks)
    }

    fn delete_task(&mut self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT t.name
             FROM tags t
             INNER JOIN task_tags tt ON tt.tag_id = t.id
             ORDER BY t.name COLLATE NOCASE ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            tags.push(name.to_lowercase());
        }
        Ok(tags)
    }
}

/// Normalizes one tag value: trimmed, lowercase, `None` when blank.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates tag values, sorted by name.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .filter_map(|tag| normalize_tag(tag))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn write_subtasks(conn: &Connection, task_id: &str, subtasks: &[SubTask]) -> RepoResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO subtasks (id, task_id, title, completed, position)
         VALUES (?1, ?2, ?3, ?4, ?5);",
    )?;
    for (position, subtask) in subtasks.iter().enumerate() {
        stmt.execute(params![
            subtask.id.to_string(),
            task_id,
            subtask.title.as_str(),
            bool_to_int(subtask.completed),
            position as i64,
        ])?;
    }
    Ok(())
}

fn write_tags(conn: &Connection, task_id: &str, tags: &[String]) -> RepoResult<()> {
    for tag in normalize_tags(tags) {
        conn.execute(
            "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
            [tag.as_str()],
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO task_tags (task_id, tag_id)
             SELECT ?1, id
             FROM tags
             WHERE name = ?2 COLLATE NOCASE;",
            params![task_id, tag.as_str()],
        )?;
    }
    Ok(())
}

fn load_task(conn: &Connection, row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in tasks.id"))
    })?;

    let category_text: String = row.get("category")?;
    let category = category_text
        .parse::<TaskCategory>()
        .map_err(RepoError::InvalidData)?;

    let priority_text: String = row.get("priority")?;
    let priority = priority_text
        .parse::<TaskPriority>()
        .map_err(RepoError::InvalidData)?;

    let due_date = match row.get::<_, Option<i64>>("due_date")? {
        Some(millis) => Some(millis_to_local(millis, "tasks.due_date")?),
        None => None,
    };

    let task = Task {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        due_date,
        category,
        completed: int_to_bool(row.get("completed")?, "tasks.completed")?,
        created_at: millis_to_local(row.get("created_at")?, "tasks.created_at")?,
        priority,
        tags: load_tags_for_task(conn, &id_text)?,
        subtasks: load_subtasks_for_task(conn, &id_text)?,
    };
    task.validate()?;
    Ok(task)
}

fn load_subtasks_for_task(conn: &Connection, task_id: &str) -> RepoResult<Vec<SubTask>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, completed
         FROM subtasks
         WHERE task_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([task_id])?;
    let mut subtasks = Vec::new();
    while let Some(row) = rows.next()? {
        let id_text: String = row.get("id")?;
        let id = Uuid::parse_str(&id_text).map_err(|_| {
            RepoError::InvalidData(format!("invalid uuid value `{id_text}` in subtasks.id"))
        })?;
        subtasks.push(SubTask {
            id,
            title: row.get("title")?,
            completed: int_to_bool(row.get("completed")?, "subtasks.completed")?,
        });
    }
    Ok(subtasks)
}

fn load_tags_for_task(conn: &Connection, task_id: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM task_tags tt
         INNER JOIN tags t ON t.id = tt.tag_id
         WHERE tt.task_id = ?1
         ORDER BY t.name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([task_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let name: String = row.get(0)?;
        tags.push(name.to_lowercase());
    }
    Ok(tags)
}

fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn millis_to_local(millis: i64, column: &str) -> RepoResult<DateTime<Local>> {
    Local.timestamp_millis_opt(millis).single().ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{millis}` in {column}"))
    })
}

fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
