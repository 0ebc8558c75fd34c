use clap::{Parser, Subcommand};
use taskmate_core::TaskCategory;
use uuid::Uuid;

/// Local task manager with natural-language entry.
#[derive(Parser, Debug)]
#[command(name = "taskmate", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Overrides `TASKMATE_DB_PATH`.
    #[arg(long, global = true)]
    pub db: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Creates a task from a free-text sentence.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Lists tasks, newest first.
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_parser = parse_category)]
        category: Option<TaskCategory>,
        #[arg(long, default_value_t = false)]
        pending: bool,
    },
    /// Shows one task with its subtasks.
    Show { id: Uuid },
    /// Marks a task completed.
    Done { id: Uuid },
    /// Marks a completed task open again.
    Reopen { id: Uuid },
    /// Deletes a task and its subtasks.
    Delete { id: Uuid },
    /// Manages subtasks.
    Subtask {
        #[command(subcommand)]
        action: SubtaskCommand,
    },
    /// Suggests a due date from similar stored tasks.
    SuggestDeadline {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Suggests a new task to work on.
    Suggest {
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Prints completion statistics.
    Stats,
    /// Prints plain-text share output for a task.
    Share { id: Uuid },
    /// Runs work/break focus cycles in the terminal.
    Focus {
        #[arg(long, default_value_t = 1)]
        cycles: u32,
    },
    /// Checks core linkage.
    Ping,
}

#[derive(Subcommand, Debug)]
pub enum SubtaskCommand {
    Add {
        task_id: Uuid,
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    Toggle { task_id: Uuid, subtask_id: Uuid },
    Delete { task_id: Uuid, subtask_id: Uuid },
}

fn parse_category(raw: &str) -> Result<TaskCategory, String> {
    raw.parse()
}
