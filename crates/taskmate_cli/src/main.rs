//! Command-line front end over `taskmate_core`.
//!
//! # Responsibility
//! - Resolve configuration, start logging, and open the task database.
//! - Map subcommands onto `TaskService` use-cases and print results.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Args, Commands, SubtaskCommand};
use log::info;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use taskmate_core::db::open_db;
use taskmate_core::{
    init_logging, CoreConfig, FallbackSuggester, PomodoroTimer, SqliteTaskRepository,
    SystemClock, Task, TaskAnalytics, TaskFilter, TaskService, TimerEvent, TimerMode,
    UnconfiguredProvider, DEFAULT_TASK_PROMPT,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = CoreConfig::from_env().context("invalid configuration")?;
    if let Some(db) = args.db {
        config.db_path = PathBuf::from(db);
    }
    if let Some(log_dir) = config.log_dir.as_deref() {
        let log_dir = log_dir
            .to_str()
            .context("log directory must be valid UTF-8")?;
        init_logging(&config.log_level, log_dir)?;
    }

    match args.command {
        Commands::Ping => {
            println!("taskmate_core ping={}", taskmate_core::ping());
            println!("taskmate_core version={}", taskmate_core::core_version());
            Ok(())
        }
        Commands::Suggest { prompt } => suggest(&config, prompt.as_deref()),
        Commands::Focus { cycles } => focus(&config, cycles),
        Commands::Add { text } => with_service(&config, |service| {
            let task = service.create_from_text(&text.join(" "))?;
            print_task(&task);
            Ok(())
        }),
        Commands::List {
            search,
            category,
            pending,
        } => with_service(&config, |service| {
            let filter = TaskFilter {
                search: search.unwrap_or_default(),
                category,
                pending_only: pending,
            };
            let tasks = service.list_tasks(&filter)?;
            if tasks.is_empty() {
                println!("no tasks");
            }
            tasks.iter().for_each(print_summary);
            Ok(())
        }),
        Commands::Show { id } => with_service(&config, |service| match service.get_task(id)? {
            Some(task) => {
                print_task(&task);
                Ok(())
            }
            None => bail!("task not found: {id}"),
        }),
        Commands::Done { id } => with_service(&config, |service| {
            print_summary(&service.set_task_completed(id, true)?);
            Ok(())
        }),
        Commands::Reopen { id } => with_service(&config, |service| {
            print_summary(&service.set_task_completed(id, false)?);
            Ok(())
        }),
        Commands::Delete { id } => with_service(&config, |service| {
            service.delete_task(id)?;
            println!("deleted {id}");
            Ok(())
        }),
        Commands::Subtask { action } => with_service(&config, |service| {
            let task = match action {
                SubtaskCommand::Add { task_id, title } => {
                    service.add_subtask(task_id, &title.join(" "))?
                }
                SubtaskCommand::Toggle {
                    task_id,
                    subtask_id,
                } => service.toggle_subtask_completion(task_id, subtask_id)?,
                SubtaskCommand::Delete {
                    task_id,
                    subtask_id,
                } => service.delete_subtask(task_id, subtask_id)?,
            };
            print_task(&task);
            Ok(())
        }),
        Commands::SuggestDeadline { title, description } => with_service(&config, |service| {
            let due = service.suggest_deadline(&title, &description)?;
            println!("{}", due.format("%Y-%m-%d %H:%M"));
            Ok(())
        }),
        Commands::Stats => with_service(&config, |service| {
            print_stats(&service.analytics()?);
            Ok(())
        }),
        Commands::Share { id } => with_service(&config, |service| {
            println!("{}", service.share_text(id)?);
            Ok(())
        }),
    }
}

fn with_service(
    config: &CoreConfig,
    action: impl FnOnce(&mut TaskService<SqliteTaskRepository<'_>, SystemClock>) -> Result<()>,
) -> Result<()> {
    let mut conn = open_db(&config.db_path)
        .with_context(|| format!("cannot open `{}`", config.db_path.display()))?;
    let repo = SqliteTaskRepository::try_new(&mut conn)?;
    let mut service = TaskService::new(repo, SystemClock);
    action(&mut service)
}

fn print_stats(stats: &TaskAnalytics) {
    println!(
        "completed {}/{} ({:.0}%)",
        stats.completed, stats.total, stats.completion_rate
    );
    println!("last 7 days:");
    for day in &stats.daily_completions {
        println!("  {} {} {}", day.label, day.date, day.count);
    }
    println!("categories:");
    for (category, count) in &stats.category_distribution {
        println!("  {category} {count}");
    }
    let priorities = &stats.priority_distribution;
    println!(
        "priorities: high={} medium={} low={}",
        priorities.high, priorities.medium, priorities.low
    );
}

fn suggest(config: &CoreConfig, prompt: Option<&str>) -> Result<()> {
    let fallbacks = config.fallback_suggestions()?;
    let suggester = FallbackSuggester::new(UnconfiguredProvider, fallbacks)
        .context("suggestion list is empty")?;
    let suggestion = suggester.suggest(prompt.unwrap_or(DEFAULT_TASK_PROMPT));
    println!("{}", suggestion.title);
    if !suggestion.description.is_empty() {
        println!("{}", suggestion.description);
    }
    Ok(())
}

fn focus(config: &CoreConfig, cycles: u32) -> Result<()> {
    let mut timer = PomodoroTimer::new(config.pomodoro);
    timer.toggle();
    info!("event=focus_start module=cli status=ok cycles={cycles}");

    let mut stdout = std::io::stdout();
    while timer.completed_cycles() < cycles {
        write!(stdout, "\r{:?} {}", timer.mode(), timer.format_remaining())?;
        stdout.flush()?;
        std::thread::sleep(Duration::from_secs(1));
        if let Some(TimerEvent::PhaseCompleted { finished, next }) = timer.tick() {
            let message = match finished {
                TimerMode::Work => "work session complete, take a break",
                TimerMode::Break => "break over, back to work",
            };
            writeln!(stdout, "\r{message} (next: {next:?})")?;
        }
    }
    Ok(())
}

fn print_summary(task: &Task) {
    let mark = if task.completed { "x" } else { " " };
    let due = task
        .due_date
        .map(|due| format!(" due {}", due.format("%Y-%m-%d %H:%M")))
        .unwrap_or_default();
    println!(
        "[{mark}] {} {} ({}, {}){due}",
        task.id, task.title, task.category, task.priority
    );
}

fn print_task(task: &Task) {
    print_summary(task);
    if !task.description.is_empty() {
        println!("    {}", task.description);
    }
    if !task.tags.is_empty() {
        println!("    tags: {}", task.tags.join(", "));
    }
    for subtask in &task.subtasks {
        let mark = if subtask.completed { "x" } else { " " };
        println!("    - [{mark}] {} {}", subtask.id, subtask.title);
    }
}
