//! Completion analytics over a task list.
//!
//! # Responsibility
//! - Aggregate completion, category, and priority statistics for dashboards.
//!
//! # Invariants
//! - Daily buckets cover the last 7 local days, oldest first, ending today.
//! - Tasks carry no completion timestamp; completed tasks are bucketed by
//!   `created_at`.

use crate::clock::Clock;
use crate::model::task::{Task, TaskCategory, TaskPriority};
use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Number of daily buckets reported.
pub const DAILY_WINDOW_DAYS: u64 = 7;

/// Completed-task count for one local day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCompletion {
    pub date: NaiveDate,
    /// Short weekday label, e.g. `Mon`.
    pub label: String,
    pub count: usize,
}

/// Task counts per priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Aggregated statistics for a task list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskAnalytics {
    pub daily_completions: Vec<DailyCompletion>,
    /// Category counts in first-seen order.
    pub category_distribution: Vec<(TaskCategory, usize)>,
    pub priority_distribution: PriorityBreakdown,
    pub completed: usize,
    pub total: usize,
    /// Percentage in `0.0..=100.0`; `0.0` for an empty list.
    pub completion_rate: f64,
}

/// Computes analytics for `tasks` relative to `clock`.
pub fn compute_analytics(tasks: &[Task], clock: &impl Clock) -> TaskAnalytics {
    let today = clock.now().date_naive();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let total = tasks.len();
    let completion_rate = if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    TaskAnalytics {
        daily_completions: daily_completions(tasks, today),
        category_distribution: category_distribution(tasks),
        priority_distribution: priority_distribution(tasks),
        completed,
        total,
        completion_rate,
    }
}

fn daily_completions(tasks: &[Task], today: NaiveDate) -> Vec<DailyCompletion> {
    (0..DAILY_WINDOW_DAYS)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| DailyCompletion {
            date,
            label: date.format("%a").to_string(),
            count: tasks
                .iter()
                .filter(|task| task.completed && task.created_at.date_naive() == date)
                .count(),
        })
        .collect()
}

fn category_distribution(tasks: &[Task]) -> Vec<(TaskCategory, usize)> {
    let mut counts: Vec<(TaskCategory, usize)> = Vec::new();
    for task in tasks {
        match counts
            .iter_mut()
            .find(|(category, _)| *category == task.category)
        {
            Some((_, count)) => *count += 1,
            None => counts.push((task.category, 1)),
        }
    }
    counts
}

fn priority_distribution(tasks: &[Task]) -> PriorityBreakdown {
    tasks
        .iter()
        .fold(PriorityBreakdown::default(), |mut breakdown, task| {
            match task.priority {
                TaskPriority::High => breakdown.high += 1,
                TaskPriority::Medium => breakdown.medium += 1,
                TaskPriority::Low => breakdown.low += 1,
            }
            breakdown
        })
}
