//! Deadline suggestion from task history.
//!
//! # Responsibility
//! - Estimate a due date for a candidate task from similar past tasks.
//! - Fall back to a fixed per-category offset when nothing is similar.
//!
//! # Invariants
//! - Always returns a date; there is no "no suggestion" outcome.
//! - Similarity is category equality plus a case-insensitive substring
//!   relation on title or description, in either direction.

use crate::clock::Clock;
use crate::model::task::{Task, TaskCategory};
use crate::parser::classify::guess_category;
use chrono::{DateTime, Days, Duration, Local};
use log::debug;

/// Interval assumed for a similar task that has no due date.
pub const UNDATED_TASK_DAYS: i64 = 2;

/// Bound applied to each historical interval, in either direction.
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Returns the default lead time for a category when no history matches.
pub fn default_offset_days(category: TaskCategory) -> i64 {
    match category {
        TaskCategory::Work => 2,
        TaskCategory::Health => 1,
        TaskCategory::Shopping => 3,
        TaskCategory::Education => 5,
        TaskCategory::Finance => 2,
        TaskCategory::Personal | TaskCategory::Other => 3,
    }
}

/// Suggests a due date for a candidate task.
///
/// The mean creation-to-due interval of similar tasks is used when any
/// exist; otherwise [`default_offset_days`] for the candidate's category.
/// Days are calendar days: the local time of day is kept across DST changes.
pub fn suggest_deadline(
    title: &str,
    description: &str,
    history: &[Task],
    clock: &impl Clock,
) -> DateTime<Local> {
    let now = clock.now();
    let category = guess_category(&format!("{title} {description}"));
    let similar = similar_tasks(title, description, category, history);

    let days = if similar.is_empty() {
        default_offset_days(category)
    } else {
        let total: i64 = similar.iter().map(|task| interval_days(task)).sum();
        round_half_up(total as f64 / similar.len() as f64)
    };

    debug!(
        "event=deadline_suggest module=parser status=ok category={} similar={} days={}",
        category,
        similar.len(),
        days
    );
    shift_days(now, days)
        .or_else(|| shift_days(now, default_offset_days(category)))
        .unwrap_or(now)
}

/// Returns history entries considered similar to the candidate.
pub fn similar_tasks<'a>(
    title: &str,
    description: &str,
    category: TaskCategory,
    history: &'a [Task],
) -> Vec<&'a Task> {
    let title = title.to_lowercase();
    let description = description.to_lowercase();
    history
        .iter()
        .filter(|task| task.category == category)
        .filter(|task| {
            let other_title = task.title.to_lowercase();
            let other_description = task.description.to_lowercase();
            other_title.contains(&title)
                || title.contains(&other_title)
                || other_description.contains(&description)
                || description.contains(&other_description)
        })
        .collect()
}

fn interval_days(task: &Task) -> i64 {
    match task.due_date {
        Some(due) => {
            let millis = (due - task.created_at).num_milliseconds();
            round_half_up(millis as f64 / MILLIS_PER_DAY)
                .clamp(-MAX_INTERVAL_DAYS, MAX_INTERVAL_DAYS)
        }
        None => UNDATED_TASK_DAYS,
    }
}

/// Moves `from` by whole calendar days, keeping the local wall-clock time.
///
/// Falls back to 24-hour steps when that wall time does not exist on the
/// target day. Returns `None` outside the representable range.
fn shift_days(from: DateTime<Local>, days: i64) -> Option<DateTime<Local>> {
    let step = Days::new(days.unsigned_abs());
    let calendar = if days >= 0 {
        from.checked_add_days(step)
    } else {
        from.checked_sub_days(step)
    };
    calendar.or_else(|| from.checked_add_signed(Duration::try_days(days)?))
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
