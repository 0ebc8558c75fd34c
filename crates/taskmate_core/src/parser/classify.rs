//! Keyword classifiers for task category and priority.
//!
//! # Invariants
//! - Rule tables are evaluated in declaration order; the first match wins.
//! - Matching is case-insensitive substring matching, not tokenization:
//!   `"running"` matches `run`, `"know"` matches `now`.
//! - Classification always succeeds; the fallback is `Personal` / `Low`.

use crate::model::task::{TaskCategory, TaskPriority};
use once_cell::sync::Lazy;
use regex::Regex;

/// Category returned when no rule matches.
pub const DEFAULT_CATEGORY: TaskCategory = TaskCategory::Personal;

/// Priority returned when no rule matches.
pub const DEFAULT_PRIORITY: TaskPriority = TaskPriority::Low;

/// Ordered category rules.
pub static CATEGORY_RULES: Lazy<Vec<(Regex, TaskCategory)>> = Lazy::new(|| {
    vec![
        (
            keyword_regex("work|project|meeting|presentation|client|report|email|boss|colleague"),
            TaskCategory::Work,
        ),
        (
            keyword_regex("exercise|gym|workout|run|fitness|health|doctor|medic|pill|drug"),
            TaskCategory::Health,
        ),
        (
            keyword_regex("shop|buy|store|purchase|grocery|supermarket"),
            TaskCategory::Shopping,
        ),
        (
            keyword_regex("study|learn|course|class|read|book|education"),
            TaskCategory::Education,
        ),
        (
            keyword_regex("pay|bill|money|bank|finance|budget|tax"),
            TaskCategory::Finance,
        ),
    ]
});

/// Ordered priority rules.
pub static PRIORITY_RULES: Lazy<Vec<(Regex, TaskPriority)>> = Lazy::new(|| {
    vec![
        (
            keyword_regex("urgent|immediate|asap|critical|emergency|now"),
            TaskPriority::High,
        ),
        (keyword_regex("important|priority|soon"), TaskPriority::Medium),
    ]
});

/// Guesses a task category from free text.
pub fn guess_category(text: &str) -> TaskCategory {
    first_match(&CATEGORY_RULES, text).unwrap_or(DEFAULT_CATEGORY)
}

/// Guesses a task priority from free text.
pub fn guess_priority(text: &str) -> TaskPriority {
    first_match(&PRIORITY_RULES, text).unwrap_or(DEFAULT_PRIORITY)
}

fn first_match<T: Copy>(rules: &[(Regex, T)], text: &str) -> Option<T> {
    rules
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, value)| *value)
}

fn keyword_regex(alternatives: &str) -> Regex {
    Regex::new(&format!("(?i){alternatives}")).expect("valid keyword regex")
}
