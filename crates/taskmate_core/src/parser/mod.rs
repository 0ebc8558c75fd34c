//! Natural-language task parsing.
//!
//! # Responsibility
//! - Turn free text into a partial task record (`TaskDraft`).
//! - Suggest due dates from task history.
//!
//! # Invariants
//! - Parsing is total: unrecognized input yields defaults, never an error.
//! - The parser never assigns `id`, `created_at`, or `completed = true`.
//! - Every time-relative result is computed from the injected `Clock`.

pub mod classify;
pub mod datetime;
pub mod deadline;
pub mod tags;

use crate::clock::Clock;
use crate::model::task::TaskDraft;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

pub use classify::{guess_category, guess_priority};
pub use datetime::extract_date_time;
pub use deadline::suggest_deadline;
pub use tags::extract_tags;

static CLAUSE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[.!?]|\band\b|\bthen\b").expect("valid clause regex"));

/// Parses free text into a partial task record.
///
/// The description is provenance metadata (`Created from: "<text>"`), not a
/// summary; feeding it back through the parser does not reproduce `text`.
pub fn parse_natural_language_task(text: &str, clock: &impl Clock) -> TaskDraft {
    let draft = TaskDraft {
        title: derive_title(text),
        description: provenance_description(text),
        due_date: extract_date_time(text, clock),
        category: guess_category(text),
        priority: guess_priority(text),
        tags: extract_tags(text),
        completed: false,
        subtasks: Vec::new(),
    };

    debug!(
        "event=nl_parse module=parser status=ok input_len={} category={} priority={} tags={} has_due={}",
        text.chars().count(),
        draft.category,
        draft.priority,
        draft.tags.len(),
        draft.due_date.is_some()
    );
    draft
}

/// Derives a title from the first sentence or clause of `text`.
///
/// Falls back to the whole input when the first clause is empty or not
/// shorter than the input.
pub fn derive_title(text: &str) -> String {
    let first_clause = CLAUSE_SPLIT_RE
        .split(text)
        .next()
        .unwrap_or_default()
        .trim();
    if !first_clause.is_empty() && first_clause.chars().count() < text.chars().count() {
        first_clause.to_string()
    } else {
        text.to_string()
    }
}

/// Builds the fixed provenance description for parsed tasks.
pub fn provenance_description(text: &str) -> String {
    format!("Created from: \"{text}\"")
}
