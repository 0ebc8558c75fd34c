//! Task suggestion assistant.
//!
//! # Responsibility
//! - Define the port for a remote text generator (`SuggestionProvider`).
//! - Shape generator output into a title/description `Suggestion`.
//! - Degrade to canned suggestions on any provider failure.
//!
//! # Invariants
//! - `FallbackSuggester::suggest` never fails.
//! - The canned list is configuration data and is never empty.

use log::{info, warn};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Prompt used by the "generate a task" action.
pub const DEFAULT_TASK_PROMPT: &str = "Generate a practical and specific task for a to-do list. Include a clear title and a brief description. Make it realistic and actionable.";

static TITLE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(Title:|Task:)?\s*").expect("valid title prefix regex"));
static DESCRIPTION_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(Description:)?\s*").expect("valid description prefix regex")
});

/// Title/description pair proposed for a new task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
}

/// Errors reported by a suggestion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionError {
    /// Transport-level failure reaching the generator.
    Unavailable(String),
    /// Generator answered with a non-success status.
    Rejected { status: u16 },
    /// Generator answered without usable text.
    MalformedResponse(String),
}

impl Display for SuggestionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "suggestion provider unavailable: {message}"),
            Self::Rejected { status } => {
                write!(f, "suggestion provider rejected request with status {status}")
            }
            Self::MalformedResponse(message) => {
                write!(f, "malformed suggestion response: {message}")
            }
        }
    }
}

impl Error for SuggestionError {}

/// Remote text generator returning `"title\ndescription"` shaped text.
pub trait SuggestionProvider {
    fn generate(&self, prompt: &str) -> Result<String, SuggestionError>;
}

/// Provider used when no remote generator is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredProvider;

impl SuggestionProvider for UnconfiguredProvider {
    fn generate(&self, _prompt: &str) -> Result<String, SuggestionError> {
        Err(SuggestionError::Unavailable(
            "no suggestion provider configured".to_string(),
        ))
    }
}

/// Parses generator output into a suggestion.
///
/// Blank lines are ignored. The first line is the title (optional `Title:` or
/// `Task:` prefix removed); remaining lines form the description (optional
/// `Description:` prefix removed). Returns `None` when no line has content.
pub fn parse_suggestion_text(text: &str) -> Option<Suggestion> {
    let lines = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>();
    let (first, rest) = lines.split_first()?;

    let title = TITLE_PREFIX_RE.replace(first, "").trim().to_string();
    if title.is_empty() {
        return None;
    }
    let description = DESCRIPTION_PREFIX_RE
        .replace(&rest.join("\n"), "")
        .trim()
        .to_string();

    Some(Suggestion { title, description })
}

/// Wraps a provider and substitutes canned suggestions on failure.
pub struct FallbackSuggester<P: SuggestionProvider> {
    provider: P,
    fallbacks: Vec<Suggestion>,
}

impl<P: SuggestionProvider> FallbackSuggester<P> {
    /// Creates a suggester. Returns `None` when `fallbacks` is empty.
    pub fn new(provider: P, fallbacks: Vec<Suggestion>) -> Option<Self> {
        if fallbacks.is_empty() {
            return None;
        }
        Some(Self {
            provider,
            fallbacks,
        })
    }

    /// Returns the configured canned suggestions.
    pub fn fallbacks(&self) -> &[Suggestion] {
        &self.fallbacks
    }

    /// Asks the provider for a suggestion, falling back to a random canned one.
    pub fn suggest(&self, prompt: &str) -> Suggestion {
        self.suggest_with_rng(prompt, &mut rand::thread_rng())
    }

    /// Same as [`Self::suggest`] with a caller-provided RNG.
    pub fn suggest_with_rng<G: Rng + ?Sized>(&self, prompt: &str, rng: &mut G) -> Suggestion {
        let outcome = self.provider.generate(prompt).and_then(|text| {
            parse_suggestion_text(&text).ok_or_else(|| {
                SuggestionError::MalformedResponse("response has no text lines".to_string())
            })
        });

        match outcome {
            Ok(suggestion) => {
                info!("event=suggestion module=assistant status=ok source=provider");
                suggestion
            }
            Err(err) => {
                warn!(
                    "event=suggestion module=assistant status=fallback error={}",
                    err
                );
                self.pick_fallback(rng)
            }
        }
    }

    fn pick_fallback<G: Rng + ?Sized>(&self, rng: &mut G) -> Suggestion {
        // `new` guarantees a non-empty list.
        self.fallbacks
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| self.fallbacks[0].clone())
    }
}
