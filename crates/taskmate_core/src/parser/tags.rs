//! Tag extraction: explicit hashtags plus keyword-derived tags.

use once_cell::sync::Lazy;
use regex::Regex;

static HASHTAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([A-Za-z0-9_]+)").expect("valid hashtag regex"));

/// Keyword rules appended after hashtags.
static KEYWORD_TAG_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("call|phone|talk", "call"),
        ("meet|visit|appointment", "meeting"),
        ("email|send", "email"),
        ("deadline|due", "deadline"),
    ]
    .into_iter()
    .map(|(pattern, tag)| {
        (
            Regex::new(&format!("(?i){pattern}")).expect("valid tag keyword regex"),
            tag,
        )
    })
    .collect()
});

/// Extracts lowercase tags from free text.
///
/// Duplicates are removed. Order follows first occurrence but callers must
/// treat the result as a set.
pub fn extract_tags(text: &str) -> Vec<String> {
    let hashtags = HASHTAG_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase());
    let keyword_tags = KEYWORD_TAG_RULES
        .iter()
        .filter(|(pattern, _)| pattern.is_match(text))
        .map(|(_, tag)| (*tag).to_string());

    let mut tags: Vec<String> = Vec::new();
    for tag in hashtags.chain(keyword_tags) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}
