//! Text sanitization and keyword categorization shared by all parsers.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::types::EventCategory;

/// Maximum length of any sanitized free-text field, in characters.
pub const MAX_TEXT_LEN: usize = 300;

/// Ordered keyword → category table. First matching rule wins; rules are
/// matched against the lowercased title + description.
const CATEGORY_RULES: &[(&[&str], EventCategory)] = &[
    (
        &["council", "city hall", "public hearing", "commission", "mayor", "ordinance"],
        EventCategory::Government,
    ),
    (
        &["school", "pta", "student", "education", "classroom", "workshop"],
        EventCategory::Education,
    ),
    (
        &["chamber", "business", "networking", "ribbon cutting", "expo", "entrepreneur"],
        EventCategory::Business,
    ),
    (
        &["art", "music", "concert", "theater", "gallery", "exhibit", "film"],
        EventCategory::Arts,
    ),
    (
        &["game", "sports", "tournament", "league", "race", "5k", "softball"],
        EventCategory::Sports,
    ),
    (
        &["health", "clinic", "vaccine", "blood drive", "wellness", "screening"],
        EventCategory::Health,
    ),
];

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Sanitize free text from any wire format: strip markup tags, collapse
/// common HTML entities, collapse whitespace runs, truncate to 300 chars.
pub fn clean_text(raw: &str) -> String {
    let no_tags = tag_re().replace_all(raw, " ");
    let no_entities = no_tags
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    let collapsed = whitespace_re().replace_all(&no_entities, " ");
    collapsed.trim().chars().take(MAX_TEXT_LEN).collect()
}

/// Categorize an event from its title and description via the ordered
/// keyword table. Defaults to Community when nothing matches.
pub fn categorize(title: &str, description: &str) -> EventCategory {
    let haystack = format!("{title} {description}").to_lowercase();
    for (keywords, category) in CATEGORY_RULES {
        if keywords.iter().any(|k| haystack.contains(k)) {
            return *category;
        }
    }
    EventCategory::Community
}

/// Free/paid heuristic: case-insensitive "free" substring.
pub fn is_free_text(text: &str) -> bool {
    text.to_lowercase().contains("free")
}

/// Lowercased, alphanumeric-only slug for domain templates and source ids.
pub fn slugify(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Human-readable time-of-day label, e.g. "7:00 PM".
pub fn time_label(instant: DateTime<Utc>) -> String {
    instant.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn clean_text_strips_tags_and_entities() {
        let raw = "<p>Movie&nbsp;night &amp; potluck</p>\n\n  <b>BYO</b> chairs";
        assert_eq!(clean_text(raw), "Movie night & potluck BYO chairs");
    }

    #[test]
    fn clean_text_truncates_to_300_chars() {
        let raw = "x".repeat(1000);
        assert_eq!(clean_text(&raw).chars().count(), MAX_TEXT_LEN);
    }

    #[test]
    fn clean_text_collapses_whitespace_runs() {
        assert_eq!(clean_text("a \t\n  b"), "a b");
    }

    #[test]
    fn categorize_first_match_wins() {
        // "council" (government) appears before "school" in the table
        assert_eq!(
            categorize("Council hearing on school funding", ""),
            EventCategory::Government,
        );
    }

    #[test]
    fn categorize_matches_description_too() {
        assert_eq!(
            categorize("Spring Fling", "live music and a beer garden"),
            EventCategory::Arts,
        );
    }

    #[test]
    fn categorize_defaults_to_community() {
        assert_eq!(categorize("Neighborhood potluck", ""), EventCategory::Community);
    }

    #[test]
    fn free_heuristic_is_case_insensitive() {
        assert!(is_free_text("FREE admission"));
        assert!(!is_free_text("tickets $10"));
    }

    #[test]
    fn slugify_handles_punctuation_and_case() {
        assert_eq!(slugify("St. Paul"), "stpaul");
        assert_eq!(slugify("Coeur d'Alene"), "coeurdalene");
    }

    #[test]
    fn time_label_formats_12_hour() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 14, 19, 30, 0).unwrap();
        assert_eq!(time_label(dt), "7:30 PM");
        let morning = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        assert_eq!(time_label(morning), "9:00 AM");
    }
}
