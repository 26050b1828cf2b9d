//! Last-resort scraping of an organization's website when no structured
//! feed exists. Heuristic selector cascades; anything it can't read
//! becomes a defaulted field, not an error.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use scraper::{ElementRef, Html, Selector};

use townbeat_common::text::{categorize, clean_text, is_free_text, time_label};
use townbeat_common::{EventRecord, FeedSource, Fetch, Provenance, Result};

use super::MAX_EVENTS_PER_SOURCE;

/// Selector groups tried in order; the first group with at least one match
/// wins and the rest are never consulted.
const SELECTOR_GROUPS: &[&str] = &[
    ".event, .event-item, .calendar-event",
    "[class*=event] li, li[class*=event]",
    "article, .post, .entry",
];

const TITLE_SELECTOR: &str = "h1, h2, h3, h4, .title, .event-title";
const DESCRIPTION_SELECTOR: &str = ".description, .summary, p";
const DATE_SELECTOR: &str = ".date, .event-date, time";

const FALLBACK_TITLE: &str = "Community Event";
const DEFAULT_DURATION_HOURS: i64 = 2;

pub(crate) async fn parse(
    fetch: &dyn Fetch,
    source: &FeedSource,
    url: &str,
) -> Result<Vec<EventRecord>> {
    let doc = fetch.get(url).await?;
    Ok(extract_events(&doc.body, source))
}

pub(crate) fn extract_events(html: &str, source: &FeedSource) -> Vec<EventRecord> {
    let document = Html::parse_document(html);

    for group in SELECTOR_GROUPS {
        let selector = Selector::parse(group).expect("valid selector group");
        let matched: Vec<ElementRef> = document.select(&selector).collect();
        if matched.is_empty() {
            continue;
        }
        return matched
            .iter()
            .filter_map(|el| convert_element(el, source))
            .take(MAX_EVENTS_PER_SOURCE)
            .collect();
    }

    Vec::new()
}

fn convert_element(element: &ElementRef, source: &FeedSource) -> Option<EventRecord> {
    let title = extract_title(element);
    // Single characters and stray glyphs are container noise, not titles.
    if title.chars().count() <= 3 {
        return None;
    }

    let description = first_text(element, DESCRIPTION_SELECTOR)
        .map(|t| clean_text(&t))
        .unwrap_or_else(|| "Community event".to_string());

    let starts_at = extract_date(element).unwrap_or_else(Utc::now);
    let ends_at = starts_at + Duration::hours(DEFAULT_DURATION_HOURS);

    Some(EventRecord {
        category: categorize(&title, &description),
        is_free: is_free_text(&description),
        start_time_label: time_label(starts_at),
        end_time_label: time_label(ends_at),
        title,
        description,
        location: String::new(),
        organizer: source.name.clone(),
        starts_at,
        ends_at,
        expected_attendance: 0,
        image_url: None,
        source_id: source.id.clone(),
        provenance: Provenance::Fetched,
    })
}

/// Heading or title-class text, else the first link's text, else a generic
/// label.
fn extract_title(element: &ElementRef) -> String {
    if let Some(text) = first_text(element, TITLE_SELECTOR) {
        let cleaned = clean_text(&text);
        if !cleaned.is_empty() {
            return cleaned;
        }
    }
    if let Some(text) = first_text(element, "a") {
        let cleaned = clean_text(&text);
        if !cleaned.is_empty() {
            return cleaned;
        }
    }
    FALLBACK_TITLE.to_string()
}

fn first_text(element: &ElementRef, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).expect("valid selector");
    element
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .find(|t| !t.trim().is_empty())
}

/// Best-effort date: a `<time datetime=...>` attribute when present, else
/// the text of the first date-ish element, tried against common formats.
fn extract_date(element: &ElementRef) -> Option<DateTime<Utc>> {
    let selector = Selector::parse(DATE_SELECTOR).expect("valid date selector");
    let date_el = element.select(&selector).next()?;

    if let Some(datetime) = date_el.value().attr("datetime") {
        if let Some(parsed) = parse_date_text(datetime) {
            return Some(parsed);
        }
    }
    parse_date_text(&date_el.text().collect::<String>())
}

fn parse_date_text(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}
