//! JSON event API decoding. No fixed schema: the event list hides under a
//! few conventional top-level keys and field names vary per vendor, so
//! every field goes through an alias list.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use townbeat_common::text::{categorize, clean_text, is_free_text, time_label};
use townbeat_common::{EventRecord, FeedError, FeedSource, Fetch, Provenance, Result};

use super::MAX_EVENTS_PER_SOURCE;

const EVENT_LIST_KEYS: &[&str] = &["events", "items", "data"];

const START_KEYS: &[&str] = &["start", "start_date", "start_time", "date", "datetime"];
const END_KEYS: &[&str] = &["end", "end_date", "end_time"];
const TITLE_KEYS: &[&str] = &["title", "name", "summary"];
const DESCRIPTION_KEYS: &[&str] = &["description", "details", "summary"];
const LOCATION_KEYS: &[&str] = &["location", "venue", "address"];
const ORGANIZER_KEYS: &[&str] = &["organizer", "host", "sponsor"];
const ATTENDANCE_KEYS: &[&str] = &["attendee_count", "attendees", "expected_attendance"];
const IMAGE_KEYS: &[&str] = &["image", "image_url", "photo"];
const FREE_KEYS: &[&str] = &["is_free", "free"];
const PRICE_KEYS: &[&str] = &["price", "cost"];

const DEFAULT_DURATION_HOURS: i64 = 2;

pub(crate) async fn parse(
    fetch: &dyn Fetch,
    source: &FeedSource,
    url: &str,
) -> Result<Vec<EventRecord>> {
    let doc = fetch.get(url).await?;
    parse_body(&doc.body, source)
}

pub(crate) fn parse_body(body: &str, source: &FeedSource) -> Result<Vec<EventRecord>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| FeedError::Parse(format!("invalid JSON payload: {e}")))?;

    let items: &[Value] = match &value {
        Value::Array(items) => items,
        Value::Object(map) => EVENT_LIST_KEYS
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_array))
            .map(Vec::as_slice)
            .ok_or_else(|| {
                FeedError::Parse("no event list under events/items/data".to_string())
            })?,
        _ => return Err(FeedError::Parse("JSON payload is not a list".to_string())),
    };

    let events = items
        .iter()
        .filter_map(|item| convert_item(item, source))
        .take(MAX_EVENTS_PER_SOURCE)
        .collect();

    Ok(events)
}

/// Convert one entry. Entries without a usable title or start are skipped.
fn convert_item(item: &Value, source: &FeedSource) -> Option<EventRecord> {
    let title = clean_text(str_field(item, TITLE_KEYS)?);
    if title.is_empty() {
        return None;
    }
    let starts_at = parse_flex_datetime(str_field(item, START_KEYS)?)?;

    let ends_at = str_field(item, END_KEYS)
        .and_then(parse_flex_datetime)
        .unwrap_or_else(|| starts_at + Duration::hours(DEFAULT_DURATION_HOURS));

    let description = str_field(item, DESCRIPTION_KEYS)
        .map(clean_text)
        .unwrap_or_else(|| "Community event".to_string());
    let location = str_field(item, LOCATION_KEYS)
        .map(clean_text)
        .unwrap_or_default();
    let organizer = str_field(item, ORGANIZER_KEYS)
        .map(clean_text)
        .unwrap_or_default();

    // Explicit boolean beats a zero price beats the text heuristic.
    let is_free = bool_field(item, FREE_KEYS)
        .or_else(|| num_field(item, PRICE_KEYS).map(|p| p == 0.0))
        .unwrap_or_else(|| is_free_text(&description));

    let expected_attendance = ATTENDANCE_KEYS
        .iter()
        .find_map(|k| item.get(*k).and_then(Value::as_u64))
        .unwrap_or(0)
        .min(u32::MAX as u64) as u32;

    Some(EventRecord {
        category: categorize(&title, &description),
        is_free,
        start_time_label: time_label(starts_at),
        end_time_label: time_label(ends_at),
        title,
        description,
        location,
        organizer,
        starts_at,
        ends_at,
        expected_attendance,
        image_url: str_field(item, IMAGE_KEYS).map(|s| s.to_string()),
        source_id: source.id.clone(),
        provenance: Provenance::Fetched,
    })
}

fn str_field<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| item.get(*k).and_then(Value::as_str))
}

fn bool_field(item: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| item.get(*k).and_then(Value::as_bool))
}

fn num_field(item: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| item.get(*k).and_then(Value::as_f64))
}

/// Accept RFC 3339, "YYYY-MM-DD HH:MM:SS", or bare dates.
fn parse_flex_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
