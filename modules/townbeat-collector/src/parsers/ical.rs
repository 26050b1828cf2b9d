//! iCalendar (VEVENT) decoding.

use std::io::BufReader;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use ical::parser::ical::component::IcalEvent;
use ical::property::Property;

use townbeat_common::text::{categorize, clean_text, is_free_text, time_label};
use townbeat_common::{EventRecord, FeedError, FeedSource, Fetch, Provenance, Result};

use super::MAX_EVENTS_PER_SOURCE;

pub(crate) async fn parse(
    fetch: &dyn Fetch,
    source: &FeedSource,
    url: &str,
) -> Result<Vec<EventRecord>> {
    let doc = fetch.get(url).await?;
    parse_body(&doc.body, source)
}

pub(crate) fn parse_body(body: &str, source: &FeedSource) -> Result<Vec<EventRecord>> {
    let reader = BufReader::new(body.as_bytes());
    let mut events = Vec::new();

    for calendar in ical::IcalParser::new(reader) {
        let calendar =
            calendar.map_err(|e| FeedError::Parse(format!("invalid iCalendar payload: {e}")))?;
        for vevent in &calendar.events {
            if events.len() >= MAX_EVENTS_PER_SOURCE {
                return Ok(events);
            }
            if let Some(event) = convert_vevent(vevent, source) {
                events.push(event);
            }
        }
    }

    Ok(events)
}

/// Convert a VEVENT to a record. Components without a start time or a
/// title are skipped rather than guessed at.
fn convert_vevent(vevent: &IcalEvent, source: &FeedSource) -> Option<EventRecord> {
    let title_raw = prop(&vevent.properties, "SUMMARY")?;
    let starts_at = parse_ical_datetime(prop(&vevent.properties, "DTSTART")?)?;

    let ends_at = prop(&vevent.properties, "DTEND")
        .and_then(parse_ical_datetime)
        .unwrap_or_else(|| starts_at + Duration::hours(1));

    let description = match prop(&vevent.properties, "DESCRIPTION") {
        Some(d) => clean_text(d),
        None => "Community event".to_string(),
    };
    let title = clean_text(title_raw);
    let location = prop(&vevent.properties, "LOCATION")
        .map(clean_text)
        .unwrap_or_default();
    let organizer = prop(&vevent.properties, "ORGANIZER")
        .map(|o| clean_text(o.trim_start_matches("mailto:")))
        .unwrap_or_default();

    Some(EventRecord {
        category: categorize(&title, &description),
        is_free: is_free_text(&description),
        start_time_label: time_label(starts_at),
        end_time_label: time_label(ends_at),
        title,
        description,
        location,
        organizer,
        starts_at,
        ends_at,
        expected_attendance: 0,
        image_url: None,
        source_id: source.id.clone(),
        provenance: Provenance::Fetched,
    })
}

fn prop<'a>(properties: &'a [Property], name: &str) -> Option<&'a str> {
    properties
        .iter()
        .find(|p| p.name == name)
        .and_then(|p| p.value.as_deref())
}

/// DTSTART/DTEND come in UTC ("...Z"), floating, and date-only flavors.
fn parse_ical_datetime(raw: &str) -> Option<DateTime<Utc>> {
    for fmt in ["%Y%m%dT%H%M%SZ", "%Y%m%dT%H%M%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
