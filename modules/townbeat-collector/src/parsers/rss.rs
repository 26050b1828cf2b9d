//! RSS/Atom syndication decoding via feed-rs. RSS item lists and Atom
//! entry lists come out of the same parser.

use chrono::{Duration, Utc};

use townbeat_common::text::{categorize, clean_text, is_free_text, time_label};
use townbeat_common::{EventRecord, FeedError, FeedSource, Fetch, Provenance, Result};

use super::MAX_EVENTS_PER_SOURCE;

/// Events announced via syndication rarely carry a duration; assume two hours.
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
    let feed = feed_rs::parser::parse(body.as_bytes())
        .map_err(|e| FeedError::Parse(format!("invalid RSS/Atom payload: {e}")))?;

    let events = feed
        .entries
        .into_iter()
        .take(MAX_EVENTS_PER_SOURCE)
        .map(|entry| {
            let title = entry
                .title
                .map(|t| clean_text(&t.content))
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| source.name.clone());
            let description = entry
                .summary
                .map(|s| clean_text(&s.content))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Community event".to_string());

            // Published, else updated, else "now" — feeds without dates
            // still produce a record.
            let starts_at = entry
                .published
                .or(entry.updated)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(Utc::now);
            let ends_at = starts_at + Duration::hours(DEFAULT_DURATION_HOURS);

            EventRecord {
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
            }
        })
        .collect();

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use townbeat_common::{EventCategory, OrgCategory, Place, WireFormat};

    fn test_source() -> FeedSource {
        FeedSource {
            id: "duluth-chamber-abc12345".to_string(),
            name: "Duluth Chamber of Commerce".to_string(),
            place: Place::new("Duluth", "MN"),
            category: OrgCategory::Chamber,
            feed_url: Some("https://duluthchamber.com/events/feed".to_string()),
            website_url: Some("https://duluthchamber.com".to_string()),
            active: true,
            format: WireFormat::Rss,
            last_synced: None,
        }
    }

    const RSS_FIXTURE: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Chamber Events</title>
  <item>
    <title>Networking &amp; Coffee</title>
    <description>&lt;p&gt;Free coffee hour for members&lt;/p&gt;</description>
    <pubDate>Tue, 10 Mar 2026 14:00:00 GMT</pubDate>
  </item>
  <item>
    <title>Spring Expo</title>
    <description>Annual business expo</description>
    <pubDate>Wed, 01 Apr 2026 16:00:00 GMT</pubDate>
  </item>
</channel></rss>"#;

    const ATOM_FIXTURE: &str = r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>City Updates</title>
  <id>urn:uuid:feed</id>
  <updated>2026-03-01T00:00:00Z</updated>
  <entry>
    <title>Park Cleanup Day</title>
    <id>urn:uuid:e1</id>
    <updated>2026-03-05T09:00:00Z</updated>
    <summary>Volunteer cleanup, free lunch provided</summary>
  </entry>
</feed>"#;

    #[test]
    fn rss_items_become_records_with_two_hour_duration() {
        let events = parse_body(RSS_FIXTURE, &test_source()).unwrap();
        assert_eq!(events.len(), 2);
        let first = &events[0];
        assert_eq!(first.title, "Networking & Coffee");
        assert_eq!(first.description, "Free coffee hour for members");
        assert!(first.is_free);
        assert_eq!(first.ends_at, first.starts_at + Duration::hours(2));
        assert_eq!(first.category, EventCategory::Business);
    }

    #[test]
    fn atom_entries_are_accepted_too() {
        let events = parse_body(ATOM_FIXTURE, &test_source()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Park Cleanup Day");
        assert!(events[0].is_free);
    }

    #[test]
    fn entry_without_date_defaults_to_now() {
        let feed = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>F</title>
  <item><title>Undated thing</title><description>soon</description></item>
</channel></rss>"#;
        let before = Utc::now();
        let events = parse_body(feed, &test_source()).unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].starts_at >= before);
    }

    #[test]
    fn output_caps_at_ten_entries() {
        let mut items = String::new();
        for i in 0..30 {
            items.push_str(&format!(
                "<item><title>E{i}</title><pubDate>Tue, 10 Mar 2026 14:00:00 GMT</pubDate></item>"
            ));
        }
        let feed = format!(
            r#"<?xml version="1.0"?><rss version="2.0"><channel><title>F</title>{items}</channel></rss>"#
        );
        let events = parse_body(&feed, &test_source()).unwrap();
        assert_eq!(events.len(), MAX_EVENTS_PER_SOURCE);
    }

    #[test]
    fn non_xml_payload_is_a_parse_error() {
        assert!(matches!(
            parse_body("{\"not\": \"xml\"}", &test_source()),
            Err(FeedError::Parse(_)),
        ));
    }
}
