//! Synthetic events substituted when a source's real fetch/parse path
//! fails. Always succeeds, always three events, always clearly marked
//! Synthetic so downstream trust decisions never have to guess.

use chrono::{Duration, Utc};
use rand::Rng;

use townbeat_common::text::time_label;
use townbeat_common::{EventCategory, EventRecord, FeedSource, Provenance};

/// Number of placeholder events generated per failed source.
pub const FALLBACK_EVENT_COUNT: usize = 3;

struct FallbackTemplate {
    title: &'static str,
    description: &'static str,
    category: EventCategory,
    duration_hours: i64,
    attendance_range: (u32, u32),
}

/// Rotating template list. The starting offset varies per source so a page
/// of all-fallback results doesn't show every source with identical events.
const TEMPLATES: &[FallbackTemplate] = &[
    FallbackTemplate {
        title: "City Council Meeting",
        description: "Regular meeting of the city council. Agenda posted at city hall.",
        category: EventCategory::Government,
        duration_hours: 2,
        attendance_range: (20, 80),
    },
    FallbackTemplate {
        title: "Library Story Time",
        description: "Story time for young readers at the public library.",
        category: EventCategory::Education,
        duration_hours: 1,
        attendance_range: (10, 40),
    },
    FallbackTemplate {
        title: "Chamber Networking Breakfast",
        description: "Monthly networking breakfast for local business owners.",
        category: EventCategory::Business,
        duration_hours: 2,
        attendance_range: (25, 100),
    },
    FallbackTemplate {
        title: "Community Health Fair",
        description: "Health screenings and wellness resources for residents.",
        category: EventCategory::Health,
        duration_hours: 4,
        attendance_range: (50, 200),
    },
    FallbackTemplate {
        title: "Art Exhibition Opening",
        description: "Opening night for a new exhibition by local artists.",
        category: EventCategory::Arts,
        duration_hours: 3,
        attendance_range: (30, 120),
    },
];

/// Produce three plausible placeholder events for a source, spread over the
/// next few days. Start times are strictly in the future.
pub fn fallback_events(source: &FeedSource) -> Vec<EventRecord> {
    let mut rng = rand::rng();
    let now = Utc::now();
    let offset = source.id.len() % TEMPLATES.len();

    (0..FALLBACK_EVENT_COUNT)
        .map(|i| {
            let template = &TEMPLATES[(offset + i) % TEMPLATES.len()];
            // Some day in the next few days, at a plausible hour.
            let day = (now + Duration::days(rng.random_range(1..=5))).date_naive();
            let starts_at = day
                .and_hms_opt(rng.random_range(9..=19), 0, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or_else(|| now + Duration::days(1));
            let ends_at = starts_at + Duration::hours(template.duration_hours);

            EventRecord {
                title: template.title.to_string(),
                description: template.description.to_string(),
                category: template.category,
                location: format!("{}, {}", source.place.city, source.place.state_code),
                organizer: source.name.clone(),
                start_time_label: time_label(starts_at),
                end_time_label: time_label(ends_at),
                starts_at,
                ends_at,
                expected_attendance: rng
                    .random_range(template.attendance_range.0..=template.attendance_range.1),
                image_url: None,
                is_free: rng.random_bool(0.7),
                source_id: source.id.clone(),
                provenance: Provenance::Synthetic,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use townbeat_common::{OrgCategory, Place, WireFormat};

    fn test_source() -> FeedSource {
        FeedSource {
            id: "duluth-city-abc12345".to_string(),
            name: "Duluth City".to_string(),
            place: Place::new("Duluth", "MN"),
            category: OrgCategory::City,
            feed_url: Some("https://duluth.gov/events.ics".to_string()),
            website_url: Some("https://duluth.gov".to_string()),
            active: true,
            format: WireFormat::Ical,
            last_synced: None,
        }
    }

    #[test]
    fn always_exactly_three_events() {
        assert_eq!(fallback_events(&test_source()).len(), FALLBACK_EVENT_COUNT);
    }

    #[test]
    fn all_events_tagged_with_source_and_synthetic() {
        for event in fallback_events(&test_source()) {
            assert_eq!(event.source_id, "duluth-city-abc12345");
            assert_eq!(event.provenance, Provenance::Synthetic);
        }
    }

    #[test]
    fn all_starts_strictly_in_the_future() {
        let now = Utc::now();
        for event in fallback_events(&test_source()) {
            assert!(event.starts_at > now);
            assert!(event.ends_at > event.starts_at);
        }
    }

    #[test]
    fn templates_rotate_within_a_source() {
        let events = fallback_events(&test_source());
        assert_ne!(events[0].title, events[1].title);
        assert_ne!(events[1].title, events[2].title);
    }
}
