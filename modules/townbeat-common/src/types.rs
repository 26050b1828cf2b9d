use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::text::slugify;

// --- Place ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceKind {
    City,
    Town,
    Township,
    Village,
}

/// A named locality feed discovery starts from. Immutable input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub city: String,
    pub state_code: String,
    pub county: Option<String>,
    pub kind: PlaceKind,
}

impl Place {
    pub fn new(city: &str, state_code: &str) -> Self {
        Self {
            city: city.to_string(),
            state_code: state_code.to_string(),
            county: None,
            kind: PlaceKind::City,
        }
    }

    /// Lowercased, alphanumeric-only form of the city name used in domain
    /// templates and source ids.
    pub fn slug(&self) -> String {
        slugify(&self.city)
    }
}

// --- Organization category ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgCategory {
    City,
    School,
    Chamber,
    Library,
    Parks,
}

impl OrgCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrgCategory::City => "city",
            OrgCategory::School => "school",
            OrgCategory::Chamber => "chamber",
            OrgCategory::Library => "library",
            OrgCategory::Parks => "parks",
        }
    }

    /// Human-readable label used when naming discovered sources.
    pub fn label(&self) -> &'static str {
        match self {
            OrgCategory::City => "City",
            OrgCategory::School => "School District",
            OrgCategory::Chamber => "Chamber of Commerce",
            OrgCategory::Library => "Library",
            OrgCategory::Parks => "Parks & Recreation",
        }
    }
}

impl std::fmt::Display for OrgCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// --- Wire format ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    Ical,
    Rss,
    Json,
    Html,
    Webcal,
}

impl std::fmt::Display for WireFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireFormat::Ical => write!(f, "ical"),
            WireFormat::Rss => write!(f, "rss"),
            WireFormat::Json => write!(f, "json"),
            WireFormat::Html => write!(f, "html"),
            WireFormat::Webcal => write!(f, "webcal"),
        }
    }
}

// --- Feed source ---

/// A registered feed: identity, activation state, and sync bookkeeping.
/// Owned exclusively by the SourceRegistry once registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSource {
    pub id: String,
    pub name: String,
    pub place: Place,
    pub category: OrgCategory,
    pub feed_url: Option<String>,
    pub website_url: Option<String>,
    pub active: bool,
    pub format: WireFormat,
    pub last_synced: Option<DateTime<Utc>>,
}

impl FeedSource {
    /// Build the stable source id: place slug + category + a uniqueness token.
    pub fn make_id(place: &Place, category: OrgCategory) -> String {
        let token = Uuid::new_v4().simple().to_string();
        format!("{}-{}-{}", place.slug(), category.as_str(), &token[..8])
    }
}

// --- Discovered feed ---

/// A candidate FeedSource paired with a heuristic confidence score.
/// Produced only by the discovery engine; confidence is derived, never
/// stored authoritatively anywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredFeed {
    pub source: FeedSource,
    pub confidence: f64,
    pub checked_at: DateTime<Utc>,
}

// --- Event record ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Government,
    Education,
    Business,
    Arts,
    Sports,
    Health,
    Community,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Government => write!(f, "government"),
            EventCategory::Education => write!(f, "education"),
            EventCategory::Business => write!(f, "business"),
            EventCategory::Arts => write!(f, "arts"),
            EventCategory::Sports => write!(f, "sports"),
            EventCategory::Health => write!(f, "health"),
            EventCategory::Community => write!(f, "community"),
        }
    }
}

/// Whether a record came from a real fetch or the synthetic fallback path.
/// Callers must never have to guess this from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Fetched,
    Synthetic,
}

/// The sole output contract of collection. Identity (record id) is assigned
/// downstream by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub location: String,
    pub organizer: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub start_time_label: String,
    pub end_time_label: String,
    pub expected_attendance: u32,
    pub image_url: Option<String>,
    pub is_free: bool,
    pub source_id: String,
    pub provenance: Provenance,
}
