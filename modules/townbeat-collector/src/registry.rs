//! In-memory catalog of known feeds. Single owner, single writer: all
//! mutation goes through these methods, and the concurrent collection path
//! only ever reads cloned snapshots.

use chrono::{DateTime, Utc};
use tracing::info;

use townbeat_common::{FeedError, FeedSource, OrgCategory, Place, WireFormat};

/// Curated seed feeds shipped active. Discovered sources, by contrast,
/// always start inactive and need explicit activation.
fn default_seeds() -> Vec<FeedSource> {
    let seeds = [
        (
            "Minneapolis City Calendar",
            Place::new("Minneapolis", "MN"),
            OrgCategory::City,
            "https://www.minneapolismn.gov/calendar/events.ics",
            "https://www.minneapolismn.gov",
            WireFormat::Ical,
        ),
        (
            "Saint Paul City Events",
            Place::new("Saint Paul", "MN"),
            OrgCategory::City,
            "https://www.stpaul.gov/events/feed",
            "https://www.stpaul.gov",
            WireFormat::Rss,
        ),
        (
            "Rochester Chamber Events",
            Place::new("Rochester", "MN"),
            OrgCategory::Chamber,
            "https://www.rochestermnchamber.com/api/events",
            "https://www.rochestermnchamber.com",
            WireFormat::Json,
        ),
    ];

    seeds
        .into_iter()
        .map(|(name, place, category, feed_url, website_url, format)| FeedSource {
            id: FeedSource::make_id(&place, category),
            name: name.to_string(),
            place,
            category,
            feed_url: Some(feed_url.to_string()),
            website_url: Some(website_url.to_string()),
            active: true,
            format,
            last_synced: None,
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: Vec<FeedSource>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the curated seed list.
    pub fn with_default_seeds() -> Self {
        let mut registry = Self::new();
        for seed in default_seeds() {
            // Seed tables are static; a duplicate here is a programming error.
            registry
                .add(seed)
                .expect("default seed list contains duplicates");
        }
        registry
    }

    pub fn all(&self) -> &[FeedSource] {
        &self.sources
    }

    pub fn by_state(&self, state_code: &str) -> Vec<&FeedSource> {
        self.sources
            .iter()
            .filter(|s| s.place.state_code.eq_ignore_ascii_case(state_code))
            .collect()
    }

    pub fn by_category(&self, category: OrgCategory) -> Vec<&FeedSource> {
        self.sources
            .iter()
            .filter(|s| s.category == category)
            .collect()
    }

    /// Cloned snapshot of active sources, for the collection path.
    pub fn active(&self) -> Vec<FeedSource> {
        self.sources.iter().filter(|s| s.active).cloned().collect()
    }

    /// Flip a source's active flag. Returns the new state, or None if no
    /// source has that id.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let source = self.sources.iter_mut().find(|s| s.id == id)?;
        source.active = !source.active;
        info!(id, active = source.active, "Source toggled");
        Some(source.active)
    }

    /// Register a source. Duplicate ids and duplicate feed URLs are
    /// rejected with a Validation error; the registry is unchanged.
    pub fn add(&mut self, source: FeedSource) -> Result<(), FeedError> {
        if self.sources.iter().any(|s| s.id == source.id) {
            return Err(FeedError::Validation(format!(
                "duplicate source id: {}",
                source.id
            )));
        }
        if let Some(url) = &source.feed_url {
            if self
                .sources
                .iter()
                .any(|s| s.feed_url.as_deref() == Some(url.as_str()))
            {
                return Err(FeedError::Validation(format!("duplicate feed URL: {url}")));
            }
        }
        info!(id = source.id.as_str(), name = source.name.as_str(), "Source added");
        self.sources.push(source);
        Ok(())
    }

    /// Remove by id. Returns whether a source was found and removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.sources.len();
        self.sources.retain(|s| s.id != id);
        let removed = self.sources.len() < before;
        if removed {
            info!(id, "Source removed");
        }
        removed
    }

    /// Record a successful sync. Called only by the registry owner, after
    /// a collection batch joins.
    pub fn mark_synced(&mut self, id: &str, at: DateTime<Utc>) {
        if let Some(source) = self.sources.iter_mut().find(|s| s.id == id) {
            source.last_synced = Some(at);
        }
    }
}
