//! Discovery engine tests against a stubbed network.

use std::collections::HashMap;

use async_trait::async_trait;
use townbeat_common::{FeedError, Fetch, FetchedDoc, FetchedHead, Place, Result};
use townbeat_discovery::DiscoveryEngine;

/// Stub network: explicit responses per URL, everything else unreachable.
#[derive(Default)]
struct StubFetcher {
    pages: HashMap<String, String>,
    heads: HashMap<String, Option<String>>,
    not_found: Vec<String>,
}

impl StubFetcher {
    fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    fn head_ok(mut self, url: &str, content_type: Option<&str>) -> Self {
        self.heads
            .insert(url.to_string(), content_type.map(|s| s.to_string()));
        self
    }

    fn gone(mut self, url: &str) -> Self {
        self.not_found.push(url.to_string());
        self
    }
}

#[async_trait]
impl Fetch for StubFetcher {
    async fn get(&self, url: &str) -> Result<FetchedDoc> {
        if self.not_found.iter().any(|u| u == url) {
            return Err(FeedError::NotFound(url.to_string()));
        }
        match self.pages.get(url) {
            Some(body) => Ok(FetchedDoc {
                url: url.to_string(),
                status: 200,
                content_type: Some("text/html".to_string()),
                body: body.clone(),
            }),
            None => Err(FeedError::Transport(format!("unreachable: {url}"))),
        }
    }

    async fn head(&self, url: &str) -> Result<FetchedHead> {
        if self.not_found.iter().any(|u| u == url) {
            return Err(FeedError::NotFound(url.to_string()));
        }
        match self.heads.get(url) {
            Some(content_type) => Ok(FetchedHead {
                url: url.to_string(),
                status: 200,
                content_type: content_type.clone(),
            }),
            None => Err(FeedError::Transport(format!("unreachable: {url}"))),
        }
    }
}

#[tokio::test]
async fn unreachable_network_yields_empty_discovery() {
    let fetcher = StubFetcher::default();
    let engine = DiscoveryEngine::new(&fetcher);
    let feeds = engine.discover(&Place::new("Duluth", "MN")).await;
    assert!(feeds.is_empty());
}

#[tokio::test]
async fn root_404_yields_zero_feeds_for_that_domain() {
    // The domain resolves but answers 404 at the root: treated as absent,
    // so none of its paths are ever validated.
    let fetcher = StubFetcher::default()
        .gone("https://example.gov/")
        .head_ok("https://example.gov/calendar", None);
    let engine = DiscoveryEngine::new(&fetcher);
    let feeds = engine.discover(&Place::new("Example", "MN")).await;
    assert!(feeds.is_empty());
}

#[tokio::test]
async fn live_domain_produces_scored_inactive_sources() {
    let homepage = r#"<a href="/city-calendar">Calendar</a><a href="/about">About</a>"#;
    let fetcher = StubFetcher::default()
        .page("https://duluth.gov/", homepage)
        .head_ok("https://duluth.gov/city-calendar", None)
        .head_ok("https://duluth.gov/events.ics", Some("text/calendar"));
    let engine = DiscoveryEngine::new(&fetcher);

    let feeds = engine.discover(&Place::new("Duluth", "MN")).await;
    assert_eq!(feeds.len(), 2);

    // Sorted confidence-descending: the .ics (0.9 + 0.2 gov, clamped to
    // 1.0) beats the scraped calendar page (0.5 + 0.2).
    assert_eq!(
        feeds[0].source.feed_url.as_deref(),
        Some("https://duluth.gov/events.ics"),
    );
    assert!((feeds[0].confidence - 1.0).abs() < f64::EPSILON);
    assert!((feeds[1].confidence - 0.7).abs() < f64::EPSILON);

    for feed in &feeds {
        assert!(!feed.source.active, "discovered sources start inactive");
        assert_eq!(
            feed.source.website_url.as_deref(),
            Some("https://duluth.gov"),
        );
        assert!((0.0..=1.0).contains(&feed.confidence));
    }
}

#[tokio::test]
async fn popular_discovery_dedups_by_feed_url() {
    // The homepage links to the same URL the known-pattern probe hits.
    let homepage = r#"<a href="https://www.duluth.gov/calendar">Calendar</a>"#;
    let fetcher = StubFetcher::default()
        .page("https://duluth.gov/", homepage)
        .head_ok("https://www.duluth.gov/calendar", None);
    let engine = DiscoveryEngine::new(&fetcher);

    let feeds = engine.discover_popular("Duluth", "Minnesota").await;
    let matches: Vec<_> = feeds
        .iter()
        .filter(|f| f.source.feed_url.as_deref() == Some("https://www.duluth.gov/calendar"))
        .collect();
    assert_eq!(matches.len(), 1, "duplicate feed URLs must collapse");
}

#[tokio::test]
async fn known_pattern_probe_boosts_confidence() {
    // No candidate domain resolves; only the known-pattern URL validates.
    let fetcher = StubFetcher::default().head_ok("https://www.duluth.gov/calendar", None);
    let engine = DiscoveryEngine::new(&fetcher);

    let feeds = engine.discover_popular("Duluth", "Minnesota").await;
    assert_eq!(feeds.len(), 1);
    // base 0.5 (calendar URL) + 0.2 gov + 0.3 known-pattern, clamped
    assert!((feeds[0].confidence - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn unknown_region_name_falls_back_to_two_letter_code() {
    let fetcher = StubFetcher::default().head_ok("https://www.duluth.gov/events", None);
    let engine = DiscoveryEngine::new(&fetcher);

    let feeds = engine.discover_popular("Duluth", "Borealia").await;
    assert_eq!(feeds.len(), 1);
    assert_eq!(feeds[0].source.place.state_code, "BO");
}
