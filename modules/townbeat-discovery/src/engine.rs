//! Feed discovery: probe candidate domains, scrape homepages for
//! calendar/event links, validate candidates with HEAD requests, and score
//! each surviving URL's reliability.

use std::collections::HashSet;

use chrono::Utc;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use townbeat_common::{DiscoveredFeed, FeedSource, Fetch, OrgCategory, Place, WireFormat};

use crate::candidates::candidate_domains;
use crate::regions;

/// Common feed path suffixes probed on every live domain, unioned with
/// whatever the homepage scan turns up.
const COMMON_FEED_PATHS: &[&str] = &[
    "/calendar",
    "/events",
    "/events.ics",
    "/calendar.ics",
    "/api/events",
    "/events/feed",
    "/calendar/feed",
    "/rss/events.xml",
];

/// Cap on paths validated per domain, to bound probe cost.
const MAX_PATHS_PER_DOMAIN: usize = 10;

/// Confidence boost for hosts under a government top-level suffix.
const GOV_SUFFIX_BOOST: f64 = 0.2;

/// Confidence boost for known-pattern URLs that validate directly.
const KNOWN_PATTERN_BOOST: f64 = 0.3;

/// High-confidence URL shapes probed directly by the popular-location
/// entry point, bypassing homepage scraping.
const KNOWN_PATTERNS: &[(&str, OrgCategory)] = &[
    ("https://www.{slug}.gov/calendar", OrgCategory::City),
    ("https://www.{slug}.gov/events", OrgCategory::City),
    ("https://{slug}.legistar.com/Calendar.aspx", OrgCategory::City),
    ("https://www.{slug}chamber.com/events", OrgCategory::Chamber),
];

// --- Format classification ---

/// One row of the wire-format classification cascade. Predicates see the
/// lowercased URL and lowercased content type.
struct FormatRule {
    applies: fn(&str, &str) -> bool,
    format: WireFormat,
    confidence: f64,
}

/// Ordered top-to-bottom; first match wins. The final row always matches.
const FORMAT_RULES: &[FormatRule] = &[
    FormatRule {
        applies: |url, ct| ct.contains("text/calendar") || url.ends_with(".ics"),
        format: WireFormat::Ical,
        confidence: 0.9,
    },
    FormatRule {
        applies: |url, ct| {
            ct.contains("rss") || ct.contains("xml") || url.contains("rss") || url.ends_with(".xml")
        },
        format: WireFormat::Rss,
        confidence: 0.8,
    },
    FormatRule {
        applies: |url, ct| ct.contains("json") || url.contains("api") || url.ends_with(".json"),
        format: WireFormat::Json,
        confidence: 0.7,
    },
    FormatRule {
        applies: |url, _| url.contains("calendar") || url.contains("events"),
        format: WireFormat::Html,
        confidence: 0.5,
    },
    FormatRule {
        applies: |_, _| true,
        format: WireFormat::Html,
        confidence: 0.3,
    },
];

/// Classify a validated URL's wire format and base confidence, then apply
/// the government-suffix boost. Result is clamped to [0, 1].
pub fn classify(url: &str, content_type: Option<&str>) -> (WireFormat, f64) {
    let url_lc = url.to_lowercase();
    let ct_lc = content_type.unwrap_or("").to_lowercase();

    let mut format = WireFormat::Html;
    let mut confidence = 0.3;
    for rule in FORMAT_RULES {
        if (rule.applies)(&url_lc, &ct_lc) {
            format = rule.format;
            confidence = rule.confidence;
            break;
        }
    }

    if is_government_host(url) {
        confidence += GOV_SUFFIX_BOOST;
    }

    (format, confidence.clamp(0.0, 1.0))
}

fn is_government_host(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.host_str()
                .map(|h| h.ends_with(".gov") || h.ends_with(".us"))
        })
        .unwrap_or(false)
}

/// Extract anchors whose target mentions "calendar" or "events",
/// resolved against the homepage URL. Http(s) only, deduplicated,
/// document order preserved.
fn calendar_links(html: &str, base_url: &str) -> Vec<String> {
    let base = match Url::parse(base_url) {
        Ok(u) => u,
        Err(_) => return Vec::new(),
    };

    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a[href]").expect("valid anchor selector");

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for element in document.select(&anchor_selector) {
        let href = match element.value().attr("href") {
            Some(h) => h.trim(),
            None => continue,
        };
        let href_lc = href.to_lowercase();
        if !href_lc.contains("calendar") && !href_lc.contains("events") {
            continue;
        }
        let resolved = match base.join(href) {
            Ok(u) => u,
            Err(_) => continue,
        };
        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }
        let resolved = resolved.to_string();
        if seen.insert(resolved.clone()) {
            links.push(resolved);
        }
    }
    links
}

fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(format!("{}://{}", parsed.scheme(), host))
}

// --- Engine ---

/// Probes a place's candidate domains and assembles scored feed records.
/// Never errors to its caller under normal network variability — failed
/// domains and paths just contribute nothing.
pub struct DiscoveryEngine<'a> {
    fetcher: &'a dyn Fetch,
}

impl<'a> DiscoveryEngine<'a> {
    pub fn new(fetcher: &'a dyn Fetch) -> Self {
        Self { fetcher }
    }

    /// Full discovery for a place, across city/school/chamber categories.
    /// Returned feeds are sorted confidence-descending.
    pub async fn discover(&self, place: &Place) -> Vec<DiscoveredFeed> {
        let mut feeds = Vec::new();

        for category in [OrgCategory::City, OrgCategory::School, OrgCategory::Chamber] {
            for domain in candidate_domains(place, category) {
                let homepage = match self.probe_domain(&domain).await {
                    Some(html) => html,
                    None => continue,
                };
                let found = self.survey_domain(place, category, &domain, &homepage).await;
                if !found.is_empty() {
                    debug!(domain, category = %category, feeds = found.len(), "Domain surveyed");
                }
                feeds.extend(found);
            }
        }

        sort_by_confidence(&mut feeds);
        info!(
            city = place.city.as_str(),
            state = place.state_code.as_str(),
            feeds = feeds.len(),
            "Discovery complete"
        );
        feeds
    }

    /// Free-form entry point: map the region name to a code, run full
    /// discovery, then probe known high-confidence URL shapes directly.
    /// The combined set is de-duplicated by feed URL, first occurrence wins.
    pub async fn discover_popular(
        &self,
        city_name: &str,
        region_name: &str,
    ) -> Vec<DiscoveredFeed> {
        let place = Place::new(city_name, &regions::state_code(region_name));
        let mut feeds = self.discover(&place).await;

        let slug = place.slug();
        for (template, category) in KNOWN_PATTERNS {
            let url = template.replace("{slug}", &slug);
            match self.fetcher.head(&url).await {
                Ok(head) => {
                    feeds.push(self.assemble(
                        &place,
                        *category,
                        &url,
                        head.content_type.as_deref(),
                        KNOWN_PATTERN_BOOST,
                    ));
                }
                Err(e) if e.is_recoverable() => {
                    debug!(url, error = %e, "Known-pattern URL ruled out");
                }
                Err(e) => {
                    warn!(url, error = %e, "Known-pattern probe failed");
                }
            }
        }

        let mut seen = HashSet::new();
        feeds.retain(|f| match &f.source.feed_url {
            Some(u) => seen.insert(u.clone()),
            None => true,
        });
        sort_by_confidence(&mut feeds);
        feeds
    }

    /// Probe `https://{domain}/`. A transport failure or explicit 404 means
    /// the domain does not exist for our purposes; any other response
    /// (including live-but-restrictive 4xx) means it does.
    async fn probe_domain(&self, domain: &str) -> Option<String> {
        let root = format!("https://{domain}/");
        match self.fetcher.probe(&root).await {
            Ok(doc) => Some(doc.body),
            Err(e) if e.is_recoverable() => {
                debug!(domain, error = %e, "Domain ruled out");
                None
            }
            Err(e) => {
                warn!(domain, error = %e, "Unexpected probe failure");
                None
            }
        }
    }

    /// Union homepage calendar links with the common suffixes, cap the
    /// total, and HEAD-validate each. A transport error on one URL drops
    /// that URL only.
    async fn survey_domain(
        &self,
        place: &Place,
        category: OrgCategory,
        domain: &str,
        homepage_html: &str,
    ) -> Vec<DiscoveredFeed> {
        let root = format!("https://{domain}/");
        let mut candidates = calendar_links(homepage_html, &root);
        let mut seen: HashSet<String> = candidates.iter().cloned().collect();
        for suffix in COMMON_FEED_PATHS {
            let url = format!("https://{domain}{suffix}");
            if seen.insert(url.clone()) {
                candidates.push(url);
            }
        }
        candidates.truncate(MAX_PATHS_PER_DOMAIN);

        let mut found = Vec::new();
        for url in candidates {
            match self.fetcher.head(&url).await {
                Ok(head) => {
                    found.push(self.assemble(
                        place,
                        category,
                        &url,
                        head.content_type.as_deref(),
                        0.0,
                    ));
                }
                Err(e) if e.is_recoverable() => {
                    debug!(url, error = %e, "Candidate path ruled out");
                }
                Err(e) => {
                    warn!(url, error = %e, "Candidate validation failed");
                }
            }
        }
        found
    }

    fn assemble(
        &self,
        place: &Place,
        category: OrgCategory,
        url: &str,
        content_type: Option<&str>,
        boost: f64,
    ) -> DiscoveredFeed {
        let (format, base) = classify(url, content_type);
        let confidence = (base + boost).clamp(0.0, 1.0);

        DiscoveredFeed {
            source: FeedSource {
                id: FeedSource::make_id(place, category),
                name: format!("{} {}", place.city, category.label()),
                place: place.clone(),
                category,
                feed_url: Some(url.to_string()),
                website_url: origin_of(url),
                active: false,
                format,
                last_synced: None,
            },
            confidence,
            checked_at: Utc::now(),
        }
    }
}

fn sort_by_confidence(feeds: &mut [DiscoveredFeed]) {
    feeds.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
