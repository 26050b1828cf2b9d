//! One parser per wire format, all emitting the same normalized records.

mod html;
mod ical;
mod json;
mod rss;

use townbeat_common::{EventRecord, FeedError, FeedSource, Fetch, Result, WireFormat};

/// Cap on events emitted per source, regardless of feed size.
pub const MAX_EVENTS_PER_SOURCE: usize = 10;

/// Fetch and parse a source according to its wire format tag. Webcal URLs
/// are rewritten to https and decoded as iCalendar; HTML sources scrape the
/// organization's website rather than a feed URL.
pub async fn parse_source(fetch: &dyn Fetch, source: &FeedSource) -> Result<Vec<EventRecord>> {
    match source.format {
        WireFormat::Ical => ical::parse(fetch, source, require_feed_url(source)?).await,
        WireFormat::Webcal => {
            let url = rewrite_webcal(require_feed_url(source)?);
            ical::parse(fetch, source, &url).await
        }
        WireFormat::Rss => rss::parse(fetch, source, require_feed_url(source)?).await,
        WireFormat::Json => json::parse(fetch, source, require_feed_url(source)?).await,
        WireFormat::Html => {
            let url = source
                .website_url
                .as_deref()
                .or(source.feed_url.as_deref())
                .ok_or_else(|| {
                    FeedError::Validation(format!("source {} has no website or feed URL", source.id))
                })?;
            html::parse(fetch, source, url).await
        }
    }
}

fn require_feed_url(source: &FeedSource) -> Result<&str> {
    source
        .feed_url
        .as_deref()
        .ok_or_else(|| FeedError::Validation(format!("source {} has no feed URL", source.id)))
}

/// Rewrite a `webcal://` scheme to `https://`; anything else passes through.
pub fn rewrite_webcal(url: &str) -> String {
    match url.strip_prefix("webcal://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webcal_scheme_rewrites_to_https() {
        assert_eq!(
            rewrite_webcal("webcal://example.gov/events.ics"),
            "https://example.gov/events.ics",
        );
        assert_eq!(
            rewrite_webcal("https://example.gov/events.ics"),
            "https://example.gov/events.ics",
        );
    }
}
