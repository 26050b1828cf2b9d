//! Collection orchestrator. Active sources are fetched in small concurrent
//! batches with a pause between batches so small municipal servers aren't
//! hammered. A source whose fetch or parse fails gets synthetic fallback
//! events instead of dropping out of the result.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tracing::{info, warn};

use townbeat_common::{Config, EventRecord, FeedSource, Fetch};

use crate::fallback::fallback_events;
use crate::parsers::parse_source;
use crate::registry::SourceRegistry;

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Sources fetched concurrently per batch.
    pub batch_size: usize,
    /// Pause between batches. Zero in tests.
    pub batch_pause: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            batch_pause: Duration::from_secs(2),
        }
    }
}

impl From<&Config> for CollectorConfig {
    fn from(config: &Config) -> Self {
        Self {
            batch_size: config.batch_size,
            batch_pause: config.batch_pause,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectStats {
    pub sources_total: usize,
    pub sources_fetched: usize,
    pub sources_fallback: usize,
    pub events: usize,
}

impl fmt::Display for CollectStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} events from {} sources ({} fetched, {} fallback)",
            self.events, self.sources_total, self.sources_fetched, self.sources_fallback,
        )
    }
}

enum Outcome {
    Fetched(Vec<EventRecord>),
    Fallback(Vec<EventRecord>),
}

pub struct Collector<'a> {
    fetcher: &'a dyn Fetch,
    config: CollectorConfig,
}

impl<'a> Collector<'a> {
    pub fn new(fetcher: &'a dyn Fetch, config: CollectorConfig) -> Self {
        Self { fetcher, config }
    }

    /// Collect events from every active source in the registry. Successful
    /// sources are marked synced; failed ones keep their previous sync
    /// timestamp and contribute fallback events.
    pub async fn collect_all(&self, registry: &mut SourceRegistry) -> Vec<EventRecord> {
        let active = registry.active();
        let mut stats = CollectStats {
            sources_total: active.len(),
            ..Default::default()
        };
        let mut collected = Vec::new();

        for (batch_index, batch) in active.chunks(self.config.batch_size.max(1)).enumerate() {
            if batch_index > 0 && !self.config.batch_pause.is_zero() {
                tokio::time::sleep(self.config.batch_pause).await;
            }

            let tasks = batch.iter().map(|source| self.collect_one(source));
            let outcomes = join_all(tasks).await;
            let finished_at = Utc::now();

            for (source, outcome) in batch.iter().zip(outcomes) {
                match outcome {
                    Outcome::Fetched(events) => {
                        stats.sources_fetched += 1;
                        stats.events += events.len();
                        registry.mark_synced(&source.id, finished_at);
                        collected.extend(events);
                    }
                    Outcome::Fallback(events) => {
                        stats.sources_fallback += 1;
                        stats.events += events.len();
                        collected.extend(events);
                    }
                }
            }
        }

        info!(%stats, "Collection run complete");
        collected
    }

    async fn collect_one(&self, source: &FeedSource) -> Outcome {
        match parse_source(self.fetcher, source).await {
            Ok(events) => {
                info!(
                    source_id = source.id.as_str(),
                    events = events.len(),
                    "Collected source"
                );
                Outcome::Fetched(events)
            }
            Err(e) => {
                warn!(
                    source_id = source.id.as_str(),
                    error = %e,
                    "Source failed, substituting fallback events"
                );
                Outcome::Fallback(fallback_events(source))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_display_reads_naturally() {
        let stats = CollectStats {
            sources_total: 4,
            sources_fetched: 3,
            sources_fallback: 1,
            events: 17,
        };
        assert_eq!(
            stats.to_string(),
            "17 events from 4 sources (3 fetched, 1 fallback)",
        );
    }
}
