//! Feed collection: fetch registered sources, decode whichever wire format
//! each one speaks, and emit normalized event records.

pub mod collector;
pub mod fallback;
pub mod fetch;
pub mod parsers;
pub mod registry;
pub mod store;

pub use collector::{CollectStats, Collector, CollectorConfig};
pub use fetch::HttpFetcher;
pub use registry::SourceRegistry;
pub use store::{sync_to_storage, EventStore, MemoryEventStore};
