pub mod candidates;
pub mod engine;
pub mod regions;

pub use engine::DiscoveryEngine;
