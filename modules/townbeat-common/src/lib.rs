pub mod config;
pub mod error;
pub mod fetch;
pub mod text;
pub mod types;

pub use config::Config;
pub use error::{FeedError, Result};
pub use fetch::{Fetch, FetchedDoc, FetchedHead};
pub use types::*;
