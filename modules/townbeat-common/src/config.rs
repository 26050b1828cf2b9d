use std::env;
use std::time::Duration;

/// Runtime configuration loaded from environment variables. Everything has
/// a sensible default; no variable is required.
#[derive(Debug, Clone)]
pub struct Config {
    /// User-Agent sent on every request.
    pub user_agent: String,
    /// Timeout for full feed fetches.
    pub fetch_timeout: Duration,
    /// Timeout for domain probes and HEAD validation.
    pub probe_timeout: Duration,
    /// Sources collected concurrently per batch.
    pub batch_size: usize,
    /// Pause between batches, to avoid hammering origin servers.
    pub batch_pause: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            user_agent: env::var("TOWNBEAT_USER_AGENT")
                .unwrap_or_else(|_| "townbeat/0.1 (+community event aggregator)".to_string()),
            fetch_timeout: Duration::from_secs(env_u64("TOWNBEAT_FETCH_TIMEOUT_SECS", 15)),
            probe_timeout: Duration::from_secs(env_u64("TOWNBEAT_PROBE_TIMEOUT_SECS", 5)),
            batch_size: env_u64("TOWNBEAT_BATCH_SIZE", 5) as usize,
            batch_pause: Duration::from_secs(env_u64("TOWNBEAT_BATCH_PAUSE_SECS", 2)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: "townbeat/0.1 (+community event aggregator)".to_string(),
            fetch_timeout: Duration::from_secs(15),
            probe_timeout: Duration::from_secs(5),
            batch_size: 5,
            batch_pause: Duration::from_secs(2),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
