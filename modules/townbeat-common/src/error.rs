use thiserror::Error;

/// Result type alias for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;

/// Error taxonomy for discovery and collection.
///
/// Transport and Parse are caught at the smallest possible scope
/// (per-domain, per-path, per-source) and become empty contributions.
/// NotFound means "absent", not broken — a 404 root probe just rules a
/// candidate domain out. Validation is returned to registry callers and
/// never crosses the collection path.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FeedError {
    /// True for errors that only mean "this source/domain contributed
    /// nothing this run" — never fatal to a discovery or collection run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FeedError::Transport(_) | FeedError::NotFound(_) | FeedError::Parse(_)
        )
    }
}
