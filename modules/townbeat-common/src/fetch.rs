//! HTTP fetch seam. The real client lives in townbeat-collector; discovery
//! and collection both program against this trait so tests can stub the
//! network entirely.

use async_trait::async_trait;

use crate::error::Result;

/// A fetched document: final URL, status, content type, and body.
#[derive(Debug, Clone)]
pub struct FetchedDoc {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Headers-only response from a HEAD request.
#[derive(Debug, Clone)]
pub struct FetchedHead {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
}

/// GET/HEAD capability with per-operation timeouts.
///
/// Implementations map DNS/connection/timeout failures to
/// `FeedError::Transport` and explicit 404s to `FeedError::NotFound`; any
/// other status returns Ok so callers can apply their own status rules.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Full fetch with the standard (longer) timeout.
    async fn get(&self, url: &str) -> Result<FetchedDoc>;

    /// Headers-only validation fetch with a short timeout.
    async fn head(&self, url: &str) -> Result<FetchedHead>;

    /// Existence probe with a short timeout. Defaults to `get`; the real
    /// client overrides this with a tighter deadline.
    async fn probe(&self, url: &str) -> Result<FetchedDoc> {
        self.get(url).await
    }
}
