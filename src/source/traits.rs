//! Traits for the upstream content source.
//!
//! Opening a site yields a [`SiteSession`] that owns whatever connection
//! state the source needs. Sessions are released when dropped, so every
//! exit path of the caller (success, `?` propagation) gives them back.

use async_trait::async_trait;

use crate::Result;
use crate::types::{PageQuery, PageSummary};

/// A wiki platform that hosts sites with tagged, rated pages.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Source name for logging/debugging.
    fn name(&self) -> &str;

    /// Connect and look up a named site.
    ///
    /// Returns `SiteNotFound` when the platform has no such site.
    async fn open_site(&self, site: &str) -> Result<Box<dyn SiteSession>>;
}

/// An open session on a single site.
#[async_trait]
pub trait SiteSession: Send + Sync {
    /// Name of the site this session is bound to.
    fn site(&self) -> &str;

    /// Search pages by tag expression.
    ///
    /// Results are capped at `query.limit` when set; otherwise every
    /// matching page is returned.
    async fn search_pages(&self, query: &PageQuery) -> Result<Vec<PageSummary>>;
}
