//! Content-source search types

/// A single page returned by a tag search.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    /// Page identifier on the site (e.g. `scp-1234-jp`).
    pub fullname: String,
    /// Community rating; may be negative.
    pub rating: f64,
}

impl PageSummary {
    pub fn new(fullname: impl Into<String>, rating: f64) -> Self {
        Self {
            fullname: fullname.into(),
            rating,
        }
    }
}

/// A tag search against a site.
///
/// ```rust
/// # use occon_chart::PageQuery;
/// let query = PageQuery::new("+safe -explained").limit(30);
/// assert_eq!(query.limit, Some(30));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// Tag expression: `+tag` required, `-tag` excluded, bare tags any-of.
    pub tags: String,
    /// Maximum number of pages to return; `None` returns every match.
    pub limit: Option<usize>,
}

impl PageQuery {
    pub fn new(tags: impl Into<String>) -> Self {
        Self {
            tags: tags.into(),
            limit: None,
        }
    }

    /// Cap the number of returned pages.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
