//! Wikidot client for tag searches over the ListPages module.
//!
//! Wikidot has no JSON search API. Searches go through the site's
//! `ajax-module-connector.php` endpoint, which renders `list/ListPagesModule`
//! and returns the HTML inside a JSON envelope. The module body is chosen so
//! each page renders as a pair of tagged spans (`fullname`, `rating`) that
//! are cheap to pick out again.
//!
//! Anonymous access only needs a matching `wikidot_token7` value in both the
//! cookie and the form body.

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use reqwest::header::COOKIE;
use serde::Deserialize;
use tracing::{debug, warn};

use super::traits::{ContentSource, SiteSession};
use crate::types::{PageQuery, PageSummary};
use crate::{ChartError, Result};

/// Default site URL; `{site}` is replaced with the site name.
pub const DEFAULT_URL_TEMPLATE: &str = "https://{site}.wikidot.com";

/// ListPages refuses `perPage` values above this.
pub const MAX_PER_PAGE: usize = 250;

const MODULE_CONNECTOR: &str = "ajax-module-connector.php";
const LIST_PAGES_MODULE: &str = "list/ListPagesModule";
const ANONYMOUS_TOKEN: &str = "occonchart";
const MODULE_BODY: &str = "[[span class=\"fullname\"]]%%fullname%%[[/span]][[span class=\"rating\"]]%%rating%%[[/span]]";

static PAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="fullname">([^<]*)</span>\s*<span class="rating">([^<]*)</span>"#)
        .expect("page pattern is valid")
});

/// Configuration for [`WikidotClient`].
///
/// ```rust
/// # use occon_chart::source::WikidotConfig;
/// # use std::time::Duration;
/// let config = WikidotConfig::new()
///     .url_template("http://localhost:8080")
///     .timeout(Duration::from_secs(5));
/// assert_eq!(config.site_url("scp-jp"), "http://localhost:8080");
/// ```
#[derive(Debug, Clone)]
pub struct WikidotConfig {
    /// Site URL template. Default: `https://{site}.wikidot.com`.
    pub url_template: String,
    /// Per-request timeout. Default: 60s.
    pub timeout: Duration,
    /// Pages requested per ListPages call, capped at [`MAX_PER_PAGE`].
    pub per_page: usize,
}

impl Default for WikidotConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            timeout: Duration::from_secs(60),
            per_page: MAX_PER_PAGE,
        }
    }
}

impl WikidotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the site URL template (for testing with wiremock).
    pub fn url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the page size, clamped to `1..=MAX_PER_PAGE`.
    pub fn per_page(mut self, n: usize) -> Self {
        self.per_page = n.clamp(1, MAX_PER_PAGE);
        self
    }

    /// Resolve the base URL of a site.
    pub fn site_url(&self, site: &str) -> String {
        self.url_template
            .replace("{site}", site)
            .trim_end_matches('/')
            .to_string()
    }
}

/// Client for Wikidot-hosted sites.
#[derive(Clone)]
pub struct WikidotClient {
    http: Client,
    config: WikidotConfig,
}

impl WikidotClient {
    /// Create a client with the given configuration.
    pub fn new(config: WikidotConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ChartError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &WikidotConfig {
        &self.config
    }
}

#[async_trait]
impl ContentSource for WikidotClient {
    fn name(&self) -> &str {
        "wikidot"
    }

    async fn open_site(&self, site: &str) -> Result<Box<dyn SiteSession>> {
        let base_url = self.config.site_url(site);
        debug!(site, %base_url, "looking up site");

        let response = self
            .http
            .get(format!("{base_url}/"))
            .send()
            .await
            .map_err(|e| ChartError::Http(e.to_string()))?;

        match response.status().as_u16() {
            404 => return Err(ChartError::SiteNotFound(site.to_string())),
            _ => handle_response_errors(&response)?,
        }

        Ok(Box::new(WikidotSite {
            http: self.http.clone(),
            site: site.to_string(),
            base_url,
            per_page: self.config.per_page.clamp(1, MAX_PER_PAGE),
        }))
    }
}

/// An open session on one Wikidot site.
struct WikidotSite {
    http: Client,
    site: String,
    base_url: String,
    per_page: usize,
}

impl WikidotSite {
    /// Fetch one ListPages page of results.
    async fn list_pages(&self, tags: &str, per_page: usize, offset: usize) -> Result<Vec<PageSummary>> {
        let form = [
            ("moduleName", LIST_PAGES_MODULE.to_string()),
            ("category", "*".to_string()),
            ("tags", tags.to_string()),
            ("order", "created_at desc".to_string()),
            ("perPage", per_page.to_string()),
            ("offset", offset.to_string()),
            ("separate", "no".to_string()),
            ("module_body", MODULE_BODY.to_string()),
            ("wikidot_token7", ANONYMOUS_TOKEN.to_string()),
        ];

        let response = self
            .http
            .post(format!("{}/{MODULE_CONNECTOR}", self.base_url))
            .header(COOKIE, format!("wikidot_token7={ANONYMOUS_TOKEN}"))
            .form(&form)
            .send()
            .await
            .map_err(|e| ChartError::Http(e.to_string()))?;

        handle_response_errors(&response)?;

        let body = response
            .text()
            .await
            .map_err(|e| ChartError::Http(e.to_string()))?;
        let envelope: ModuleResponse = serde_json::from_str(&body)
            .map_err(|e| ChartError::Parse(format!("invalid module response: {e}")))?;

        if envelope.status != "ok" {
            return Err(ChartError::Module {
                status: envelope.status,
                message: envelope.message.unwrap_or_default(),
            });
        }

        parse_pages(&envelope.body)
    }
}

#[async_trait]
impl SiteSession for WikidotSite {
    fn site(&self) -> &str {
        &self.site
    }

    async fn search_pages(&self, query: &PageQuery) -> Result<Vec<PageSummary>> {
        let mut pages: Vec<PageSummary> = Vec::new();
        let mut seen = HashSet::new();
        let mut offset = 0;

        loop {
            let remaining = query.limit.map(|limit| limit.saturating_sub(pages.len()));
            let per_page = remaining.map_or(self.per_page, |r| r.min(self.per_page));
            if per_page == 0 {
                break;
            }

            let batch = self.list_pages(&query.tags, per_page, offset).await?;
            let fetched = batch.len();
            let before = pages.len();
            pages.extend(
                batch
                    .into_iter()
                    .filter(|page| seen.insert(page.fullname.clone())),
            );

            if fetched < per_page {
                break;
            }
            // A full page with nothing new means the offset was not honoured.
            if pages.len() == before {
                warn!(site = %self.site, tags = %query.tags, offset, "listing stopped advancing");
                break;
            }
            offset += fetched;
        }

        if let Some(limit) = query.limit {
            pages.truncate(limit);
        }

        debug!(site = %self.site, tags = %query.tags, pages = pages.len(), "search complete");
        Ok(pages)
    }
}

#[derive(Deserialize)]
struct ModuleResponse {
    status: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    message: Option<String>,
}

/// Check response status and map to appropriate error.
fn handle_response_errors(response: &reqwest::Response) -> Result<()> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    match status.as_u16() {
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(ChartError::RateLimited { retry_after })
        }
        code => Err(ChartError::Api {
            status: code,
            message: format!("Wikidot error: {status}"),
        }),
    }
}

/// Extract page summaries from a rendered ListPages body.
fn parse_pages(html: &str) -> Result<Vec<PageSummary>> {
    PAGE_PATTERN
        .captures_iter(html)
        .map(|caps| {
            let fullname = caps[1].trim().to_string();
            let rating = parse_rating(&caps[2]).ok_or_else(|| {
                ChartError::Parse(format!("bad rating {:?} for page {fullname}", &caps[2]))
            })?;
            Ok(PageSummary { fullname, rating })
        })
        .collect()
}

/// Ratings render as `12`, `+12`, `-3` or, on five-star sites, `3.5`.
fn parse_rating(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    raw.strip_prefix('+').unwrap_or(raw).parse().ok()
}
