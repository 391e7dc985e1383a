//! occon-chart - rating aggregation behind the OCCON 2025 chart
//!
//! This crate sums community ratings of contest entries on a Wikidot site,
//! grouped into four object-class buckets (Safe, Euclid, Keter, other), and
//! serves the result as chart data. Aggregations are expensive and
//! rate-limited upstream, so the latest one is cached for ten minutes.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use occon_chart::source::{WikidotClient, WikidotConfig};
//! use occon_chart::{ChartDataService, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> occon_chart::Result<()> {
//!     let source = WikidotClient::new(WikidotConfig::default())?;
//!     let service = ChartDataService::new(Arc::new(source), ServiceConfig::default());
//!
//!     let chart = service.get_chart_data(false).await?;
//!     for bucket in &chart.data {
//!         println!("{}: {}", bucket.label, bucket.value);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod clock;
pub mod error;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod source;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use error::{ChartError, Result};
pub use service::{ChartDataService, ServiceConfig};
pub use source::{ContentSource, SiteSession};
pub use version::{PKG_VERSION, version_string};

pub use types::{Bucket, BucketStyle, ChartBucket, ChartData, PageQuery, PageSummary};
