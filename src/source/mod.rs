//! Content sources the chart aggregates over.
//!
//! The service only talks to [`ContentSource`]; [`WikidotClient`] is the
//! production implementation. Tests substitute their own sources.

pub mod traits;
pub mod wikidot;

pub use traits::{ContentSource, SiteSession};
pub use wikidot::{WikidotClient, WikidotConfig};
