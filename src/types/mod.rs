//! Public types for the chart API.

mod bucket;
mod chart;
mod page;

pub use bucket::{Bucket, BucketStyle};
pub use chart::{ChartBucket, ChartData};
pub use page::{PageQuery, PageSummary};
