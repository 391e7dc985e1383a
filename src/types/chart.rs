//! Chart payload types

use serde::{Deserialize, Serialize};

use super::Bucket;

/// One bar of the chart.
///
/// Field names follow the front-end's expectations (`fallbackText`,
/// `fallbackText2`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBucket {
    pub label: String,
    pub value: f64,
    pub color: String,
    pub image1: String,
    pub image2: String,
    pub fallback_text: String,
    pub fallback_text2: String,
}

/// Response body of the chart endpoint: one entry per bucket in
/// [`Bucket::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub data: Vec<ChartBucket>,
}

impl ChartData {
    /// Build chart data from per-bucket aggregates, in chart order.
    pub fn from_values(values: [f64; 4]) -> Self {
        let data = Bucket::ALL
            .iter()
            .zip(values)
            .map(|(bucket, value)| bucket.chart_bucket(value))
            .collect();
        Self { data }
    }

    /// Aggregate value for a bucket, if present.
    pub fn value(&self, bucket: Bucket) -> Option<f64> {
        let label = bucket.style().label;
        self.data.iter().find(|b| b.label == label).map(|b| b.value)
    }
}
