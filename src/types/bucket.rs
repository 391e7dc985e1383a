//! Object-class buckets and their fixed chart presentation.

use super::ChartBucket;

/// One of the four object-class groups the chart partitions ratings into.
///
/// Declaration order is the order the chart renders them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Safe,
    Euclid,
    Keter,
    Other,
}

/// Static presentation attached to a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketStyle {
    pub label: &'static str,
    pub color: &'static str,
    pub image1: &'static str,
    pub image2: &'static str,
    pub fallback_text: &'static str,
    pub fallback_text2: &'static str,
}

const SAFE_STYLE: BucketStyle = BucketStyle {
    label: "Safe",
    color: "#90ee90",
    image1: "https://scp-jp-storage.wdfiles.com/local--files/file%3A7737619-165-q25y/sehukun3.png",
    image2: "https://scp-jp-storage.wdfiles.com/local--files/file%3A7737619-166-f6v1/sehukun2.png",
    fallback_text: "Safe1",
    fallback_text2: "Safe2",
};

const EUCLID_STYLE: BucketStyle = BucketStyle {
    label: "Euclid",
    color: "#ffff00",
    image1: "https://scp-jp-storage.wdfiles.com/local--files/file%3A7737619-166-g6cv/yukuriddokun1.png",
    image2: "https://scp-jp-storage.wdfiles.com/local--files/file%3A7737619-166-bvj7/yujuriddokun2.png",
    fallback_text: "Euclid1",
    fallback_text2: "Euclid2",
};

const KETER_STYLE: BucketStyle = BucketStyle {
    label: "Keter",
    color: "#ff0000",
    image1: "https://scp-jp-storage.wdfiles.com/local--files/file%3A7737619-166-m7bg/keterukun1.png",
    image2: "https://scp-jp-storage.wdfiles.com/local--files/file%3A7737619-166-rinw/keterukun2.png",
    fallback_text: "Keter1",
    fallback_text2: "Keter2",
};

const OTHER_STYLE: BucketStyle = BucketStyle {
    label: "その他",
    color: "#ee82ee",
    image1: "https://scp-jp-storage.wdfiles.com/local--files/file%3A7737619-166-bdix/%E7%94%BB%E5%83%8F1.png",
    image2: "https://scp-jp-storage.wdfiles.com/local--files/file%3A7737619-166-p1mw/%E7%94%BB%E5%83%8F2.png",
    fallback_text: "Other1",
    fallback_text2: "Other2",
};

impl Bucket {
    /// All buckets in chart order.
    pub const ALL: [Bucket; 4] = [Bucket::Safe, Bucket::Euclid, Bucket::Keter, Bucket::Other];

    /// Stable lowercase name, used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Safe => "safe",
            Bucket::Euclid => "euclid",
            Bucket::Keter => "keter",
            Bucket::Other => "other",
        }
    }

    pub fn style(&self) -> &'static BucketStyle {
        match self {
            Bucket::Safe => &SAFE_STYLE,
            Bucket::Euclid => &EUCLID_STYLE,
            Bucket::Keter => &KETER_STYLE,
            Bucket::Other => &OTHER_STYLE,
        }
    }

    /// Build the chart record for this bucket with the given aggregate.
    pub fn chart_bucket(&self, value: f64) -> ChartBucket {
        let style = self.style();
        ChartBucket {
            label: style.label.to_string(),
            value,
            color: style.color.to_string(),
            image1: style.image1.to_string(),
            image2: style.image2.to_string(),
            fallback_text: style.fallback_text.to_string(),
            fallback_text2: style.fallback_text2.to_string(),
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
