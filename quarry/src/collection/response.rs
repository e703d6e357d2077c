//! Response-side shapes the collection reads or produces

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bucket as returned by the engine; extra keys (sub-aggregations,
/// `key_as_string`, `from`/`to`) are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct RawBucket {
    pub key: Value,
    pub doc_count: u64,
}

/// Uniform bucket shape handed to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub title: Value,
    pub count: u64,
}

impl From<RawBucket> for BucketSummary {
    fn from(bucket: RawBucket) -> Self {
        Self {
            title: bucket.key,
            count: bucket.doc_count,
        }
    }
}

/// `hits.total` is a bare number on older engines and
/// `{"value": n, "relation": "eq"}` on newer ones
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) => *n,
            TotalHits::Object { value } => *value,
        }
    }
}
