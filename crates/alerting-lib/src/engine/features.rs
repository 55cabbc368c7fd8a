//! Feature encoding for the outlier model
//!
//! Turns a metric sample into a fixed-length numeric vector: raw value,
//! hour and minute of the sample timestamp, and bounded integer codes for
//! the categorical metric type and host fields.

use crate::models::MetricSample;
use chrono::Timelike;

/// Number of features in an encoded vector
pub const NUM_FEATURES: usize = 5;

/// Encoded feature vector consumed by the outlier model
pub type FeatureVector = [f64; NUM_FEATURES];

/// Categorical codes are reduced to this range; collisions are acceptable
/// since the codes only add a discriminative signal, not identity.
const CATEGORY_BUCKETS: u64 = 1000;

/// Encode a sample into its feature vector
pub fn encode(sample: &MetricSample) -> FeatureVector {
    [
        sample.metric_value,
        sample.timestamp.hour() as f64,
        sample.timestamp.minute() as f64,
        category_code(sample.metric_type.as_str()),
        category_code(&sample.host),
    ]
}

/// Deterministic bounded code for a categorical string. FNV-1a keeps the
/// mapping stable across calls and processes, unlike the std hasher.
fn category_code(value: &str) -> f64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in value.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    (hash % CATEGORY_BUCKETS) as f64
}
