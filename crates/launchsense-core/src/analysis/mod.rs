//! Prediction analysis module.
//!
//! Classifies predicted actions into semantic buckets and summarises a batch
//! against the active routine.

mod analyzer;
mod buckets;

pub use analyzer::{
    ConfidenceBands, FocusLevel, PredictionAnalysis, PredictionAnalyzer, HIGH_CONFIDENCE,
    MEDIUM_CONFIDENCE,
};
pub use buckets::{BucketEntry, BucketTable, SemanticBucket};
