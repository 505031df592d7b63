//! Prediction batch analysis.
//!
//! Scores a batch against the active routine: confidence banding, mean
//! confidence, bucket diversity, routine alignment and the focus level the
//! rest of the pipeline keys off. Analyses are transient and recomputed for
//! every batch.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::buckets::{BucketTable, SemanticBucket};
use crate::model::{ActionPrediction, RoutineContext};

/// Lower bound of the high-confidence band.
pub const HIGH_CONFIDENCE: f64 = 0.8;

/// Lower bound of the medium-confidence band.
pub const MEDIUM_CONFIDENCE: f64 = 0.5;

/// Diversity below which the layout is rebuilt.
const LOW_DIVERSITY: f64 = 0.3;

/// How strongly the launcher should narrow its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusLevel {
    Low,
    Medium,
    High,
}

impl FocusLevel {
    /// Derive focus from mean confidence and routine alignment.
    ///
    /// The High gate is inclusive on confidence (it shares the 0.8 bound of
    /// the high band) and strict on alignment; Medium is strict on both.
    pub fn from_scores(average_confidence: f64, routine_alignment: f64) -> Self {
        if average_confidence >= HIGH_CONFIDENCE && routine_alignment > 0.7 {
            FocusLevel::High
        } else if average_confidence > 0.6 && routine_alignment > 0.5 {
            FocusLevel::Medium
        } else {
            FocusLevel::Low
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FocusLevel::Low => "low",
            FocusLevel::Medium => "medium",
            FocusLevel::High => "high",
        }
    }
}

/// Prediction counts per confidence band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceBands {
    /// confidence >= 0.8
    pub high: usize,
    /// 0.5 <= confidence < 0.8
    pub medium: usize,
    /// confidence < 0.5
    pub low: usize,
}

impl ConfidenceBands {
    pub fn from_predictions(predictions: &[ActionPrediction]) -> Self {
        predictions
            .iter()
            .fold(Self::default(), |mut bands, p| {
                if p.confidence >= HIGH_CONFIDENCE {
                    bands.high += 1;
                } else if p.confidence >= MEDIUM_CONFIDENCE {
                    bands.medium += 1;
                } else {
                    bands.low += 1;
                }
                bands
            })
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Summary of one prediction batch under one routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionAnalysis {
    pub bands: ConfidenceBands,
    pub average_confidence: f64,
    /// Distinct buckets present / total bucket count
    pub diversity: f64,
    /// Fraction of predictions in the routine's expected buckets
    pub routine_alignment: f64,
    pub focus_level: FocusLevel,
    pub requires_layout_change: bool,
    pub prediction_count: usize,
    /// Most frequent bucket; earlier table order breaks ties
    pub dominant_bucket: Option<SemanticBucket>,
}

impl PredictionAnalysis {
    /// Analysis of an empty batch.
    pub fn neutral() -> Self {
        Self {
            bands: ConfidenceBands::default(),
            average_confidence: 0.0,
            diversity: 0.0,
            routine_alignment: 0.0,
            focus_level: FocusLevel::Low,
            requires_layout_change: false,
            prediction_count: 0,
            dominant_bucket: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prediction_count == 0
    }
}

/// Analyzer for scoring prediction batches.
#[derive(Debug, Clone, Default)]
pub struct PredictionAnalyzer {
    buckets: Arc<BucketTable>,
}

impl PredictionAnalyzer {
    pub fn new(buckets: Arc<BucketTable>) -> Self {
        Self { buckets }
    }

    pub fn buckets(&self) -> &BucketTable {
        &self.buckets
    }

    /// Analyze a batch. Empty batches yield [`PredictionAnalysis::neutral`].
    pub fn analyze(
        &self,
        predictions: &[ActionPrediction],
        routine: RoutineContext,
    ) -> PredictionAnalysis {
        if predictions.is_empty() {
            return PredictionAnalysis::neutral();
        }

        let count = predictions.len() as f64;
        let average_confidence = predictions.iter().map(|p| p.confidence).sum::<f64>() / count;

        let buckets: Vec<SemanticBucket> = predictions
            .iter()
            .map(|p| self.buckets.classify(&p.action))
            .collect();

        let distinct: BTreeSet<SemanticBucket> = buckets.iter().copied().collect();
        let diversity = distinct.len() as f64 / SemanticBucket::ALL.len() as f64;

        let aligned = buckets.iter().filter(|b| routine.expects(**b)).count();
        let routine_alignment = aligned as f64 / count;

        let focus_level = FocusLevel::from_scores(average_confidence, routine_alignment);
        let requires_layout_change =
            average_confidence > HIGH_CONFIDENCE || diversity < LOW_DIVERSITY;

        PredictionAnalysis {
            bands: ConfidenceBands::from_predictions(predictions),
            average_confidence,
            diversity,
            routine_alignment,
            focus_level,
            requires_layout_change,
            prediction_count: predictions.len(),
            dominant_bucket: dominant_bucket(&buckets),
        }
    }
}

fn dominant_bucket(buckets: &[SemanticBucket]) -> Option<SemanticBucket> {
    let mut best: Option<(SemanticBucket, usize)> = None;
    for bucket in SemanticBucket::ALL {
        let n = buckets.iter().filter(|b| **b == bucket).count();
        if n > 0 && best.map_or(true, |(_, top)| n > top) {
            best = Some((bucket, n));
        }
    }
    best.map(|(bucket, _)| bucket)
}
