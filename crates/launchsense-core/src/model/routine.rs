//! Routine context: the time-of-day/activity mode the launcher is in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::SemanticBucket;
use crate::error::ParseRoutineError;

/// Routine the launcher is adapting to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineContext {
    Morning,
    Afternoon,
    Evening,
    Weekend,
    Custom,
}

impl RoutineContext {
    pub const ALL: [RoutineContext; 5] = [
        RoutineContext::Morning,
        RoutineContext::Afternoon,
        RoutineContext::Evening,
        RoutineContext::Weekend,
        RoutineContext::Custom,
    ];

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            RoutineContext::Morning => "morning",
            RoutineContext::Afternoon => "afternoon",
            RoutineContext::Evening => "evening",
            RoutineContext::Weekend => "weekend",
            RoutineContext::Custom => "custom",
        }
    }

    /// Buckets a prediction must fall in to count as aligned with this routine.
    ///
    /// `Custom` carries no expectation, so every bucket aligns.
    pub fn expected_buckets(&self) -> &'static [SemanticBucket] {
        use SemanticBucket::*;
        match self {
            RoutineContext::Morning => &[Wellness, Productivity, Communication],
            RoutineContext::Afternoon => &[Productivity, Communication],
            RoutineContext::Evening => &[Entertainment, Social, Wellness],
            RoutineContext::Weekend => &[Entertainment, Social, Wellness],
            RoutineContext::Custom => &SemanticBucket::ALL,
        }
    }

    /// Buckets whose cards get a visual-priority boost.
    pub fn emphasis_buckets(&self) -> &'static [SemanticBucket] {
        use SemanticBucket::*;
        match self {
            RoutineContext::Morning => &[Wellness, Productivity],
            RoutineContext::Afternoon => &[Productivity],
            RoutineContext::Evening => &[Entertainment, Social],
            RoutineContext::Weekend => &[Entertainment, Social],
            RoutineContext::Custom => &[],
        }
    }

    pub fn expects(&self, bucket: SemanticBucket) -> bool {
        self.expected_buckets().contains(&bucket)
    }

    pub fn emphasizes(&self, bucket: SemanticBucket) -> bool {
        self.emphasis_buckets().contains(&bucket)
    }
}

impl fmt::Display for RoutineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoutineContext {
    type Err = ParseRoutineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(RoutineContext::Morning),
            "afternoon" => Ok(RoutineContext::Afternoon),
            "evening" => Ok(RoutineContext::Evening),
            "weekend" => Ok(RoutineContext::Weekend),
            "custom" => Ok(RoutineContext::Custom),
            _ => Err(ParseRoutineError(s.to_string())),
        }
    }
}
