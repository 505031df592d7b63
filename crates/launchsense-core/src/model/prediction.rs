//! Prediction and catalog types consumed at the boundary.
//!
//! Predictions are produced upstream and apps are owned by an external
//! catalog; the core only reads them and re-orders copies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::routine::RoutineContext;
use crate::error::GenerationError;

/// An installed app as reported by the catalog provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    /// Platform package identifier (e.g. "com.slack")
    pub package_id: String,
    /// Label shown under the icon
    pub display_name: String,
    /// Store category, if known
    #[serde(default)]
    pub category: Option<String>,
    /// Launch count reported by the catalog
    #[serde(default)]
    pub usage_count: u64,
    /// Last launch time, if the app was ever opened
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl App {
    /// Create an app with no category and no usage history.
    pub fn new(package_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
            display_name: display_name.into(),
            category: None,
            usage_count: 0,
            last_used_at: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_usage(mut self, usage_count: u64) -> Self {
        self.usage_count = usage_count;
        self
    }

    pub fn with_last_used(mut self, at: DateTime<Utc>) -> Self {
        self.last_used_at = Some(at);
        self
    }

    /// Reject entries the ranker cannot place.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.package_id.trim().is_empty() {
            return Err(GenerationError::MissingPackageId {
                display_name: self.display_name.clone(),
            });
        }
        if self.display_name.trim().is_empty() {
            return Err(GenerationError::MissingDisplayName {
                package_id: self.package_id.clone(),
            });
        }
        Ok(())
    }
}

/// A predicted next action with the apps that can fulfil it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPrediction {
    /// Human-readable action ("Start meditation")
    pub action: String,
    /// Model confidence in [0, 1]
    pub confidence: f64,
    #[serde(default)]
    pub associated_apps: Vec<App>,
    #[serde(default)]
    pub reasoning: String,
    /// Upstream rank hint; informational only
    #[serde(default)]
    pub priority: i32,
}

impl ActionPrediction {
    pub fn new(action: impl Into<String>, confidence: f64) -> Self {
        Self {
            action: action.into(),
            confidence,
            associated_apps: Vec::new(),
            reasoning: String::new(),
            priority: 0,
        }
    }

    pub fn with_apps(mut self, apps: Vec<App>) -> Self {
        self.associated_apps = apps;
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Check confidence range and every associated app.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(GenerationError::InvalidConfidence {
                action: self.action.clone(),
                value: self.confidence,
            });
        }
        self.associated_apps.iter().try_for_each(App::validate)
    }
}

/// One delivery from the prediction source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionBatch {
    pub routine: RoutineContext,
    #[serde(default)]
    pub predictions: Vec<ActionPrediction>,
}

impl PredictionBatch {
    pub fn new(routine: RoutineContext, predictions: Vec<ActionPrediction>) -> Self {
        Self {
            routine,
            predictions,
        }
    }

    pub fn empty(routine: RoutineContext) -> Self {
        Self::new(routine, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}
