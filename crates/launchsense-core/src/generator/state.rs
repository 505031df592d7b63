//! UI-state generation.
//!
//! Composes the analyzer and the per-concern planners into one immutable
//! [`UiState`]. Generation is pure: identical inputs give equal states.

use std::sync::Arc;

use tracing::debug;

use super::app_grid::plan_app_grid;
use super::cards::ActionCardBuilder;
use super::layout::plan_layout;
use super::theme::compose_theme;
use super::widgets::plan_widgets;
use crate::analysis::{BucketTable, PredictionAnalysis, PredictionAnalyzer};
use crate::error::GenerationError;
use crate::model::{ActionPrediction, App, RoutineContext, UiState};

/// A generated state together with the analysis it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub state: UiState,
    pub analysis: PredictionAnalysis,
}

/// Builds [`UiState`] snapshots from predictions, routine and catalog.
#[derive(Debug, Clone, Default)]
pub struct UiStateGenerator {
    analyzer: PredictionAnalyzer,
    cards: ActionCardBuilder,
}

impl UiStateGenerator {
    pub fn new(buckets: Arc<BucketTable>) -> Self {
        Self {
            analyzer: PredictionAnalyzer::new(Arc::clone(&buckets)),
            cards: ActionCardBuilder::new(buckets),
        }
    }

    pub fn analyzer(&self) -> &PredictionAnalyzer {
        &self.analyzer
    }

    pub fn analyze(
        &self,
        predictions: &[ActionPrediction],
        routine: RoutineContext,
    ) -> PredictionAnalysis {
        self.analyzer.analyze(predictions, routine)
    }

    /// Generate a state, rejecting corrupt predictions or catalog entries.
    pub fn generate(
        &self,
        predictions: &[ActionPrediction],
        routine: RoutineContext,
        catalog: &[App],
    ) -> Result<UiState, GenerationError> {
        self.generate_with_analysis(predictions, routine, catalog)
            .map(|generated| generated.state)
    }

    pub fn generate_with_analysis(
        &self,
        predictions: &[ActionPrediction],
        routine: RoutineContext,
        catalog: &[App],
    ) -> Result<Generated, GenerationError> {
        predictions.iter().try_for_each(ActionPrediction::validate)?;
        catalog.iter().try_for_each(App::validate)?;

        let analysis = self.analyzer.analyze(predictions, routine);
        let cards = self.cards.build(predictions, routine);
        let state = UiState {
            primary_actions: cards.primary,
            secondary_actions: cards.secondary,
            widgets: plan_widgets(routine, predictions, analysis.focus_level),
            layout: plan_layout(routine, &analysis),
            theme: compose_theme(routine, analysis.focus_level),
            app_grid: plan_app_grid(catalog, predictions, routine),
        };

        debug!(
            %routine,
            predictions = predictions.len(),
            focus = analysis.focus_level.name(),
            primary = state.primary_actions.len(),
            secondary = state.secondary_actions.len(),
            "generated ui state"
        );

        Ok(Generated { state, analysis })
    }

    /// State for an empty batch over the valid part of the catalog. Never fails.
    pub fn neutral(&self, routine: RoutineContext, catalog: &[App]) -> Generated {
        let valid: Vec<App> = catalog.iter().filter(|a| a.validate().is_ok()).cloned().collect();
        let analysis = PredictionAnalysis::neutral();
        let state = UiState {
            primary_actions: Vec::new(),
            secondary_actions: Vec::new(),
            widgets: plan_widgets(routine, &[], analysis.focus_level),
            layout: plan_layout(routine, &analysis),
            theme: compose_theme(routine, analysis.focus_level),
            app_grid: plan_app_grid(&valid, &[], routine),
        };
        Generated { state, analysis }
    }
}
