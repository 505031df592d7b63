//! Selective merge of a regenerated state into the previous snapshot.

use crate::analysis::PredictionAnalysis;
use crate::events::ChangeSet;
use crate::model::{ActionCard, UiState};

/// Confidence movement that forces a primary card refresh.
pub const CONFIDENCE_DELTA: f64 = 0.1;

/// Primary cards differ in size, action text at any position, or a
/// confidence moved by more than [`CONFIDENCE_DELTA`].
pub fn primary_changed(previous: &[ActionCard], next: &[ActionCard]) -> bool {
    previous.len() != next.len()
        || previous.iter().zip(next).any(|(a, b)| {
            a.action != b.action || (a.confidence - b.confidence).abs() > CONFIDENCE_DELTA
        })
}

/// Secondary cards differ in size or action text at any position.
pub fn secondary_changed(previous: &[ActionCard], next: &[ActionCard]) -> bool {
    previous.len() != next.len() || previous.iter().zip(next).any(|(a, b)| a.action != b.action)
}

/// Merge `next` into `previous`.
///
/// Widgets, app grid and theme always come from `next`. Card lists are only
/// replaced when they changed materially; layout only when the analysis asks
/// for a layout change.
pub fn merge(previous: &UiState, next: UiState, analysis: &PredictionAnalysis) -> (UiState, ChangeSet) {
    let primary = primary_changed(&previous.primary_actions, &next.primary_actions);
    let secondary = secondary_changed(&previous.secondary_actions, &next.secondary_actions);
    let layout = analysis.requires_layout_change;

    let changes = ChangeSet {
        primary_actions: primary,
        secondary_actions: secondary,
        widgets: next.widgets != previous.widgets,
        layout: layout && next.layout != previous.layout,
        theme: next.theme != previous.theme,
        app_grid: next.app_grid != previous.app_grid,
    };

    let merged = UiState {
        primary_actions: if primary {
            next.primary_actions
        } else {
            previous.primary_actions.clone()
        },
        secondary_actions: if secondary {
            next.secondary_actions
        } else {
            previous.secondary_actions.clone()
        },
        widgets: next.widgets,
        layout: if layout { next.layout } else { previous.layout.clone() },
        theme: next.theme,
        app_grid: next.app_grid,
    };

    (merged, changes)
}
