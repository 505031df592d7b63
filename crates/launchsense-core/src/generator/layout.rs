//! Layout density derived from routine and analysis.

use crate::analysis::{FocusLevel, PredictionAnalysis};
use crate::model::{LayoutConfig, RoutineContext};

pub const MIN_GRID_COLUMNS: u8 = 2;
pub const MAX_GRID_COLUMNS: u8 = 5;

/// Mean confidence above which action cards are worth showing.
const SHOW_CARDS_CONFIDENCE: f64 = 0.3;

const LAYOUT_CHANGE_TRANSITION_MS: u64 = 600;
const DEFAULT_TRANSITION_MS: u64 = 400;

pub fn base_columns(routine: RoutineContext) -> u8 {
    match routine {
        RoutineContext::Morning | RoutineContext::Evening => 3,
        RoutineContext::Afternoon | RoutineContext::Weekend | RoutineContext::Custom => 4,
    }
}

pub fn base_spacing(routine: RoutineContext) -> f64 {
    match routine {
        RoutineContext::Morning => 16.0,
        RoutineContext::Afternoon => 12.0,
        RoutineContext::Evening => 20.0,
        RoutineContext::Weekend => 18.0,
        RoutineContext::Custom => 14.0,
    }
}

/// Tighter spacing as more predictions compete for room.
pub fn density_factor(prediction_count: usize) -> f64 {
    match prediction_count {
        0..=3 => 1.0,
        4..=6 => 0.9,
        _ => 0.8,
    }
}

pub fn focus_factor(focus: FocusLevel) -> f64 {
    match focus {
        FocusLevel::High => 1.25,
        FocusLevel::Medium => 1.0,
        FocusLevel::Low => 0.85,
    }
}

/// Grid columns after the focus adjustment, within [2, 5].
pub fn grid_columns(routine: RoutineContext, focus: FocusLevel) -> u8 {
    let base = base_columns(routine) as i8;
    let adjusted = match focus {
        FocusLevel::High => base - 1,
        FocusLevel::Medium => base,
        FocusLevel::Low => base + 1,
    };
    adjusted.clamp(MIN_GRID_COLUMNS as i8, MAX_GRID_COLUMNS as i8) as u8
}

pub fn plan_layout(routine: RoutineContext, analysis: &PredictionAnalysis) -> LayoutConfig {
    let focus = analysis.focus_level;
    LayoutConfig {
        grid_columns: grid_columns(routine, focus),
        show_action_cards: !analysis.is_empty()
            && analysis.average_confidence > SHOW_CARDS_CONFIDENCE,
        show_widgets: focus != FocusLevel::High,
        adaptive_spacing: base_spacing(routine)
            * density_factor(analysis.prediction_count)
            * focus_factor(focus),
        transition_duration_ms: if analysis.requires_layout_change {
            LAYOUT_CHANGE_TRANSITION_MS
        } else {
            DEFAULT_TRANSITION_MS
        },
    }
}
