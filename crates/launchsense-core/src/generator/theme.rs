//! Theme composition from routine and focus level.

use crate::analysis::FocusLevel;
use crate::model::{RoutineContext, ThemeConfig};

/// Theme name a routine produces. Focus never changes the name.
pub fn theme_name(routine: RoutineContext) -> &'static str {
    match routine {
        RoutineContext::Morning => "Morning Fresh",
        RoutineContext::Afternoon => "Afternoon Focus",
        RoutineContext::Evening => "Evening Calm",
        RoutineContext::Weekend => "Weekend Relaxed",
        RoutineContext::Custom => "Custom Balanced",
    }
}

/// Unmodified theme for a routine.
pub fn base_theme(routine: RoutineContext) -> ThemeConfig {
    // (hue, saturation, brightness, elevation, corner radius)
    let (hue, saturation, brightness, card_elevation, corner_radius) = match routine {
        RoutineContext::Morning => (45.0, 0.70, 0.95, 4.0, 16.0),
        RoutineContext::Afternoon => (210.0, 0.60, 0.90, 3.0, 12.0),
        RoutineContext::Evening => (260.0, 0.50, 0.60, 2.0, 20.0),
        RoutineContext::Weekend => (140.0, 0.65, 0.85, 3.0, 24.0),
        RoutineContext::Custom => (180.0, 0.50, 0.80, 3.0, 12.0),
    };
    ThemeConfig {
        name: theme_name(routine).to_string(),
        hue,
        saturation,
        brightness,
        card_elevation,
        corner_radius,
    }
}

/// Routine theme adjusted for focus.
///
/// High focus is calmer (less saturation, more elevation and rounding); low
/// focus is livelier (more saturation, flatter, tighter corners).
pub fn compose_theme(routine: RoutineContext, focus: FocusLevel) -> ThemeConfig {
    let base = base_theme(routine);
    let (saturation_scale, elevation_delta, radius_delta) = match focus {
        FocusLevel::High => (0.8, 2.0, 4.0),
        FocusLevel::Medium => (1.0, 0.0, 0.0),
        FocusLevel::Low => (1.2, -1.0, -2.0),
    };
    ThemeConfig {
        hue: base.hue.clamp(0.0, 360.0),
        saturation: (base.saturation * saturation_scale).clamp(0.0, 1.0),
        brightness: base.brightness.clamp(0.0, 1.0),
        card_elevation: (base.card_elevation + elevation_delta).max(0.0),
        corner_radius: (base.corner_radius + radius_delta).max(0.0),
        ..base
    }
}
