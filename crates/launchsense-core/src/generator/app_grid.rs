//! App grid ranking.
//!
//! Orders the catalog with a stable multi-key sort: predicted apps first,
//! then routine category weight, usage count, recency and finally display
//! name. The output is always a permutation of the input catalog.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::model::{ActionPrediction, App, AppGridConfig, RoutineContext};

type WeightTable = &'static [(&'static str, f64)];

const MORNING: WeightTable = &[
    ("health", 0.9),
    ("productivity", 0.8),
    ("news", 0.7),
    ("communication", 0.6),
    ("music", 0.4),
];

const AFTERNOON: WeightTable = &[
    ("productivity", 0.9),
    ("communication", 0.8),
    ("news", 0.4),
    ("travel", 0.3),
];

const EVENING: WeightTable = &[
    ("entertainment", 0.9),
    ("video", 0.85),
    ("music", 0.8),
    ("social", 0.7),
    ("games", 0.6),
    ("health", 0.3),
];

const WEEKEND: WeightTable = &[
    ("social", 0.9),
    ("entertainment", 0.85),
    ("games", 0.8),
    ("photography", 0.7),
    ("travel", 0.7),
    ("shopping", 0.6),
];

fn weights_for(routine: RoutineContext) -> WeightTable {
    match routine {
        RoutineContext::Morning => MORNING,
        RoutineContext::Afternoon => AFTERNOON,
        RoutineContext::Evening => EVENING,
        RoutineContext::Weekend => WEEKEND,
        RoutineContext::Custom => &[],
    }
}

/// Routine weight of a category; 0 for unlisted or missing categories.
pub fn category_weight(routine: RoutineContext, category: Option<&str>) -> f64 {
    let Some(category) = category else {
        return 0.0;
    };
    let category = category.trim();
    weights_for(routine)
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(category))
        .map(|(_, weight)| *weight)
        .unwrap_or(0.0)
}

/// Package ids referenced by any prediction in the batch.
pub fn predicted_packages(predictions: &[ActionPrediction]) -> HashSet<String> {
    predictions
        .iter()
        .flat_map(|p| p.associated_apps.iter().map(|a| a.package_id.clone()))
        .collect()
}

fn compare(
    a: &App,
    b: &App,
    predicted: &HashSet<String>,
    routine: RoutineContext,
) -> Ordering {
    let is_predicted = |app: &App| predicted.contains(&app.package_id);
    is_predicted(b)
        .cmp(&is_predicted(a))
        .then_with(|| {
            category_weight(routine, b.category.as_deref())
                .total_cmp(&category_weight(routine, a.category.as_deref()))
        })
        .then_with(|| b.usage_count.cmp(&a.usage_count))
        // None sorts below Some, so missing timestamps land last.
        .then_with(|| b.last_used_at.cmp(&a.last_used_at))
        .then_with(|| a.display_name.cmp(&b.display_name))
}

/// Rank a catalog copy for a routine.
pub fn rank_apps(catalog: &[App], predicted: &HashSet<String>, routine: RoutineContext) -> Vec<App> {
    let mut apps = catalog.to_vec();
    apps.sort_by(|a, b| compare(a, b, predicted, routine));
    apps
}

/// App grid configuration for a routine and batch.
pub fn plan_app_grid(
    catalog: &[App],
    predictions: &[ActionPrediction],
    routine: RoutineContext,
) -> AppGridConfig {
    let predicted = predicted_packages(predictions);
    AppGridConfig {
        apps: rank_apps(catalog, &predicted, routine),
        highlight_predicted: !predicted.is_empty(),
        group_by_category: routine == RoutineContext::Weekend,
    }
}
