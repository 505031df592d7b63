//! Property tests for card selection, layout and app ranking.

use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use launchsense_core::generator::app_grid::rank_apps;
use launchsense_core::generator::cards::{select_primary, select_secondary};
use launchsense_core::generator::layout::{MAX_GRID_COLUMNS, MIN_GRID_COLUMNS};
use launchsense_core::{ActionPrediction, App, FocusLevel, RoutineContext, UiStateGenerator};
use proptest::prelude::*;

const ACTIONS: &[&str] = &[
    "Start meditation",
    "Check work messages",
    "Watch a movie",
    "Call a friend",
    "Plan the week",
    "Share photos",
    "Go for a run",
    "Read the news",
];

const CATEGORIES: &[&str] = &[
    "health",
    "productivity",
    "communication",
    "entertainment",
    "social",
    "games",
    "finance",
];

fn routine() -> impl Strategy<Value = RoutineContext> {
    prop::sample::select(RoutineContext::ALL.to_vec())
}

fn prediction() -> impl Strategy<Value = ActionPrediction> {
    (prop::sample::select(ACTIONS.to_vec()), 0.0f64..=1.0)
        .prop_map(|(action, confidence)| ActionPrediction::new(action, confidence))
}

fn app(index: usize) -> impl Strategy<Value = App> {
    (
        prop::option::of(prop::sample::select(CATEGORIES.to_vec())),
        0u64..20,
        prop::option::of(0i64..1_000),
        "[A-E][a-z]{0,3}",
    )
        .prop_map(move |(category, usage, last_used, name)| {
            let mut app = App::new(format!("pkg.{index}"), name).with_usage(usage);
            if let Some(category) = category {
                app = app.with_category(category);
            }
            if let Some(minutes) = last_used {
                let at: DateTime<Utc> = Utc.timestamp_opt(1_700_000_000 + minutes * 60, 0).unwrap();
                app = app.with_last_used(at);
            }
            app
        })
}

fn catalog() -> impl Strategy<Value = Vec<App>> {
    (0usize..12).prop_flat_map(|len| (0..len).map(app).collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn primary_cards_are_top_three_above_threshold(predictions in prop::collection::vec(prediction(), 0..10)) {
        let primary = select_primary(&predictions);
        let eligible = predictions.iter().filter(|p| p.confidence >= 0.7).count();

        prop_assert_eq!(primary.len(), eligible.min(3));
        prop_assert!(primary.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        for chosen in &primary {
            prop_assert!(chosen.confidence >= 0.7);
            let better = predictions.iter().filter(|p| p.confidence > chosen.confidence).count();
            prop_assert!(better < 3);
        }
    }

    #[test]
    fn secondary_cards_exclude_low_and_primary(predictions in prop::collection::vec(prediction(), 0..12)) {
        let secondary = select_secondary(&predictions);
        let eligible = predictions
            .iter()
            .filter(|p| p.confidence >= 0.4 && p.confidence < 0.7)
            .count();

        prop_assert_eq!(secondary.len(), eligible.min(4));
        for chosen in &secondary {
            prop_assert!(chosen.confidence >= 0.4 && chosen.confidence < 0.7);
        }
    }

    #[test]
    fn grid_columns_stay_in_range(routine in routine(), predictions in prop::collection::vec(prediction(), 0..10)) {
        let state = UiStateGenerator::default().generate(&predictions, routine, &[]).unwrap();
        prop_assert!((MIN_GRID_COLUMNS..=MAX_GRID_COLUMNS).contains(&state.layout.grid_columns));
    }

    #[test]
    fn generation_is_deterministic(
        routine in routine(),
        predictions in prop::collection::vec(prediction(), 0..8),
        apps in catalog(),
    ) {
        let generator = UiStateGenerator::default();
        let a = generator.generate(&predictions, routine, &apps).unwrap();
        let b = generator.generate(&predictions, routine, &apps).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn ranking_is_a_stable_permutation(routine in routine(), apps in catalog()) {
        let ranked = rank_apps(&apps, &HashSet::new(), routine);

        let mut before: Vec<&str> = apps.iter().map(|a| a.package_id.as_str()).collect();
        let mut after: Vec<&str> = ranked.iter().map(|a| a.package_id.as_str()).collect();
        before.sort_unstable();
        after.sort_unstable();
        prop_assert_eq!(before, after);

        let again = rank_apps(&ranked, &HashSet::new(), routine);
        prop_assert_eq!(again, ranked);
    }

    #[test]
    fn predicted_apps_always_lead(routine in routine(), apps in catalog(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!apps.is_empty());
        let chosen = pick.get(&apps).package_id.clone();
        let predicted: HashSet<String> = [chosen.clone()].into_iter().collect();

        let ranked = rank_apps(&apps, &predicted, routine);
        prop_assert_eq!(&ranked[0].package_id, &chosen);
    }

    #[test]
    fn focus_gate_boundaries(alignment in 0.0f64..=1.0) {
        let level = FocusLevel::from_scores(0.8, alignment);
        prop_assert_eq!(level == FocusLevel::High, alignment > 0.7);
    }
}

#[test]
fn focus_boundary_examples() {
    assert_eq!(FocusLevel::from_scores(0.8, 0.71), FocusLevel::High);
    assert_ne!(FocusLevel::from_scores(0.8, 0.70), FocusLevel::High);
}
