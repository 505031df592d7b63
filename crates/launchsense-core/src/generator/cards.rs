//! Action card building.
//!
//! Splits a batch into primary and secondary cards, computes each card's
//! visual priority and attaches per-routine quick actions.

use std::sync::Arc;

use crate::analysis::BucketTable;
use crate::model::{ActionCard, ActionPrediction, QuickAction, QuickActionKind, RoutineContext};

/// Minimum confidence for a primary card.
pub const PRIMARY_THRESHOLD: f64 = 0.7;

/// Minimum confidence for a secondary card.
pub const SECONDARY_THRESHOLD: f64 = 0.4;

pub const MAX_PRIMARY: usize = 3;
pub const MAX_SECONDARY: usize = 4;
pub const MAX_QUICK_ACTIONS: usize = 2;

/// Visual-priority bonus for predictions in a routine's emphasis buckets.
pub const ROUTINE_BOOST: i32 = 2;

struct Template {
    label: &'static str,
    kind: QuickActionKind,
}

const fn t(label: &'static str, kind: QuickActionKind) -> Template {
    Template { label, kind }
}

type TemplateTable = &'static [(&'static str, &'static [Template])];

const MORNING: TemplateTable = &[
    (
        "meditat",
        &[
            t("Start 10 min timer", QuickActionKind::StartTimer { minutes: 10 }),
            t("Open guided session", QuickActionKind::OpenApp),
        ],
    ),
    (
        "workout",
        &[
            t("Start workout timer", QuickActionKind::StartTimer { minutes: 30 }),
            t("Play workout mix", QuickActionKind::PlayMedia),
        ],
    ),
    (
        "exercise",
        &[t("Start workout timer", QuickActionKind::StartTimer { minutes: 30 })],
    ),
    (
        "message",
        &[
            t("Quick reply", QuickActionKind::Compose),
            t("Open inbox", QuickActionKind::OpenApp),
        ],
    ),
    (
        "email",
        &[
            t("Quick reply", QuickActionKind::Compose),
            t("Open inbox", QuickActionKind::OpenApp),
        ],
    ),
    (
        "calendar",
        &[
            t("View agenda", QuickActionKind::OpenApp),
            t("Directions to first meeting", QuickActionKind::Navigate),
        ],
    ),
    ("news", &[t("Read headlines", QuickActionKind::OpenApp)]),
    ("work", &[t("Open workspace", QuickActionKind::OpenApp)]),
];

const AFTERNOON: TemplateTable = &[
    (
        "meeting",
        &[
            t("Directions to meeting", QuickActionKind::Navigate),
            t("Send running-late note", QuickActionKind::Compose),
        ],
    ),
    (
        "message",
        &[
            t("Quick reply", QuickActionKind::Compose),
            t("Open inbox", QuickActionKind::OpenApp),
        ],
    ),
    (
        "email",
        &[
            t("Quick reply", QuickActionKind::Compose),
            t("Open inbox", QuickActionKind::OpenApp),
        ],
    ),
    (
        "call",
        &[
            t("Call back", QuickActionKind::Call),
            t("Send a text instead", QuickActionKind::Compose),
        ],
    ),
    (
        "task",
        &[
            t("Start focus session", QuickActionKind::StartTimer { minutes: 25 }),
            t("Open task list", QuickActionKind::OpenApp),
        ],
    ),
    (
        "work",
        &[t("Start focus session", QuickActionKind::StartTimer { minutes: 25 })],
    ),
    (
        "lunch",
        &[
            t("Find nearby lunch", QuickActionKind::Navigate),
            t("Order food", QuickActionKind::OpenApp),
        ],
    ),
];

const EVENING: TemplateTable = &[
    (
        "music",
        &[
            t("Resume playlist", QuickActionKind::PlayMedia),
            t("Open player", QuickActionKind::OpenApp),
        ],
    ),
    (
        "watch",
        &[
            t("Continue watching", QuickActionKind::PlayMedia),
            t("Browse library", QuickActionKind::OpenApp),
        ],
    ),
    ("video", &[t("Continue watching", QuickActionKind::PlayMedia)]),
    (
        "meditat",
        &[
            t("Start wind-down timer", QuickActionKind::StartTimer { minutes: 15 }),
            t("Play sleep sounds", QuickActionKind::PlayMedia),
        ],
    ),
    (
        "sleep",
        &[
            t("Start wind-down timer", QuickActionKind::StartTimer { minutes: 15 }),
            t("Play sleep sounds", QuickActionKind::PlayMedia),
        ],
    ),
    (
        "friend",
        &[
            t("Call", QuickActionKind::Call),
            t("Send a message", QuickActionKind::Compose),
        ],
    ),
    (
        "family",
        &[
            t("Call", QuickActionKind::Call),
            t("Send a message", QuickActionKind::Compose),
        ],
    ),
];

const WEEKEND: TemplateTable = &[
    (
        "photo",
        &[
            t("Share latest photos", QuickActionKind::Share),
            t("Open gallery", QuickActionKind::OpenApp),
        ],
    ),
    ("game", &[t("Jump back in", QuickActionKind::OpenApp)]),
    (
        "workout",
        &[
            t("Start activity timer", QuickActionKind::StartTimer { minutes: 45 }),
            t("Play workout mix", QuickActionKind::PlayMedia),
        ],
    ),
    (
        "run",
        &[t("Start activity timer", QuickActionKind::StartTimer { minutes: 45 })],
    ),
    (
        "walk",
        &[t("Start activity timer", QuickActionKind::StartTimer { minutes: 45 })],
    ),
    ("music", &[t("Resume listening", QuickActionKind::PlayMedia)]),
    ("podcast", &[t("Resume listening", QuickActionKind::PlayMedia)]),
    (
        "friend",
        &[
            t("Post an update", QuickActionKind::Share),
            t("Message friends", QuickActionKind::Compose),
        ],
    ),
    ("post", &[t("Post an update", QuickActionKind::Share)]),
];

const CUSTOM: TemplateTable = &[
    ("focus", &[t("Start timer", QuickActionKind::StartTimer { minutes: 25 })]),
    ("timer", &[t("Start timer", QuickActionKind::StartTimer { minutes: 25 })]),
    ("message", &[t("Quick reply", QuickActionKind::Compose)]),
    ("music", &[t("Play music", QuickActionKind::PlayMedia)]),
];

fn templates_for(routine: RoutineContext) -> TemplateTable {
    match routine {
        RoutineContext::Morning => MORNING,
        RoutineContext::Afternoon => AFTERNOON,
        RoutineContext::Evening => EVENING,
        RoutineContext::Weekend => WEEKEND,
        RoutineContext::Custom => CUSTOM,
    }
}

/// Quick actions for a prediction under a routine, at most [`MAX_QUICK_ACTIONS`].
///
/// The table is walked in order and matching templates are appended until the
/// limit is reached; a label already taken is not repeated.
pub fn quick_actions(prediction: &ActionPrediction, routine: RoutineContext) -> Vec<QuickAction> {
    let lowered = prediction.action.to_lowercase();
    let target = prediction.associated_apps.first().map(|a| a.package_id.clone());

    let mut actions: Vec<QuickAction> = Vec::with_capacity(MAX_QUICK_ACTIONS);
    for (keyword, templates) in templates_for(routine) {
        if !lowered.contains(keyword) {
            continue;
        }
        for template in templates.iter() {
            if actions.len() == MAX_QUICK_ACTIONS {
                return actions;
            }
            if actions.iter().any(|a| a.label == template.label) {
                continue;
            }
            actions.push(QuickAction {
                label: template.label.to_string(),
                kind: template.kind,
                target_package: if template.kind.targets_app() {
                    target.clone()
                } else {
                    None
                },
            });
        }
    }
    actions
}

/// `clamp(round(confidence * 10) + boost, 1, 10)`.
pub fn visual_priority(confidence: f64, boosted: bool) -> u8 {
    let base = (confidence * 10.0).round() as i32;
    let boost = if boosted { ROUTINE_BOOST } else { 0 };
    (base + boost).clamp(1, 10) as u8
}

/// Predictions eligible for primary cards, highest confidence first, capped.
pub fn select_primary(predictions: &[ActionPrediction]) -> Vec<&ActionPrediction> {
    select(predictions, PRIMARY_THRESHOLD, f64::INFINITY, MAX_PRIMARY)
}

/// Predictions eligible for secondary cards, highest confidence first, capped.
pub fn select_secondary(predictions: &[ActionPrediction]) -> Vec<&ActionPrediction> {
    select(predictions, SECONDARY_THRESHOLD, PRIMARY_THRESHOLD, MAX_SECONDARY)
}

fn select(
    predictions: &[ActionPrediction],
    min: f64,
    below: f64,
    cap: usize,
) -> Vec<&ActionPrediction> {
    let mut eligible: Vec<&ActionPrediction> = predictions
        .iter()
        .filter(|p| p.confidence >= min && p.confidence < below)
        .collect();
    // Stable: equal confidences keep batch order.
    eligible.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    eligible.truncate(cap);
    eligible
}

/// Primary and secondary cards for one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionCards {
    pub primary: Vec<ActionCard>,
    pub secondary: Vec<ActionCard>,
}

/// Builds action cards for a routine.
#[derive(Debug, Clone, Default)]
pub struct ActionCardBuilder {
    buckets: Arc<BucketTable>,
}

impl ActionCardBuilder {
    pub fn new(buckets: Arc<BucketTable>) -> Self {
        Self { buckets }
    }

    pub fn build(&self, predictions: &[ActionPrediction], routine: RoutineContext) -> ActionCards {
        ActionCards {
            primary: select_primary(predictions)
                .into_iter()
                .map(|p| self.card(p, routine))
                .collect(),
            secondary: select_secondary(predictions)
                .into_iter()
                .map(|p| self.card(p, routine))
                .collect(),
        }
    }

    pub fn card(&self, prediction: &ActionPrediction, routine: RoutineContext) -> ActionCard {
        let boosted = routine.emphasizes(self.buckets.classify(&prediction.action));
        ActionCard {
            action: prediction.action.clone(),
            apps: prediction.associated_apps.clone(),
            confidence: prediction.confidence,
            quick_actions: quick_actions(prediction, routine),
            visual_priority: visual_priority(prediction.confidence, boosted),
            reasoning: prediction.reasoning.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::App;

    fn p(action: &str, confidence: f64) -> ActionPrediction {
        ActionPrediction::new(action, confidence)
    }

    #[test]
    fn test_primary_is_top_three_above_threshold() {
        let batch = vec![
            p("a", 0.71),
            p("b", 0.95),
            p("c", 0.7),
            p("d", 0.85),
            p("e", 0.69),
        ];
        let primary: Vec<&str> = select_primary(&batch).iter().map(|p| p.action.as_str()).collect();
        assert_eq!(primary, vec!["b", "d", "a"]);
    }

    #[test]
    fn test_secondary_excludes_primary_and_low() {
        let batch = vec![
            p("a", 0.69),
            p("b", 0.4),
            p("c", 0.39),
            p("d", 0.7),
            p("e", 0.55),
            p("f", 0.45),
            p("g", 0.6),
        ];
        let secondary: Vec<&str> =
            select_secondary(&batch).iter().map(|p| p.action.as_str()).collect();
        assert_eq!(secondary, vec!["a", "g", "e", "f"]);
    }

    #[test]
    fn test_equal_confidence_keeps_batch_order() {
        let batch = vec![p("first", 0.8), p("second", 0.8)];
        let primary: Vec<&str> = select_primary(&batch).iter().map(|p| p.action.as_str()).collect();
        assert_eq!(primary, vec!["first", "second"]);
    }

    #[test]
    fn test_visual_priority_clamps() {
        assert_eq!(visual_priority(0.89, true), 10);
        assert_eq!(visual_priority(0.75, false), 8);
        assert_eq!(visual_priority(0.0, false), 1);
        assert_eq!(visual_priority(0.44, true), 6);
    }

    #[test]
    fn test_meditation_gets_timer_in_morning() {
        let prediction = p("Start meditation", 0.9).with_apps(vec![App::new("com.headspace", "Headspace")]);
        let actions = quick_actions(&prediction, RoutineContext::Morning);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].kind, QuickActionKind::StartTimer { minutes: 10 });
        assert_eq!(actions[0].target_package, None);
        assert_eq!(actions[1].kind, QuickActionKind::OpenApp);
        assert_eq!(actions[1].target_package.as_deref(), Some("com.headspace"));
    }

    #[test]
    fn test_quick_actions_capped_and_deduplicated() {
        let prediction = p("Email about work messages", 0.9);
        let actions = quick_actions(&prediction, RoutineContext::Morning);
        let labels: Vec<&str> = actions.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Quick reply", "Open inbox"]);
    }

    #[test]
    fn test_no_quick_actions_without_keyword() {
        assert!(quick_actions(&p("Order groceries", 0.9), RoutineContext::Evening).is_empty());
    }

    #[test]
    fn test_builder_boosts_emphasized_bucket() {
        let builder = ActionCardBuilder::default();
        let cards = builder.build(
            &[p("Start meditation", 0.75), p("Play a game", 0.75)],
            RoutineContext::Morning,
        );
        assert_eq!(cards.primary[0].visual_priority, 10);
        assert_eq!(cards.primary[1].visual_priority, 8);
        assert!(cards.secondary.is_empty());
    }
}
