//! Widget planning: per-routine base sets pruned by focus level.

use crate::analysis::FocusLevel;
use crate::model::{ActionPrediction, RoutineContext, WidgetConfig, WidgetType};

/// Initial visibility rule of a base widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Always,
    WhenAny,
    WhenMoreThan(usize),
}

impl Visibility {
    fn resolve(self, prediction_count: usize) -> bool {
        match self {
            Visibility::Always => true,
            Visibility::WhenAny => prediction_count > 0,
            Visibility::WhenMoreThan(n) => prediction_count > n,
        }
    }
}

type BaseSet = &'static [(WidgetType, u8, Visibility)];

const MORNING: BaseSet = &[
    (WidgetType::Clock, 1, Visibility::Always),
    (WidgetType::Weather, 2, Visibility::Always),
    (WidgetType::Calendar, 3, Visibility::Always),
    (WidgetType::Suggestions, 4, Visibility::WhenAny),
    (WidgetType::Fitness, 5, Visibility::Always),
];

const AFTERNOON: BaseSet = &[
    (WidgetType::Calendar, 1, Visibility::Always),
    (WidgetType::Tasks, 2, Visibility::Always),
    (WidgetType::Messages, 3, Visibility::Always),
    (WidgetType::Suggestions, 4, Visibility::WhenMoreThan(2)),
    (WidgetType::Weather, 5, Visibility::Always),
];

const EVENING: BaseSet = &[
    (WidgetType::Media, 1, Visibility::Always),
    (WidgetType::Music, 2, Visibility::Always),
    (WidgetType::Social, 3, Visibility::WhenAny),
    (WidgetType::Weather, 4, Visibility::Always),
    (WidgetType::Photos, 5, Visibility::Always),
];

const WEEKEND: BaseSet = &[
    (WidgetType::Weather, 1, Visibility::Always),
    (WidgetType::Photos, 2, Visibility::Always),
    (WidgetType::Social, 3, Visibility::Always),
    (WidgetType::Music, 4, Visibility::Always),
    (WidgetType::Suggestions, 5, Visibility::WhenMoreThan(3)),
];

const CUSTOM: BaseSet = &[
    (WidgetType::Clock, 1, Visibility::Always),
    (WidgetType::Suggestions, 2, Visibility::WhenAny),
    (WidgetType::Calendar, 3, Visibility::Always),
    (WidgetType::Weather, 4, Visibility::Always),
];

fn base_set(routine: RoutineContext) -> BaseSet {
    match routine {
        RoutineContext::Morning => MORNING,
        RoutineContext::Afternoon => AFTERNOON,
        RoutineContext::Evening => EVENING,
        RoutineContext::Weekend => WEEKEND,
        RoutineContext::Custom => CUSTOM,
    }
}

/// Base widget list for a routine, ordered by ascending priority.
pub fn base_widgets(routine: RoutineContext, prediction_count: usize) -> Vec<WidgetConfig> {
    base_set(routine)
        .iter()
        .map(|(widget_type, priority, visibility)| WidgetConfig {
            widget_type: *widget_type,
            priority: *priority,
            is_visible: visibility.resolve(prediction_count),
        })
        .collect()
}

/// Hide widgets the focus level has no room for.
///
/// High keeps visible widgets with priority <= 2, Medium keeps visible
/// widgets with priority <= 3, Low leaves the base visibility alone. Pruning
/// never reveals a widget, so visible counts fall as focus rises.
pub fn prune_for_focus(widgets: Vec<WidgetConfig>, focus: FocusLevel) -> Vec<WidgetConfig> {
    let max_priority = match focus {
        FocusLevel::High => 2,
        FocusLevel::Medium => 3,
        FocusLevel::Low => return widgets,
    };
    widgets
        .into_iter()
        .map(|w| WidgetConfig {
            is_visible: w.is_visible && w.priority <= max_priority,
            ..w
        })
        .collect()
}

/// Widget set for a routine and batch under a focus level.
pub fn plan_widgets(
    routine: RoutineContext,
    predictions: &[ActionPrediction],
    focus: FocusLevel,
) -> Vec<WidgetConfig> {
    prune_for_focus(base_widgets(routine, predictions.len()), focus)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible(widgets: &[WidgetConfig]) -> Vec<WidgetType> {
        widgets.iter().filter(|w| w.is_visible).map(|w| w.widget_type).collect()
    }

    #[test]
    fn test_base_lists_sorted_by_priority() {
        for routine in RoutineContext::ALL {
            let widgets = base_widgets(routine, 5);
            assert!(widgets.windows(2).all(|w| w[0].priority <= w[1].priority));
        }
    }

    #[test]
    fn test_conditional_visibility() {
        let empty = base_widgets(RoutineContext::Morning, 0);
        assert!(!visible(&empty).contains(&WidgetType::Suggestions));
        let some = base_widgets(RoutineContext::Morning, 1);
        assert!(visible(&some).contains(&WidgetType::Suggestions));

        assert!(!visible(&base_widgets(RoutineContext::Afternoon, 2)).contains(&WidgetType::Suggestions));
        assert!(visible(&base_widgets(RoutineContext::Afternoon, 3)).contains(&WidgetType::Suggestions));
    }

    #[test]
    fn test_focus_pruning() {
        let predictions = vec![ActionPrediction::new("x", 0.9)];
        let high = plan_widgets(RoutineContext::Morning, &predictions, FocusLevel::High);
        assert_eq!(visible(&high), vec![WidgetType::Clock, WidgetType::Weather]);
        let medium = plan_widgets(RoutineContext::Morning, &predictions, FocusLevel::Medium);
        assert_eq!(
            visible(&medium),
            vec![WidgetType::Clock, WidgetType::Weather, WidgetType::Calendar]
        );
        let low = plan_widgets(RoutineContext::Morning, &predictions, FocusLevel::Low);
        assert_eq!(visible(&low).len(), 5);
        assert_eq!(high.len(), 5, "pruning hides widgets, it does not drop them");
    }

    #[test]
    fn test_high_focus_never_reveals_hidden_widget() {
        let widgets = plan_widgets(RoutineContext::Custom, &[], FocusLevel::High);
        assert_eq!(visible(&widgets), vec![WidgetType::Clock]);
    }

    #[test]
    fn test_visible_count_monotonic_in_focus() {
        for routine in RoutineContext::ALL {
            for count in 0..6 {
                let predictions: Vec<_> =
                    (0..count).map(|i| ActionPrediction::new(format!("p{i}"), 0.5)).collect();
                let n = |focus| visible(&plan_widgets(routine, &predictions, focus)).len();
                assert!(n(FocusLevel::Low) >= n(FocusLevel::Medium));
                assert!(n(FocusLevel::Medium) >= n(FocusLevel::High));
            }
        }
    }
}
