//! One-shot UI-state generation.

use std::path::Path;

use launchsense_core::{Config, RoutineContext, UiState, UiStateGenerator};

use crate::input;

pub fn run(
    config: &Config,
    routine: RoutineContext,
    predictions: &Path,
    catalog: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let predictions = input::predictions(predictions)?;
    let catalog = input::catalog(catalog)?;
    let generator = UiStateGenerator::new(config.classification.bucket_table()?);

    let generated = generator.generate_with_analysis(&predictions, routine, &catalog)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&generated.state)?);
    } else {
        print_state(&generated.state, generated.analysis.focus_level.name());
    }
    Ok(())
}

pub(crate) fn print_state(state: &UiState, focus: &str) {
    println!(
        "Theme: {} (hue {:.0}, saturation {:.2})",
        state.theme.name, state.theme.hue, state.theme.saturation
    );
    println!(
        "Layout: {} columns, spacing {:.1}, focus {focus}",
        state.layout.grid_columns, state.layout.adaptive_spacing
    );

    if state.layout.show_action_cards && !state.primary_actions.is_empty() {
        println!("Primary actions:");
        for card in &state.primary_actions {
            let quick: Vec<&str> = card.quick_actions.iter().map(|q| q.label.as_str()).collect();
            println!(
                "  [{:>2}] {} ({:.0}%) {}",
                card.visual_priority,
                card.action,
                card.confidence * 100.0,
                quick.join(" | ")
            );
        }
    }
    if !state.secondary_actions.is_empty() {
        println!("Secondary actions:");
        for card in &state.secondary_actions {
            println!("  {} ({:.0}%)", card.action, card.confidence * 100.0);
        }
    }
    if state.layout.show_widgets {
        let widgets: Vec<String> = state
            .visible_widgets()
            .map(|w| format!("{:?}", w.widget_type).to_lowercase())
            .collect();
        println!("Widgets: {}", widgets.join(", "));
    }

    let apps: Vec<&str> = state.app_grid.apps.iter().map(|a| a.display_name.as_str()).collect();
    if !apps.is_empty() {
        println!("Apps: {}", apps.join(", "));
    }
}
