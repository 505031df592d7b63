//! Data model shared by the generators and the updater.

mod prediction;
mod routine;
mod ui;

pub use prediction::{ActionPrediction, App, PredictionBatch};
pub use routine::RoutineContext;
pub use ui::{
    ActionCard, AppGridConfig, LayoutConfig, QuickAction, QuickActionKind, ThemeConfig, UiState,
    WidgetConfig, WidgetType,
};
