//! Rendered launcher configuration.
//!
//! A [`UiState`] is an immutable snapshot. Every regeneration produces a new
//! value; the updater shares snapshots behind `Arc` and never mutates one.

use serde::{Deserialize, Serialize};

use super::prediction::App;

/// What a quick action does when tapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuickActionKind {
    StartTimer { minutes: u32 },
    OpenApp,
    Compose,
    Call,
    PlayMedia,
    Navigate,
    Share,
}

impl QuickActionKind {
    /// Whether the action needs an app to run in.
    pub fn targets_app(&self) -> bool {
        !matches!(self, QuickActionKind::StartTimer { .. } | QuickActionKind::Navigate)
    }
}

/// Shortcut button rendered on an action card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAction {
    pub label: String,
    pub kind: QuickActionKind,
    /// Package the action launches into, when it needs one
    #[serde(default)]
    pub target_package: Option<String>,
}

/// A card presenting one predicted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCard {
    pub action: String,
    pub apps: Vec<App>,
    pub confidence: f64,
    pub quick_actions: Vec<QuickAction>,
    /// 1 (subtle) to 10 (most prominent)
    pub visual_priority: u8,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetType {
    Clock,
    Weather,
    Calendar,
    News,
    Fitness,
    Tasks,
    Messages,
    Suggestions,
    Media,
    Music,
    Social,
    Photos,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    /// Lower is more important
    pub priority: u8,
    pub is_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Always within [2, 5]
    pub grid_columns: u8,
    pub show_action_cards: bool,
    pub show_widgets: bool,
    pub adaptive_spacing: f64,
    pub transition_duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    /// Degrees, [0, 360]
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
    pub card_elevation: f64,
    pub corner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppGridConfig {
    /// Catalog in ranked order
    pub apps: Vec<App>,
    pub highlight_predicted: bool,
    pub group_by_category: bool,
}

/// Complete visual configuration handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    pub primary_actions: Vec<ActionCard>,
    pub secondary_actions: Vec<ActionCard>,
    pub widgets: Vec<WidgetConfig>,
    pub layout: LayoutConfig,
    pub theme: ThemeConfig,
    pub app_grid: AppGridConfig,
}

impl UiState {
    pub fn visible_widgets(&self) -> impl Iterator<Item = &WidgetConfig> {
        self.widgets.iter().filter(|w| w.is_visible)
    }

    /// Primary cards first, then secondary.
    pub fn all_cards(&self) -> impl Iterator<Item = &ActionCard> {
        self.primary_actions.iter().chain(self.secondary_actions.iter())
    }
}
