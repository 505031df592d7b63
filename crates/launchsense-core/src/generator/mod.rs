//! UI-state generators.
//!
//! Every function here is pure and safe to call from any thread. The
//! [`UiStateGenerator`] composes them into a complete [`crate::UiState`].

pub mod app_grid;
pub mod cards;
pub mod layout;
pub mod theme;
pub mod widgets;

mod state;

pub use app_grid::{plan_app_grid, rank_apps};
pub use cards::{ActionCardBuilder, ActionCards};
pub use layout::plan_layout;
pub use state::{Generated, UiStateGenerator};
pub use theme::{compose_theme, theme_name};
pub use widgets::plan_widgets;
