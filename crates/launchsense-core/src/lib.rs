//! # Launchsense Core Library
//!
//! This library turns ranked action predictions into the complete visual
//! state of an adaptive launcher home screen, and keeps that state current
//! as new prediction batches stream in. Renderers only ever receive whole
//! immutable [`UiState`] snapshots.
//!
//! ## Architecture
//!
//! - **Analysis**: Classifies predicted actions into semantic buckets and
//!   scores each batch against the active routine
//! - **Generators**: Pure planners for action cards, widgets, theme, layout
//!   and the app grid, composed by [`UiStateGenerator`]
//! - **Updater**: Debounced, selective regeneration owned by a single tokio
//!   task ([`UpdaterService`])
//! - **Config**: TOML-based tunables
//!
//! ## Key Components
//!
//! - [`PredictionAnalyzer`]: Batch scoring and focus level
//! - [`UiStateGenerator`]: Full state generation
//! - [`IncrementalUpdater`]: Synchronous update decisions
//! - [`UpdaterService`]: Async update task and its handle
//! - [`Config`]: Application configuration management

pub mod analysis;
pub mod config;
pub mod error;
pub mod events;
pub mod generator;
pub mod model;
pub mod updater;

pub use analysis::{
    BucketTable, ConfidenceBands, FocusLevel, PredictionAnalysis, PredictionAnalyzer,
    SemanticBucket,
};
pub use config::{ClassificationConfig, Config, LoggingConfig, UpdaterConfig};
pub use error::{ConfigError, CoreError, GenerationError, ParseRoutineError, UpdaterError};
pub use events::{ChangeSet, Emission, UpdateTrigger};
pub use generator::{Generated, UiStateGenerator};
pub use model::{
    ActionCard, ActionPrediction, App, AppGridConfig, LayoutConfig, PredictionBatch, QuickAction,
    QuickActionKind, RoutineContext, ThemeConfig, UiState, WidgetConfig, WidgetType,
};
pub use updater::{
    CatalogProvider, Decision, IncrementalUpdater, StaticCatalog, UpdatePolicy, UpdaterHandle,
    UpdaterService,
};
