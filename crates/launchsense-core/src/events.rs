use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::UiState;

/// Why the updater emitted a new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateTrigger {
    /// First state of a session
    Initial,
    /// Batch arrived long enough after the previous update to apply at once
    Elapsed,
    /// Routine switch; always a full replacement
    RoutineChanged,
    /// Debounce window closed on the latest batch
    Debounced,
    /// Generation failed and an empty-batch or neutral state was used instead
    Fallback,
}

impl UpdateTrigger {
    pub fn name(&self) -> &'static str {
        match self {
            UpdateTrigger::Initial => "initial",
            UpdateTrigger::Elapsed => "elapsed",
            UpdateTrigger::RoutineChanged => "routine_changed",
            UpdateTrigger::Debounced => "debounced",
            UpdateTrigger::Fallback => "fallback",
        }
    }
}

/// Which parts of the state were replaced relative to the previous emission.
///
/// Parts not flagged are carried over from the previous snapshot unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub primary_actions: bool,
    pub secondary_actions: bool,
    pub widgets: bool,
    pub layout: bool,
    pub theme: bool,
    pub app_grid: bool,
}

impl ChangeSet {
    /// Every part replaced.
    pub fn full() -> Self {
        Self {
            primary_actions: true,
            secondary_actions: true,
            widgets: true,
            layout: true,
            theme: true,
            app_grid: true,
        }
    }

    pub fn is_full(&self) -> bool {
        *self == Self::full()
    }

    /// Names of the replaced parts, in state field order.
    pub fn replaced(&self) -> Vec<&'static str> {
        [
            ("primary_actions", self.primary_actions),
            ("secondary_actions", self.secondary_actions),
            ("widgets", self.widgets),
            ("layout", self.layout),
            ("theme", self.theme),
            ("app_grid", self.app_grid),
        ]
        .into_iter()
        .filter_map(|(name, replaced)| replaced.then_some(name))
        .collect()
    }
}

/// A state snapshot published to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    pub session_id: Uuid,
    /// Strictly increasing within a session
    pub version: u64,
    pub trigger: UpdateTrigger,
    pub changes: ChangeSet,
    pub state: Arc<UiState>,
}
