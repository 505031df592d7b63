//! JSON input files.

use std::path::Path;

use launchsense_core::{ActionPrediction, App, RoutineContext};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// One step of a replay script.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayStep {
    /// Delay from the start of the replay
    pub offset_ms: u64,
    /// Routine for this batch; the replay's `--routine` when absent
    #[serde(default)]
    pub routine: Option<RoutineContext>,
    #[serde(default)]
    pub predictions: Vec<ActionPrediction>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| format!("invalid JSON in {}: {e}", path.display()))?;
    Ok(value)
}

pub fn predictions(path: &Path) -> Result<Vec<ActionPrediction>, Box<dyn std::error::Error>> {
    read_json(path)
}

/// App catalog, empty when no file is given.
pub fn catalog(path: Option<&Path>) -> Result<Vec<App>, Box<dyn std::error::Error>> {
    path.map_or_else(|| Ok(Vec::new()), read_json)
}

pub fn replay_steps(path: &Path) -> Result<Vec<ReplayStep>, Box<dyn std::error::Error>> {
    let mut steps: Vec<ReplayStep> = read_json(path)?;
    steps.sort_by_key(|s| s.offset_ms);
    Ok(steps)
}
