//! Incremental update state machine.
//!
//! Decides, per incoming batch, whether to apply it immediately, hold it
//! for the debounce window, or drop it. Time is passed in explicitly as
//! milliseconds on a monotonic clock, so the machine has no timers of its
//! own; the service task owns the actual sleep.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::diff::merge;
use crate::config::UpdaterConfig;
use crate::events::{ChangeSet, Emission, UpdateTrigger};
use crate::generator::{theme_name, Generated, UiStateGenerator};
use crate::model::{ActionPrediction, App, PredictionBatch, RoutineContext, UiState};

/// Timing rules for incoming batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatePolicy {
    pub debounce_ms: u64,
    /// A batch arriving more than this long after the last update applies at once
    pub immediate_after_ms: u64,
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            immediate_after_ms: 2000,
        }
    }
}

impl From<&UpdaterConfig> for UpdatePolicy {
    fn from(config: &UpdaterConfig) -> Self {
        Self {
            debounce_ms: config.debounce_ms,
            immediate_after_ms: config.immediate_after_ms,
        }
    }
}

/// The current published state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateCell {
    pub version: u64,
    pub routine: RoutineContext,
    pub state: Arc<UiState>,
    /// Time of the last accepted update, including updates that changed nothing
    pub last_update_ms: u64,
}

/// Outcome of [`IncrementalUpdater::on_batch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Immediate(Emission),
    /// Batch held; call `on_debounce_elapsed(ticket, ..)` at `fire_at_ms`
    Debounced { ticket: u64, fire_at_ms: u64 },
    /// Nothing to publish
    Skipped,
}

#[derive(Debug, Clone)]
struct Pending {
    ticket: u64,
    batch: PredictionBatch,
}

enum Rendered {
    Fresh(Generated),
    Fallback(Generated),
    KeepPrevious,
}

/// Owns the versioned state cell for one launcher session.
#[derive(Debug)]
pub struct IncrementalUpdater {
    generator: UiStateGenerator,
    policy: UpdatePolicy,
    session_id: Uuid,
    cell: Option<StateCell>,
    pending: Option<Pending>,
    latest: Option<PredictionBatch>,
    next_ticket: u64,
}

impl IncrementalUpdater {
    pub fn new(generator: UiStateGenerator, policy: UpdatePolicy) -> Self {
        Self {
            generator,
            policy,
            session_id: Uuid::new_v4(),
            cell: None,
            pending: None,
            latest: None,
            next_ticket: 1,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn policy(&self) -> UpdatePolicy {
        self.policy
    }

    pub fn cell(&self) -> Option<&StateCell> {
        self.cell.as_ref()
    }

    pub fn current(&self) -> Option<Arc<UiState>> {
        self.cell.as_ref().map(|cell| Arc::clone(&cell.state))
    }

    /// Ticket of the batch waiting for its debounce window, if any.
    pub fn pending_ticket(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    /// Routine of the most recent batch or routine change.
    pub fn routine(&self) -> Option<RoutineContext> {
        self.latest.as_ref().map(|b| b.routine)
    }

    /// Accept a new batch.
    ///
    /// The first batch of a session and any batch whose routine changes the
    /// theme are rendered in full at once. A batch arriving more than
    /// `immediate_after_ms` after the last update is merged at once. Anything
    /// else replaces the pending batch and waits `debounce_ms`.
    pub fn on_batch(&mut self, batch: PredictionBatch, catalog: &[App], now_ms: u64) -> Decision {
        self.latest = Some(batch.clone());

        let Some(cell) = &self.cell else {
            self.pending = None;
            return self.replace(&batch, catalog, now_ms, UpdateTrigger::Initial).into();
        };

        if cell.state.theme.name != theme_name(batch.routine) {
            self.pending = None;
            info!(from = %cell.routine, to = %batch.routine, "routine changed with new batch");
            return self
                .replace(&batch, catalog, now_ms, UpdateTrigger::RoutineChanged)
                .into();
        }

        let elapsed = now_ms.saturating_sub(cell.last_update_ms);
        if elapsed > self.policy.immediate_after_ms {
            self.pending = None;
            return self.patch(&batch, catalog, now_ms, UpdateTrigger::Elapsed).into();
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        if let Some(superseded) = self.pending.replace(Pending { ticket, batch }) {
            debug!(superseded = superseded.ticket, ticket, "pending batch superseded");
        }
        let fire_at_ms = now_ms.saturating_add(self.policy.debounce_ms);
        debug!(ticket, elapsed, fire_at_ms, "batch debounced");
        Decision::Debounced { ticket, fire_at_ms }
    }

    /// Apply the pending batch if `ticket` is still the latest one.
    pub fn on_debounce_elapsed(
        &mut self,
        ticket: u64,
        catalog: &[App],
        now_ms: u64,
    ) -> Option<Emission> {
        if self.pending_ticket() != Some(ticket) {
            debug!(ticket, "stale debounce ticket dropped");
            return None;
        }
        let pending = self.pending.take()?;
        self.patch(&pending.batch, catalog, now_ms, UpdateTrigger::Debounced)
    }

    /// Re-render the latest predictions under a new routine immediately.
    pub fn on_routine_changed(
        &mut self,
        routine: RoutineContext,
        catalog: &[App],
        now_ms: u64,
    ) -> Option<Emission> {
        self.pending = None;
        let predictions = self
            .latest
            .take()
            .map(|b| b.predictions)
            .unwrap_or_default();
        let batch = PredictionBatch::new(routine, predictions);
        self.latest = Some(batch.clone());

        let trigger = if self.cell.is_some() {
            UpdateTrigger::RoutineChanged
        } else {
            UpdateTrigger::Initial
        };
        info!(%routine, "routine selected");
        self.replace(&batch, catalog, now_ms, trigger)
    }

    /// Discard the state cell and start a new session.
    pub fn end_session(&mut self) {
        info!(session = %self.session_id, version = self.cell.as_ref().map_or(0, |c| c.version), "session ended");
        self.cell = None;
        self.pending = None;
        self.latest = None;
        self.session_id = Uuid::new_v4();
    }

    fn render(&self, predictions: &[ActionPrediction], routine: RoutineContext, catalog: &[App]) -> Rendered {
        let err = match self.generator.generate_with_analysis(predictions, routine, catalog) {
            Ok(generated) => return Rendered::Fresh(generated),
            Err(err) => err,
        };
        warn!(error = %err, %routine, "generation failed, retrying with empty batch");

        match self.generator.generate_with_analysis(&[], routine, catalog) {
            Ok(generated) => Rendered::Fallback(generated),
            Err(err) if self.cell.is_some() => {
                warn!(error = %err, "empty-batch generation failed, keeping previous state");
                Rendered::KeepPrevious
            }
            Err(err) => {
                warn!(error = %err, "empty-batch generation failed, using neutral state");
                Rendered::Fallback(self.generator.neutral(routine, catalog))
            }
        }
    }

    fn replace(
        &mut self,
        batch: &PredictionBatch,
        catalog: &[App],
        now_ms: u64,
        trigger: UpdateTrigger,
    ) -> Option<Emission> {
        match self.render(&batch.predictions, batch.routine, catalog) {
            Rendered::Fresh(generated) => {
                self.commit(generated.state, ChangeSet::full(), trigger, batch.routine, now_ms)
            }
            Rendered::Fallback(generated) => self.commit(
                generated.state,
                ChangeSet::full(),
                UpdateTrigger::Fallback,
                batch.routine,
                now_ms,
            ),
            Rendered::KeepPrevious => None,
        }
    }

    fn patch(
        &mut self,
        batch: &PredictionBatch,
        catalog: &[App],
        now_ms: u64,
        trigger: UpdateTrigger,
    ) -> Option<Emission> {
        let previous = match &self.cell {
            Some(cell) => Arc::clone(&cell.state),
            None => return self.replace(batch, catalog, now_ms, trigger),
        };

        match self.render(&batch.predictions, batch.routine, catalog) {
            Rendered::Fresh(generated) => {
                let (merged, changes) = merge(&previous, generated.state, &generated.analysis);
                self.commit(merged, changes, trigger, batch.routine, now_ms)
            }
            Rendered::Fallback(generated) => self.commit(
                generated.state,
                ChangeSet::full(),
                UpdateTrigger::Fallback,
                batch.routine,
                now_ms,
            ),
            Rendered::KeepPrevious => None,
        }
    }

    /// Store `state` as the next version, unless it equals the current one.
    fn commit(
        &mut self,
        state: UiState,
        changes: ChangeSet,
        trigger: UpdateTrigger,
        routine: RoutineContext,
        now_ms: u64,
    ) -> Option<Emission> {
        if let Some(cell) = &mut self.cell {
            if *cell.state == state {
                cell.last_update_ms = now_ms;
                cell.routine = routine;
                debug!(version = cell.version, trigger = trigger.name(), "state unchanged, emission skipped");
                return None;
            }
        }

        let version = self.cell.as_ref().map_or(0, |c| c.version) + 1;
        let state = Arc::new(state);
        self.cell = Some(StateCell {
            version,
            routine,
            state: Arc::clone(&state),
            last_update_ms: now_ms,
        });

        info!(
            session = %self.session_id,
            version,
            trigger = trigger.name(),
            replaced = ?changes.replaced(),
            "ui state emitted"
        );

        Some(Emission {
            session_id: self.session_id,
            version,
            trigger,
            changes,
            state,
        })
    }
}

impl From<Option<Emission>> for Decision {
    fn from(emission: Option<Emission>) -> Self {
        emission.map_or(Decision::Skipped, Decision::Immediate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn updater() -> IncrementalUpdater {
        IncrementalUpdater::new(UiStateGenerator::default(), UpdatePolicy::default())
    }

    fn catalog() -> Vec<App> {
        vec![
            App::new("com.headspace", "Headspace").with_category("health"),
            App::new("com.slack", "Slack").with_category("communication"),
        ]
    }

    fn morning(predictions: Vec<ActionPrediction>) -> PredictionBatch {
        PredictionBatch::new(RoutineContext::Morning, predictions)
    }

    fn emitted(decision: Decision) -> Emission {
        match decision {
            Decision::Immediate(emission) => emission,
            other => panic!("expected immediate emission, got {other:?}"),
        }
    }

    #[test]
    fn test_first_batch_is_immediate_and_full() {
        let mut updater = updater();
        let emission = emitted(updater.on_batch(
            morning(vec![ActionPrediction::new("Start meditation", 0.9)]),
            &catalog(),
            0,
        ));
        assert_eq!(emission.version, 1);
        assert_eq!(emission.trigger, UpdateTrigger::Initial);
        assert!(emission.changes.is_full());
        assert_eq!(emission.session_id, updater.session_id());
        assert_eq!(updater.current(), Some(emission.state));
    }

    #[test]
    fn test_batch_within_window_is_debounced() {
        let mut updater = updater();
        updater.on_batch(morning(vec![]), &catalog(), 0);

        let decision = updater.on_batch(
            morning(vec![ActionPrediction::new("Start meditation", 0.9)]),
            &catalog(),
            100,
        );
        assert_eq!(decision, Decision::Debounced { ticket: 1, fire_at_ms: 250 });

        let emission = updater.on_debounce_elapsed(1, &catalog(), 250).unwrap();
        assert_eq!(emission.trigger, UpdateTrigger::Debounced);
        assert_eq!(emission.version, 2);
        assert_eq!(emission.state.primary_actions[0].action, "Start meditation");
    }

    #[test]
    fn test_newer_batch_supersedes_pending() {
        let mut updater = updater();
        updater.on_batch(morning(vec![]), &catalog(), 0);
        updater.on_batch(morning(vec![ActionPrediction::new("Go for a run", 0.9)]), &catalog(), 10);
        updater.on_batch(morning(vec![ActionPrediction::new("Check work messages", 0.75)]), &catalog(), 60);

        assert!(updater.on_debounce_elapsed(1, &catalog(), 160).is_none());
        let emission = updater.on_debounce_elapsed(2, &catalog(), 210).unwrap();
        assert_eq!(emission.state.primary_actions.len(), 1);
        assert_eq!(emission.state.primary_actions[0].action, "Check work messages");
        assert!(updater.pending_ticket().is_none());
    }

    #[test]
    fn test_batch_after_quiet_period_is_immediate() {
        let mut updater = updater();
        updater.on_batch(morning(vec![]), &catalog(), 0);
        let emission = emitted(updater.on_batch(
            morning(vec![ActionPrediction::new("Start meditation", 0.9)]),
            &catalog(),
            2001,
        ));
        assert_eq!(emission.trigger, UpdateTrigger::Elapsed);
        assert!(emission.changes.primary_actions);
    }

    #[test]
    fn test_routine_switch_replaces_everything() {
        let mut updater = updater();
        updater.on_batch(morning(vec![ActionPrediction::new("Start meditation", 0.9)]), &catalog(), 0);
        let emission = emitted(updater.on_batch(
            PredictionBatch::new(RoutineContext::Evening, vec![ActionPrediction::new("Watch a movie", 0.8)]),
            &catalog(),
            20,
        ));
        assert_eq!(emission.trigger, UpdateTrigger::RoutineChanged);
        assert!(emission.changes.is_full());
        assert_eq!(emission.state.theme.name, "Evening Calm");
    }

    #[test]
    fn test_routine_selection_rerenders_latest_predictions() {
        let mut updater = updater();
        updater.on_batch(morning(vec![ActionPrediction::new("Start meditation", 0.9)]), &catalog(), 0);
        let emission = updater
            .on_routine_changed(RoutineContext::Weekend, &catalog(), 30)
            .unwrap();
        assert_eq!(emission.trigger, UpdateTrigger::RoutineChanged);
        assert_eq!(emission.state.theme.name, "Weekend Relaxed");
        assert_eq!(emission.state.primary_actions[0].action, "Start meditation");
        assert_eq!(updater.routine(), Some(RoutineContext::Weekend));
    }

    #[test]
    fn test_identical_state_is_not_reemitted() {
        let mut updater = updater();
        let batch = morning(vec![ActionPrediction::new("Start meditation", 0.9)]);
        updater.on_batch(batch.clone(), &catalog(), 0);
        assert_eq!(updater.on_batch(batch, &catalog(), 3000), Decision::Skipped);
        let cell = updater.cell().unwrap();
        assert_eq!(cell.version, 1);
        assert_eq!(cell.last_update_ms, 3000);
    }

    #[test]
    fn test_invalid_batch_falls_back_to_empty_predictions() {
        let mut updater = updater();
        let emission = emitted(updater.on_batch(
            morning(vec![ActionPrediction::new("Broken", 1.5)]),
            &catalog(),
            0,
        ));
        assert_eq!(emission.trigger, UpdateTrigger::Fallback);
        assert!(emission.state.primary_actions.is_empty());
        assert_eq!(emission.state.app_grid.apps.len(), 2);
    }

    #[test]
    fn test_corrupt_catalog_without_state_uses_neutral() {
        let mut updater = updater();
        let mut apps = catalog();
        apps.push(App::new("", "Ghost"));
        let emission = emitted(updater.on_batch(morning(vec![]), &apps, 0));
        assert_eq!(emission.trigger, UpdateTrigger::Fallback);
        assert_eq!(emission.state.app_grid.apps.len(), 2);
    }

    #[test]
    fn test_corrupt_catalog_with_state_keeps_previous() {
        let mut updater = updater();
        updater.on_batch(morning(vec![]), &catalog(), 0);
        let before = updater.current();
        let decision = updater.on_batch(morning(vec![]), &[App::new("", "Ghost")], 5000);
        assert_eq!(decision, Decision::Skipped);
        assert_eq!(updater.current(), before);
    }

    #[test]
    fn test_end_session_starts_over() {
        let mut updater = updater();
        let first_session = updater.session_id();
        updater.on_batch(morning(vec![]), &catalog(), 0);
        updater.on_batch(morning(vec![ActionPrediction::new("Go for a run", 0.9)]), &catalog(), 10);
        updater.end_session();

        assert!(updater.current().is_none());
        assert!(updater.pending_ticket().is_none());
        assert_ne!(updater.session_id(), first_session);

        let emission = emitted(updater.on_batch(morning(vec![]), &catalog(), 20));
        assert_eq!(emission.version, 1);
        assert_eq!(emission.trigger, UpdateTrigger::Initial);
    }
}
