//! Updater task.
//!
//! A single tokio task owns the [`IncrementalUpdater`] and is the only writer
//! of the state cell. Producers talk to it through [`UpdaterHandle`]; the
//! renderer reads [`Emission`]s from the returned receiver.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::catalog::CatalogProvider;
use super::machine::{Decision, IncrementalUpdater, UpdatePolicy};
use crate::config::UpdaterConfig;
use crate::error::UpdaterError;
use crate::events::Emission;
use crate::generator::UiStateGenerator;
use crate::model::{PredictionBatch, RoutineContext, UiState};

/// Messages accepted by the updater task.
#[derive(Debug)]
pub enum Command {
    Batch(PredictionBatch),
    SetRoutine(RoutineContext),
    Snapshot(oneshot::Sender<Option<Arc<UiState>>>),
    EndSession,
    Shutdown,
}

/// Cloneable sender side of the updater task.
#[derive(Debug, Clone)]
pub struct UpdaterHandle {
    commands: mpsc::Sender<Command>,
}

impl UpdaterHandle {
    /// Queue a prediction batch.
    pub async fn submit(&self, batch: PredictionBatch) -> Result<(), UpdaterError> {
        self.commands.send(Command::Batch(batch)).await?;
        Ok(())
    }

    /// Switch routine; the latest predictions are re-rendered at once.
    pub async fn set_routine(&self, routine: RoutineContext) -> Result<(), UpdaterError> {
        self.commands.send(Command::SetRoutine(routine)).await?;
        Ok(())
    }

    /// Current published state, if any.
    pub async fn snapshot(&self) -> Result<Option<Arc<UiState>>, UpdaterError> {
        let (reply, response) = oneshot::channel();
        self.commands.send(Command::Snapshot(reply)).await?;
        Ok(response.await?)
    }

    pub async fn end_session(&self) -> Result<(), UpdaterError> {
        self.commands.send(Command::EndSession).await?;
        Ok(())
    }

    /// Ask the task to stop. Pending debounced batches are dropped.
    pub async fn shutdown(&self) -> Result<(), UpdaterError> {
        self.commands.send(Command::Shutdown).await?;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

pub struct UpdaterService;

impl UpdaterService {
    /// Spawn the updater task on the current tokio runtime.
    ///
    /// The task stops on [`UpdaterHandle::shutdown`], when every handle is
    /// dropped, or when the emission receiver is dropped. Emissions that do
    /// not fit in the queue are dropped; the state cell always holds the
    /// latest snapshot.
    pub fn spawn<C>(
        config: &UpdaterConfig,
        generator: UiStateGenerator,
        catalog: Arc<C>,
    ) -> (UpdaterHandle, mpsc::Receiver<Emission>, JoinHandle<()>)
    where
        C: CatalogProvider + ?Sized + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel(config.command_capacity.max(1));
        let (emission_tx, emission_rx) = mpsc::channel(config.emission_capacity.max(1));
        let updater = IncrementalUpdater::new(generator, UpdatePolicy::from(config));

        let task = tokio::spawn(run(updater, catalog, command_rx, emission_tx));
        (
            UpdaterHandle {
                commands: command_tx,
            },
            emission_rx,
            task,
        )
    }
}

fn elapsed_ms(epoch: Instant) -> u64 {
    u64::try_from(epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
}

async fn run<C>(
    mut updater: IncrementalUpdater,
    catalog: Arc<C>,
    mut commands: mpsc::Receiver<Command>,
    emissions: mpsc::Sender<Emission>,
) where
    C: CatalogProvider + ?Sized,
{
    let epoch = Instant::now();
    let debounce = tokio::time::sleep_until(epoch);
    tokio::pin!(debounce);
    let mut pending: Option<u64> = None;

    info!(session = %updater.session_id(), "updater task started");

    loop {
        let emission = tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("all updater handles dropped");
                    break;
                };
                let now = elapsed_ms(epoch);
                let emission = match command {
                    Command::Batch(batch) => match updater.on_batch(batch, &catalog.apps(), now) {
                        Decision::Immediate(emission) => Some(emission),
                        Decision::Debounced { fire_at_ms, .. } => {
                            debounce
                                .as_mut()
                                .reset(epoch + Duration::from_millis(fire_at_ms));
                            None
                        }
                        Decision::Skipped => None,
                    },
                    Command::SetRoutine(routine) => {
                        updater.on_routine_changed(routine, &catalog.apps(), now)
                    }
                    Command::Snapshot(reply) => {
                        // Requester may have given up waiting.
                        let _ = reply.send(updater.current());
                        None
                    }
                    Command::EndSession => {
                        updater.end_session();
                        None
                    }
                    Command::Shutdown => break,
                };
                pending = updater.pending_ticket();
                emission
            }
            () = &mut debounce, if pending.is_some() => {
                let emission = pending
                    .take()
                    .and_then(|ticket| updater.on_debounce_elapsed(ticket, &catalog.apps(), elapsed_ms(epoch)));
                pending = updater.pending_ticket();
                emission
            }
        };

        // Never wait on the renderer; a lagging one can catch up via snapshot().
        if let Some(emission) = emission {
            match emissions.try_send(emission) {
                Ok(()) => {}
                Err(TrySendError::Full(dropped)) => {
                    warn!(version = dropped.version, "emission queue full, emission dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("emission receiver dropped");
                    break;
                }
            }
        }
    }

    info!(session = %updater.session_id(), "updater task stopped");
}
