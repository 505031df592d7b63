//! Replay a timed batch script through the updater service.
//!
//! Steps are submitted at their offsets in real time, so debounce behavior
//! matches what a launcher would see.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use launchsense_core::{
    Config, Emission, PredictionBatch, RoutineContext, StaticCatalog, UiStateGenerator,
    UpdaterService,
};
use tokio::time::Instant;
use tracing::debug;

use crate::input;

pub fn run(
    config: &Config,
    routine: RoutineContext,
    batches: &Path,
    catalog: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let steps = input::replay_steps(batches)?;
    let catalog = Arc::new(StaticCatalog::new(input::catalog(catalog)?));
    let generator = UiStateGenerator::new(config.classification.bucket_table()?);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async {
        let (handle, mut emissions, task) =
            UpdaterService::spawn(&config.updater, generator, catalog);

        let printer = tokio::spawn(async move {
            let mut count = 0usize;
            while let Some(emission) = emissions.recv().await {
                count += 1;
                print_emission(&emission, json);
            }
            count
        });

        let start = Instant::now();
        for step in steps {
            tokio::time::sleep_until(start + Duration::from_millis(step.offset_ms)).await;
            let batch = PredictionBatch::new(step.routine.unwrap_or(routine), step.predictions);
            debug!(offset_ms = step.offset_ms, predictions = batch.predictions.len(), "replay step");
            handle.submit(batch).await?;
        }

        // Let the last debounced batch land before stopping.
        tokio::time::sleep(Duration::from_millis(config.updater.debounce_ms * 2)).await;
        handle.shutdown().await?;
        drop(handle);

        task.await?;
        let count = printer.await?;
        if !json {
            println!("{count} emission(s)");
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn print_emission(emission: &Emission, json: bool) {
    if json {
        match serde_json::to_string(emission) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("error: cannot serialize emission: {e}"),
        }
        return;
    }

    let state = &emission.state;
    let primary: Vec<&str> = state.primary_actions.iter().map(|c| c.action.as_str()).collect();
    println!(
        "v{} {:<15} {:<16} columns={} primary=[{}] secondary={} replaced=[{}]",
        emission.version,
        emission.trigger.name(),
        state.theme.name,
        state.layout.grid_columns,
        primary.join(", "),
        state.secondary_actions.len(),
        emission.changes.replaced().join(", ")
    );
}
