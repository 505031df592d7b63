//! Prediction batch analysis.

use std::path::Path;

use launchsense_core::{Config, PredictionAnalyzer, RoutineContext};

use crate::input;

pub fn run(
    config: &Config,
    routine: RoutineContext,
    predictions: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let predictions = input::predictions(predictions)?;
    for prediction in &predictions {
        prediction.validate()?;
    }
    let analyzer = PredictionAnalyzer::new(config.classification.bucket_table()?);
    let analysis = analyzer.analyze(&predictions, routine);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("Routine:      {routine}");
    println!("Predictions:  {}", analysis.prediction_count);
    println!(
        "Bands:        high {} / medium {} / low {}",
        analysis.bands.high, analysis.bands.medium, analysis.bands.low
    );
    println!("Avg conf:     {:.3}", analysis.average_confidence);
    println!("Diversity:    {:.3}", analysis.diversity);
    println!("Alignment:    {:.3}", analysis.routine_alignment);
    println!("Focus:        {}", analysis.focus_level.name());
    println!("Relayout:     {}", analysis.requires_layout_change);
    if let Some(bucket) = analysis.dominant_bucket {
        println!("Dominant:     {bucket}");
    }

    for prediction in &predictions {
        println!(
            "  {:<32} {:.2}  {}",
            prediction.action,
            prediction.confidence,
            analyzer.buckets().classify(&prediction.action)
        );
    }
    Ok(())
}
