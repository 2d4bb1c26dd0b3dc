//! Ratings evaluation driver
//!
//! Loads the catalog and training ratings, predicts every held-out test
//! rating and reports how well predictions track the actual ratings.

use anyhow::Context;
use media_gateway_ratings::{loader, EvaluationReport, PredictionEngine, RatingsConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let config = RatingsConfig::load().context("Failed to load configuration")?;
    info!(?config, "Starting ratings evaluation");

    let store = loader::load_store(&config.data.movies_path, &config.data.training_path)
        .with_context(|| {
            format!(
                "Failed to load {} and {}",
                config.data.movies_path, config.data.training_path
            )
        })?;
    let queries = loader::read_ratings_file(&config.data.test_path)
        .with_context(|| format!("Failed to load {}", config.data.test_path))?;

    let engine = PredictionEngine::new(store)
        .with_config(config.model)
        .context("Invalid model configuration")?;

    let predictions = if config.evaluation.parallel {
        engine.predict_batch_parallel(&queries)?
    } else {
        engine.predict_batch(&queries)?
    };

    if config.evaluation.print_predictions {
        for prediction in &predictions {
            println!("{}", serde_json::to_string(prediction)?);
        }
    }

    let report = EvaluationReport::from_predictions(&predictions)
        .context("Failed to evaluate predictions")?;
    info!(
        count = report.count,
        correlation = report.correlation,
        mae = report.mean_absolute_error,
        rmse = report.root_mean_squared_error,
        "Evaluation complete"
    );
    println!("{}", serde_json::to_string(&report)?);

    Ok(())
}
