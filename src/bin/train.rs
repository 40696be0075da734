//! Offline training entry point: game log in, model bundle out.

#[path = "../config.rs"]
mod config;

use anyhow::{Context, Result};
use config::AppConfig;
use hoopcast_ml::{train, TrainingOptions};
use hoopcast_models::FeatureSchema;
use hoopcast_services::load_game_log;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hoopcast=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new().context("loading configuration")?;

    let log = load_game_log(Path::new(&config.data.game_log_path))
        .context("loading game log")?;

    let schema = FeatureSchema::current();
    let options = TrainingOptions {
        window: config.ml.window,
        max_iterations: config.ml.max_iterations,
    };

    info!(
        features = schema.len(),
        window = options.window,
        "training {} model",
        schema.version
    );

    let (bundle, report) = train(&log, schema, &options).context("training model")?;
    bundle
        .save(Path::new(&config.data.model_path))
        .context("saving model bundle")?;

    info!(
        rows = report.rows,
        dropped_unlabeled = report.dropped_unlabeled,
        "trained with {:.1}% in-sample accuracy",
        report.training_accuracy * 100.0
    );

    Ok(())
}
