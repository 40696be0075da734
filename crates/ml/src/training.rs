use linfa::prelude::*;
use linfa_logistic::LogisticRegression;
use linfa_preprocessing::linear_scaling::LinearScaler;
use ndarray::{Array1, Array2};

use hoopcast_features::{assemble_training_row, FixtureAligner, RollingFeatureBuilder};
use hoopcast_models::{FeatureSchema, GameLog, PredictError, Result};

use crate::bundle::ModelBundle;
use crate::classifier::LinearClassifier;
use crate::scaler::RangeScaler;

#[derive(Debug, Clone)]
pub struct TrainingOptions {
    pub window: usize,
    pub max_iterations: u64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            window: hoopcast_features::DEFAULT_WINDOW,
            max_iterations: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Labeled rows the classifier was fitted on.
    pub rows: usize,
    /// Aligned rows excluded for carrying no outcome.
    pub dropped_unlabeled: usize,
    pub training_accuracy: f64,
}

/// One-shot offline pipeline: rolling form, fixture alignment, schema-ordered
/// matrix, min-max fit, logistic fit, bundle extraction. Never runs
/// concurrently with serving; the bundle file is the only shared state.
pub fn train(
    log: &GameLog,
    schema: FeatureSchema,
    options: &TrainingOptions,
) -> Result<(ModelBundle, TrainingReport)> {
    let snapshots = RollingFeatureBuilder::new(options.window).build(log, &schema);
    let fixtures = FixtureAligner::new().align(log, &snapshots);

    let width = schema.len();
    let mut flat = Vec::new();
    let mut labels = Vec::new();
    let mut dropped_unlabeled = 0usize;

    for row in &fixtures {
        let Some(label) = row.label else {
            dropped_unlabeled += 1;
            continue;
        };
        flat.extend(assemble_training_row(&schema, row));
        labels.push(label);
    }

    let rows = labels.len();
    if rows == 0 {
        return Err(PredictError::Training(
            "no labeled fixture rows survived alignment".to_string(),
        ));
    }

    let records = Array2::from_shape_vec((rows, width), flat)
        .map_err(|e| PredictError::Training(e.to_string()))?;
    let targets = Array1::from_vec(labels);

    // Fit the min-max transform, then apply the exact persisted affine form
    // so training sees the same arithmetic serving will.
    let fit_dataset = Dataset::new(records.clone(), targets.clone());
    let fitted_scaler = LinearScaler::min_max()
        .fit(&fit_dataset)
        .map_err(|e| PredictError::Training(e.to_string()))?;
    let scaler = RangeScaler::from_fitted(fitted_scaler.scales(), fitted_scaler.offsets())?;
    let scaled = scaler.transform_matrix(&records)?;

    let dataset = Dataset::new(scaled, targets);
    let fitted = LogisticRegression::default()
        .max_iterations(options.max_iterations)
        .fit(&dataset)
        .map_err(|e| PredictError::Training(e.to_string()))?;

    let predicted = fitted.predict(dataset.records());
    let correct = predicted
        .iter()
        .zip(dataset.targets().iter())
        .filter(|(p, t)| p == t)
        .count();
    let training_accuracy = correct as f64 / rows as f64;

    let classifier = LinearClassifier::new(fitted.params().to_vec(), fitted.intercept());
    let bundle = ModelBundle::new(schema, scaler, classifier)?;

    let report = TrainingReport {
        rows,
        dropped_unlabeled,
        training_accuracy,
    };
    tracing::info!(
        rows = report.rows,
        dropped_unlabeled = report.dropped_unlabeled,
        accuracy = format!("{:.1}%", report.training_accuracy * 100.0),
        "training complete"
    );

    Ok((bundle, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hoopcast_models::GameRecord;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i64::from(d))
    }

    /// BOS beats MIA in every fixture, with stats separating the sides.
    fn lopsided_log(rounds: u32) -> GameLog {
        let mut records = Vec::new();
        for r in 0..rounds {
            let d = r + 1;
            records.push(
                GameRecord::new("BOS", "MIA", date(d))
                    .with_home(r % 2 == 0)
                    .with_outcome(true)
                    .with_stat("pts", 115.0)
                    .with_stat("fga", 90.0)
                    .with_stat("efg_pct", 0.56),
            );
            records.push(
                GameRecord::new("MIA", "BOS", date(d))
                    .with_home(r % 2 == 1)
                    .with_outcome(false)
                    .with_stat("pts", 98.0)
                    .with_stat("fga", 82.0)
                    .with_stat("efg_pct", 0.47),
            );
        }
        GameLog::from_records(records).unwrap()
    }

    #[test]
    fn test_train_produces_valid_bundle() {
        let log = lopsided_log(12);
        let (bundle, report) =
            train(&log, FeatureSchema::current(), &TrainingOptions::default()).unwrap();

        assert_eq!(bundle.classifier.width(), bundle.schema.len());
        assert!(report.rows > 0);
        assert!(report.training_accuracy >= 0.5);
    }

    #[test]
    fn test_train_fails_on_sparse_log() {
        // Two rounds is below the rolling minimum everywhere.
        let log = lopsided_log(2);
        let result = train(&log, FeatureSchema::current(), &TrainingOptions::default());
        assert!(matches!(result, Err(PredictError::Training(_))));
    }
}
