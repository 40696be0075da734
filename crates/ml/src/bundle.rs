use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use hoopcast_models::{FeatureSchema, PredictError, Result};

use crate::classifier::LinearClassifier;
use crate::scaler::RangeScaler;

/// The one artifact crossing the training/serving boundary: classifier,
/// scaler and the authoritative feature schema, versioned together. Widths
/// are re-checked at load; a mismatched bundle must never start serving.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelBundle {
    pub model_version: String,
    pub trained_at: DateTime<Utc>,
    pub schema: FeatureSchema,
    pub scaler: RangeScaler,
    pub classifier: LinearClassifier,
}

impl ModelBundle {
    pub fn new(
        schema: FeatureSchema,
        scaler: RangeScaler,
        classifier: LinearClassifier,
    ) -> Result<Self> {
        let bundle = Self {
            model_version: schema.version.clone(),
            trained_at: Utc::now(),
            schema,
            scaler,
            classifier,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn validate(&self) -> Result<()> {
        if self.classifier.width() != self.schema.len() {
            return Err(PredictError::SchemaMismatch {
                expected: self.classifier.width(),
                actual: self.schema.len(),
            });
        }
        if self.scaler.width() != self.schema.len() {
            return Err(PredictError::SchemaMismatch {
                expected: self.scaler.width(),
                actual: self.schema.len(),
            });
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        tracing::info!(path = %path.display(), version = %self.model_version, "model bundle saved");
        Ok(())
    }

    /// Loads and validates; fails fast on any width disagreement rather than
    /// padding or truncating vectors later.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let bundle: Self = serde_json::from_reader(BufReader::new(file))?;
        bundle.validate()?;
        tracing::info!(
            path = %path.display(),
            version = %bundle.model_version,
            features = bundle.schema.len(),
            "model bundle loaded"
        );
        Ok(bundle)
    }
}
