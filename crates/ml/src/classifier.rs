use serde::{Deserialize, Serialize};

use hoopcast_models::{PredictError, Result};

/// Fitted binary classifier reduced to its coefficients: probability of a
/// home win is the sigmoid of the dot product plus intercept. Serving never
/// needs the training machinery, only these numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearClassifier {
    weights: Vec<f64>,
    intercept: f64,
}

impl LinearClassifier {
    pub fn new(weights: Vec<f64>, intercept: f64) -> Self {
        Self { weights, intercept }
    }

    pub fn width(&self) -> usize {
        self.weights.len()
    }

    /// Win probability for already-scaled features. Clamped away from exact
    /// 0 and 1 so downstream odds math never divides by zero.
    pub fn predict_probability(&self, scaled: &[f64]) -> Result<f64> {
        if scaled.len() != self.width() {
            return Err(PredictError::SchemaMismatch {
                expected: self.width(),
                actual: scaled.len(),
            });
        }
        let z: f64 = self
            .weights
            .iter()
            .zip(scaled.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        let p = 1.0 / (1.0 + (-z).exp());
        Ok(p.clamp(1e-6, 1.0 - 1e-6))
    }
}
