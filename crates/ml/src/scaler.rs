use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use hoopcast_models::{PredictError, Result};

/// Persisted affine min-max transform: `x * scale + offset` per column.
/// Fitted once at training time; deterministic thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeScaler {
    scales: Vec<f64>,
    offsets: Vec<f64>,
}

impl RangeScaler {
    pub fn new(scales: Vec<f64>, offsets: Vec<f64>) -> Result<Self> {
        if scales.len() != offsets.len() {
            return Err(PredictError::SchemaMismatch {
                expected: scales.len(),
                actual: offsets.len(),
            });
        }
        Ok(Self { scales, offsets })
    }

    /// From fitted min-max parameters. The fitted transform is
    /// `(x - offset) * scale` with offsets holding column minimums; composed
    /// here into the persisted `x * scale + offset` form, so the training
    /// minimum lands on 0 and the maximum on 1. Degenerate columns (zero
    /// training range) produce non-finite parameters; those columns pass
    /// through unchanged instead.
    pub fn from_fitted(scales: &Array1<f64>, offsets: &Array1<f64>) -> Result<Self> {
        let mut clean_scales = Vec::with_capacity(scales.len());
        let mut clean_offsets = Vec::with_capacity(offsets.len());
        for (&scale, &min) in scales.iter().zip(offsets.iter()) {
            let offset = -min * scale;
            if scale.is_finite() && offset.is_finite() {
                clean_scales.push(scale);
                clean_offsets.push(offset);
            } else {
                clean_scales.push(1.0);
                clean_offsets.push(0.0);
            }
        }
        Self::new(clean_scales, clean_offsets)
    }

    /// Identity transform of the given width.
    pub fn identity(width: usize) -> Self {
        Self {
            scales: vec![1.0; width],
            offsets: vec![0.0; width],
        }
    }

    pub fn width(&self) -> usize {
        self.scales.len()
    }

    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        if values.len() != self.width() {
            return Err(PredictError::SchemaMismatch {
                expected: self.width(),
                actual: values.len(),
            });
        }
        Ok(values
            .iter()
            .zip(self.scales.iter().zip(self.offsets.iter()))
            .map(|(&x, (&scale, &offset))| x * scale + offset)
            .collect())
    }

    pub fn transform_matrix(&self, records: &Array2<f64>) -> Result<Array2<f64>> {
        if records.ncols() != self.width() {
            return Err(PredictError::SchemaMismatch {
                expected: self.width(),
                actual: records.ncols(),
            });
        }
        let mut scaled = records.clone();
        for (column, (&scale, &offset)) in scaled
            .columns_mut()
            .into_iter()
            .zip(self.scales.iter().zip(self.offsets.iter()))
        {
            let mut column = column;
            column.mapv_inplace(|x| x * scale + offset);
        }
        Ok(scaled)
    }
}
