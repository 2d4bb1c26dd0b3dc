//! Agreement between predicted and actual ratings

use serde::Serialize;
use tracing::instrument;

use crate::error::{RatingsError, Result};
use crate::types::Prediction;

/// Pearson product-moment correlation of two equal-length sequences
///
/// Fails with `DegenerateInput` for fewer than two samples or when either
/// sequence has zero variance, where the coefficient is undefined.
pub fn correlation(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    if predicted.len() != actual.len() {
        return Err(RatingsError::LengthMismatch {
            predicted: predicted.len(),
            actual: actual.len(),
        });
    }
    if predicted.len() < 2 {
        return Err(RatingsError::DegenerateInput(format!(
            "correlation needs at least two samples, got {}",
            predicted.len()
        )));
    }

    if is_constant(predicted) || is_constant(actual) {
        return Err(RatingsError::DegenerateInput(
            "correlation is undefined for a constant sequence".to_string(),
        ));
    }

    let n = predicted.len() as f64;
    let mean_p = predicted.iter().sum::<f64>() / n;
    let mean_a = actual.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_p = 0.0;
    let mut variance_a = 0.0;
    for (p, a) in predicted.iter().zip(actual) {
        let dp = p - mean_p;
        let da = a - mean_a;
        covariance += dp * da;
        variance_p += dp * dp;
        variance_a += da * da;
    }

    if variance_p == 0.0 || variance_a == 0.0 {
        return Err(RatingsError::DegenerateInput(
            "correlation is undefined for a constant sequence".to_string(),
        ));
    }

    Ok((covariance / (variance_p.sqrt() * variance_a.sqrt())).clamp(-1.0, 1.0))
}

// Checked on the raw values: a rounded mean can leave a tiny nonzero
// variance for a constant sequence such as [0.1, 0.1, 0.1].
fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

/// Summary of a prediction batch against held-out ratings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub count: usize,
    pub correlation: f64,
    pub mean_absolute_error: f64,
    pub root_mean_squared_error: f64,
}

impl EvaluationReport {
    #[instrument(skip(predictions), fields(count = predictions.len()))]
    pub fn from_predictions(predictions: &[Prediction]) -> Result<Self> {
        let predicted: Vec<f64> = predictions.iter().map(|p| p.predicted).collect();
        let actual: Vec<f64> = predictions.iter().map(|p| p.actual).collect();
        let correlation = correlation(&predicted, &actual)?;

        let n = predictions.len() as f64;
        let (abs_total, sq_total) = predictions
            .iter()
            .map(|p| p.predicted - p.actual)
            .fold((0.0, 0.0), |(abs, sq), err| (abs + err.abs(), sq + err * err));

        Ok(Self {
            count: predictions.len(),
            correlation,
            mean_absolute_error: abs_total / n,
            root_mean_squared_error: (sq_total / n).sqrt(),
        })
    }
}
