//! Receiver operating characteristic curves.

use tracing::{debug, instrument};

use crate::area::{auc, fp_eq};
use crate::error::GradingError;

/// A ROC curve, one point per distinct prediction threshold.
///
/// Points run from the lowest threshold, where every frame is predicted
/// positive and both rates are 1, towards the highest.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    /// False-positive rate at each threshold.
    pub fpr: Vec<f64>,
    /// True-positive rate at each threshold.
    pub tpr: Vec<f64>,
    /// Prediction threshold for each point.
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Number of points on the curve.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fpr.len()
    }

    /// Whether the curve has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fpr.is_empty()
    }
}

/// Area under the ROC curve of `predictions` against `actual`.
///
/// # Errors
///
/// Propagates every error of [`roc_curve`] and [`auc`].
#[instrument(skip_all, fields(n = actual.len()))]
pub fn roc_auc_score(actual: &[u8], predictions: &[f64]) -> Result<f64, GradingError> {
    let curve = roc_curve(actual, predictions)?;
    let area = auc(&curve.fpr, &curve.tpr, true)?;
    debug!(area, n_points = curve.len(), "roc auc computed");
    Ok(area)
}

/// Build the ROC curve of `predictions` against `{0, 1}` labels.
///
/// At each distinct prediction threshold `t` the curve records the share of
/// negatives and positives predicted at or above `t`. When some negative
/// outscores every threshold boundary a final `(0, 0)` point is appended
/// with threshold `max + 1`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`GradingError::LengthMismatch`] | `actual.len() != predictions.len()` |
/// | [`GradingError::EmptyInput`] | no labels |
/// | [`GradingError::InvalidLabel`] | a label other than 0 or 1 |
/// | [`GradingError::NonFinitePrediction`] | a NaN or infinite prediction |
/// | [`GradingError::SingleClass`] | labels are all 0 or all 1 |
pub fn roc_curve(actual: &[u8], predictions: &[f64]) -> Result<RocCurve, GradingError> {
    validate(actual, predictions)?;

    let mut pairs: Vec<(f64, u8)> = predictions.iter().copied().zip(actual.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let positives = actual.iter().filter(|&&l| l == 1).count();
    let negatives = actual.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(GradingError::SingleClass {
            positives,
            negatives,
        });
    }

    let mut fps: Vec<usize> = Vec::new();
    let mut tps: Vec<usize> = Vec::new();
    let mut thresholds: Vec<f64> = Vec::new();
    let (mut false_pos, mut true_pos) = (negatives, positives);
    for (i, &(prediction, label)) in pairs.iter().enumerate() {
        if i == 0 || !fp_eq(prediction, pairs[i - 1].0) {
            fps.push(false_pos);
            tps.push(true_pos);
            thresholds.push(prediction);
        }
        if label == 1 {
            true_pos -= 1;
        } else {
            false_pos -= 1;
        }
    }

    if let (Some(&last_fp), Some(&last_threshold)) = (fps.last(), thresholds.last()) {
        if last_fp != 0 {
            fps.push(0);
            tps.push(0);
            thresholds.push(last_threshold + 1.0);
        }
    }

    let fpr = fps.iter().map(|&c| c as f64 / negatives as f64).collect();
    let tpr = tps.iter().map(|&c| c as f64 / positives as f64).collect();

    debug!(
        positives,
        negatives,
        n_thresholds = thresholds.len(),
        "roc curve built"
    );

    Ok(RocCurve {
        fpr,
        tpr,
        thresholds,
    })
}

fn validate(actual: &[u8], predictions: &[f64]) -> Result<(), GradingError> {
    if actual.len() != predictions.len() {
        return Err(GradingError::LengthMismatch {
            n_actual: actual.len(),
            n_predictions: predictions.len(),
        });
    }
    if actual.is_empty() {
        return Err(GradingError::EmptyInput);
    }
    if let Some((index, &value)) = actual.iter().enumerate().find(|&(_, &v)| v > 1) {
        return Err(GradingError::InvalidLabel { index, value });
    }
    if let Some((index, &value)) = predictions.iter().enumerate().find(|&(_, v)| !v.is_finite()) {
        return Err(GradingError::NonFinitePrediction { index, value });
    }
    Ok(())
}
