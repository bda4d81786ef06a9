//! ROC curve and area-under-curve scoring for binary event predictions.
//!
//! Scores a vector of real-valued predictions against `{0, 1}` ground truth
//! by sweeping every distinct prediction as a decision threshold.

mod area;
mod error;
mod roc;

pub use area::auc;
pub use error::GradingError;
pub use roc::{RocCurve, roc_auc_score, roc_curve};
