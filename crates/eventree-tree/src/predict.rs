//! Prediction methods for the fitted forest.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::TreeError;
use crate::forest::Forest;

impl Forest {
    /// Classify one frame of `frame_size` samples.
    ///
    /// Returns the majority vote of the trees; a tied vote is false.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFrameMismatch`] when `frame.len() != frame_size`.
    pub fn predict_frame(&self, frame: &[i64]) -> Result<bool, TreeError> {
        let mut votes = 0usize;
        for tree in &self.trees {
            if tree.predict_frame(frame)? {
                votes += 1;
            }
        }
        Ok(votes * 2 > self.trees.len())
    }

    /// Score one frame in `[0, 1]`: the mean training true-fraction of the
    /// leaves it reaches.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFrameMismatch`] when `frame.len() != frame_size`.
    pub fn score_frame(&self, frame: &[i64]) -> Result<f64, TreeError> {
        let mut total = 0.0f64;
        for tree in &self.trees {
            total += tree.score_frame(frame)?;
        }
        Ok(total / self.trees.len() as f64)
    }

    /// Classify every frame of a series in parallel.
    ///
    /// Element `i` is the prediction for `samples[i..i + frame_size]`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::FrameSizeExceedsSeries`] when the series is
    /// shorter than one frame.
    pub fn predict_series(&self, samples: &[i64]) -> Result<Vec<bool>, TreeError> {
        let n_frames = self.series_frames(samples)?;
        let frame_size = self.frame_size();
        (0..n_frames)
            .into_par_iter()
            .map(|start| self.predict_frame(&samples[start..start + frame_size]))
            .collect()
    }

    /// Score every frame of a series in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::FrameSizeExceedsSeries`] when the series is
    /// shorter than one frame.
    pub fn score_series(&self, samples: &[i64]) -> Result<Vec<f64>, TreeError> {
        let n_frames = self.series_frames(samples)?;
        let frame_size = self.frame_size();
        (0..n_frames)
            .into_par_iter()
            .map(|start| self.score_frame(&samples[start..start + frame_size]))
            .collect()
    }

    fn series_frames(&self, samples: &[i64]) -> Result<usize, TreeError> {
        let frame_size = self.frame_size();
        if frame_size > samples.len() {
            return Err(TreeError::FrameSizeExceedsSeries {
                frame_size,
                n_samples: samples.len(),
            });
        }
        Ok(samples.len() - frame_size + 1)
    }
}

/// End-aligned frame labels: element `i` is `labels[i + frame_size - 1]`.
///
/// Returns an empty vector when `frame_size` is zero or exceeds the series.
#[must_use]
pub fn frame_labels(labels: &[u8], frame_size: usize) -> Vec<u8> {
    if frame_size == 0 || frame_size > labels.len() {
        return Vec::new();
    }
    labels[frame_size - 1..].to_vec()
}
