//! Per-call training state.

use crate::error::TreeError;
use crate::feature::{FeatureIndex, FeatureSpace};
use crate::split::{FeatureReuse, ThresholdSweep};

/// Borrowed inputs and policies for a single training call.
///
/// Built fresh by every `fit` and passed by reference to the split search and
/// partition routines; nothing here outlives the call.
#[derive(Debug)]
pub(crate) struct TrainingContext<'a> {
    samples: &'a [i64],
    labels: &'a [u8],
    features: FeatureSpace,
    frame_count: usize,
    /// Allowed features per tree.
    allowed: Vec<Vec<FeatureIndex>>,
    pub(crate) threshold_sweep: ThresholdSweep,
    pub(crate) feature_reuse: FeatureReuse,
}

impl<'a> TrainingContext<'a> {
    /// Callers validate that `frame_size <= samples.len() == labels.len()`.
    pub(crate) fn new(
        samples: &'a [i64],
        labels: &'a [u8],
        frame_size: usize,
        tree_count: usize,
    ) -> Self {
        let features = FeatureSpace::new(frame_size);
        let full: Vec<FeatureIndex> = features.iter().collect();
        Self {
            samples,
            labels,
            features,
            frame_count: samples.len() + 1 - frame_size,
            allowed: vec![full; tree_count],
            threshold_sweep: ThresholdSweep::default(),
            feature_reuse: FeatureReuse::default(),
        }
    }

    pub(crate) fn with_threshold_sweep(mut self, threshold_sweep: ThresholdSweep) -> Self {
        self.threshold_sweep = threshold_sweep;
        self
    }

    pub(crate) fn with_feature_reuse(mut self, feature_reuse: FeatureReuse) -> Self {
        self.feature_reuse = feature_reuse;
        self
    }

    pub(crate) fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub(crate) fn features(&self) -> FeatureSpace {
        self.features
    }

    pub(crate) fn allowed_features(&self, tree: usize) -> &[FeatureIndex] {
        &self.allowed[tree]
    }

    /// The label of a frame is the label of its last sample.
    pub(crate) fn frame_label(&self, frame: usize) -> bool {
        self.labels[frame + self.features.frame_size() - 1] == 1
    }

    pub(crate) fn score(&self, frame: usize, feature: FeatureIndex) -> Result<i64, TreeError> {
        self.features.score(self.samples, frame, feature)
    }

    #[cfg(test)]
    pub(crate) fn for_tests(samples: &'a [i64], labels: &'a [u8], frame_size: usize) -> Self {
        Self::new(samples, labels, frame_size, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_and_end_aligned_labels() {
        let samples = [10, 15, 11, 12, 8, 3, 7];
        let labels = [0, 1, 0, 1, 0, 0, 1];
        let ctx = TrainingContext::for_tests(&samples, &labels, 2);
        assert_eq!(ctx.frame_count(), 6);
        // Frame 0 covers samples[0..2] and takes labels[1].
        assert!(ctx.frame_label(0));
        assert!(!ctx.frame_label(1));
        assert!(ctx.frame_label(5));
    }

    #[test]
    fn every_tree_starts_with_the_full_space() {
        let samples = [1, 2, 3, 4];
        let labels = [0, 0, 1, 1];
        let ctx = TrainingContext::new(&samples, &labels, 3, 1);
        assert_eq!(ctx.allowed_features(0).len(), 5);
    }
}
