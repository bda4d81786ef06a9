//! Configuration builder for forest training.

use crate::error::TreeError;
use crate::forest::Forest;
use crate::split::{FeatureReuse, ThresholdSweep};

/// Configuration for training a forest over framed samples.
///
/// Construct via [`ForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter           | Default          |
/// |---------------------|------------------|
/// | `tree_count`        | 1                |
/// | `min_misclassified` | 0                |
/// | `threshold_sweep`   | `EveryPosition`  |
/// | `feature_reuse`     | `Allowed`        |
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ForestConfig {
    pub(crate) frame_size: usize,
    pub(crate) tree_count: usize,
    pub(crate) min_misclassified: usize,
    pub(crate) threshold_sweep: ThresholdSweep,
    pub(crate) feature_reuse: FeatureReuse,
}

impl ForestConfig {
    /// Create a new config for frames of `frame_size` samples.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidFrameSize`] if `frame_size` is zero.
    pub fn new(frame_size: usize) -> Result<Self, TreeError> {
        if frame_size == 0 {
            return Err(TreeError::InvalidFrameSize { frame_size });
        }
        Ok(Self {
            frame_size,
            tree_count: 1,
            min_misclassified: 0,
            threshold_sweep: ThresholdSweep::default(),
            feature_reuse: FeatureReuse::default(),
        })
    }

    // --- Setters ---

    /// Set the number of trees. Training rejects anything but 1.
    #[must_use]
    pub fn with_tree_count(mut self, tree_count: usize) -> Self {
        self.tree_count = tree_count;
        self
    }

    /// Stop growing once the best leaf misclassifies fewer frames than this.
    #[must_use]
    pub fn with_min_misclassified(mut self, min_misclassified: usize) -> Self {
        self.min_misclassified = min_misclassified;
        self
    }

    /// Set which sorted positions the threshold sweep evaluates.
    #[must_use]
    pub fn with_threshold_sweep(mut self, threshold_sweep: ThresholdSweep) -> Self {
        self.threshold_sweep = threshold_sweep;
        self
    }

    /// Set whether nodes may reuse features chosen by their ancestors.
    #[must_use]
    pub fn with_feature_reuse(mut self, feature_reuse: FeatureReuse) -> Self {
        self.feature_reuse = feature_reuse;
        self
    }

    // --- Getters ---

    /// Return the frame size.
    #[must_use]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Return the number of trees.
    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.tree_count
    }

    /// Return the minimum-misclassified stopping threshold.
    #[must_use]
    pub fn min_misclassified(&self) -> usize {
        self.min_misclassified
    }

    /// Return the threshold sweep policy.
    #[must_use]
    pub fn threshold_sweep(&self) -> ThresholdSweep {
        self.threshold_sweep
    }

    /// Return the feature reuse policy.
    #[must_use]
    pub fn feature_reuse(&self) -> FeatureReuse {
        self.feature_reuse
    }

    /// Train a forest on a sample series and its parallel 0/1 labels.
    ///
    /// # Errors
    ///
    /// | Variant                                 | When                                   |
    /// |-----------------------------------------|----------------------------------------|
    /// | [`TreeError::UnsupportedTreeCount`]     | `tree_count != 1`                      |
    /// | [`TreeError::LengthMismatch`]           | `samples.len() != labels.len()`        |
    /// | [`TreeError::FrameSizeExceedsSeries`]   | `frame_size > samples.len()`           |
    /// | [`TreeError::InvalidLabel`]             | a label is neither 0 nor 1             |
    pub fn fit(&self, samples: &[i64], labels: &[u8]) -> Result<Forest, TreeError> {
        crate::forest::train_with(self, samples, labels)
    }
}

/// Train a single-tree forest with the default policies.
///
/// Equivalent to `ForestConfig::new(frame_size)?` with the given tree count
/// and stopping threshold, followed by [`ForestConfig::fit`].
///
/// # Errors
///
/// See [`ForestConfig::new`] and [`ForestConfig::fit`].
pub fn train(
    samples: &[i64],
    labels: &[u8],
    frame_size: usize,
    tree_count: usize,
    min_misclassified: usize,
) -> Result<Forest, TreeError> {
    ForestConfig::new(frame_size)?
        .with_tree_count(tree_count)
        .with_min_misclassified(min_misclassified)
        .fit(samples, labels)
}
