//! Frame features: raw sample values and first differences.
//!
//! A frame is the window `samples[start..start + frame_size]`. Its feature
//! space has `2 * frame_size - 1` entries:
//!
//! | Index range                      | Score                                   |
//! |----------------------------------|-----------------------------------------|
//! | `[0, frame_size)`                | `samples[start + i]`                    |
//! | `[frame_size, 2 * frame_size - 1)` | `samples[start + k + 1] - samples[start + k]`, `k = i - frame_size` |
//!
//! Differences wrap on `i64` overflow.

use std::fmt;

use crate::error::TreeError;

/// Zero-based index into a frame's feature space.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct FeatureIndex(usize);

impl FeatureIndex {
    /// Create a feature index. Validity is checked against a [`FeatureSpace`].
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based feature index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FeatureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a feature index measures within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// The raw sample at `offset` within the frame.
    Raw {
        /// Offset from the frame start.
        offset: usize,
    },
    /// `frame[offset + 1] - frame[offset]`.
    Difference {
        /// Offset of the first sample of the pair.
        offset: usize,
    },
}

/// The feature space of frames of a fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FeatureSpace {
    frame_size: usize,
}

impl FeatureSpace {
    /// Create the feature space for frames of `frame_size` samples.
    #[must_use]
    pub fn new(frame_size: usize) -> Self {
        Self { frame_size }
    }

    /// Return the frame size.
    #[must_use]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Return the number of features, `2 * frame_size - 1`.
    #[must_use]
    pub fn n_features(&self) -> usize {
        (2 * self.frame_size).saturating_sub(1)
    }

    /// Iterate over every feature index in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = FeatureIndex> + use<> {
        (0..self.n_features()).map(FeatureIndex::new)
    }

    /// Classify a feature index.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnsupportedFeature`] when `feature >= n_features()`.
    pub fn kind(&self, feature: FeatureIndex) -> Result<FeatureKind, TreeError> {
        let i = feature.index();
        if i < self.frame_size {
            Ok(FeatureKind::Raw { offset: i })
        } else if i < self.n_features() {
            Ok(FeatureKind::Difference {
                offset: i - self.frame_size,
            })
        } else {
            Err(TreeError::UnsupportedFeature {
                feature: i,
                n_features: self.n_features(),
            })
        }
    }

    /// Score the frame starting at `frame_start` on `feature`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::FrameOutOfRange`] | `frame_start + frame_size > samples.len()` |
    /// | [`TreeError::UnsupportedFeature`] | `feature >= n_features()` |
    pub fn score(
        &self,
        samples: &[i64],
        frame_start: usize,
        feature: FeatureIndex,
    ) -> Result<i64, TreeError> {
        if frame_start + self.frame_size > samples.len() {
            return Err(TreeError::FrameOutOfRange {
                frame_start,
                frame_size: self.frame_size,
                n_samples: samples.len(),
            });
        }
        let score = match self.kind(feature)? {
            FeatureKind::Raw { offset } => samples[frame_start + offset],
            FeatureKind::Difference { offset } => {
                let first = frame_start + offset;
                samples[first + 1].wrapping_sub(samples[first])
            }
        };
        Ok(score)
    }
}
