//! Best-first binary decision trees over frames of an integer series.
//!
//! A frame is a fixed-length window of the series labelled by its last
//! sample. Trees split frames on raw-value and first-difference features,
//! partitioning one shared frame-index buffer in place, and grow leaf by
//! leaf from a global queue ranked by misclassification reduction.

mod config;
mod context;
mod error;
mod feature;
mod forest;
mod node;
mod partition;
mod predict;
mod queue;
mod serialize;
mod split;
mod tree;

pub use config::{ForestConfig, train};
pub use error::TreeError;
pub use feature::{FeatureIndex, FeatureKind, FeatureSpace};
pub use forest::Forest;
pub use node::{Branch, FrameSpan, Node, NodeIndex};
pub use predict::frame_labels;
pub use split::{FeatureReuse, SplitCandidate, ThresholdSweep};
pub use tree::DecisionTree;
