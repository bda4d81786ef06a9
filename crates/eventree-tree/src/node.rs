use std::fmt;
use std::ops::Range;

use crate::feature::FeatureIndex;
use crate::split::SplitCandidate;

/// Index into a `Vec<Node>` arena, identifying a specific node in a decision tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Create a new node index from a zero-based arena position.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A contiguous view into a tree's frame-index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameSpan {
    start: usize,
    len: usize,
}

impl FrameSpan {
    pub(crate) fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Offset of the first frame index in the tree's buffer.
    #[must_use]
    pub fn start(self) -> usize {
        self.start
    }

    /// Number of frames reaching the node.
    #[must_use]
    pub fn len(self) -> usize {
        self.len
    }

    /// Return `true` when no frame reaches the node.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// The buffer range covered by this span.
    #[must_use]
    pub fn range(self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Split into `[start, start + at)` and the remainder.
    pub(crate) fn split_at(self, at: usize) -> (Self, Self) {
        debug_assert!(at <= self.len);
        (
            Self::new(self.start, at),
            Self::new(self.start + at, self.len - at),
        )
    }
}

/// Decision data of a split node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Branch {
    /// Feature compared against the threshold.
    pub feature: FeatureIndex,
    /// Frames scoring `< threshold` go to `lower`, the rest to `high_eq`.
    pub threshold: i64,
    /// Child receiving frames below the threshold.
    pub lower: NodeIndex,
    /// Child receiving frames at or above the threshold.
    pub high_eq: NodeIndex,
}

/// A node in a decision tree arena.
///
/// Children and parent are [`NodeIndex`] handles into the same `Vec<Node>`;
/// the frames reaching the node are a [`FrameSpan`] into the tree's single
/// frame-index buffer.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) frames: FrameSpan,
    pub(crate) classify_as_true: bool,
    pub(crate) misclassified: usize,
    pub(crate) branch: Option<Branch>,
    pub(crate) tree: usize,
    /// Best split found for this leaf, consumed when it becomes a branch.
    #[serde(skip)]
    pub(crate) candidate: Option<SplitCandidate>,
}

impl Node {
    pub(crate) fn leaf(
        parent: Option<NodeIndex>,
        frames: FrameSpan,
        classify_as_true: bool,
        misclassified: usize,
        tree: usize,
    ) -> Self {
        Self {
            parent,
            frames,
            classify_as_true,
            misclassified,
            branch: None,
            tree,
            candidate: None,
        }
    }

    /// Parent node, `None` for a root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Frames reaching this node.
    #[must_use]
    pub fn frames(&self) -> FrameSpan {
        self.frames
    }

    /// Majority classification of the frames reaching this node.
    #[must_use]
    pub fn classify_as_true(&self) -> bool {
        self.classify_as_true
    }

    /// Number of frames whose label disagrees with [`Node::classify_as_true`].
    #[must_use]
    pub fn misclassified(&self) -> usize {
        self.misclassified
    }

    /// Decision data, present once the node has been split.
    #[must_use]
    pub fn branch(&self) -> Option<&Branch> {
        self.branch.as_ref()
    }

    /// Index of the tree this node belongs to.
    #[must_use]
    pub fn tree(&self) -> usize {
        self.tree
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.branch.is_none()
    }

    /// Fraction of this node's training frames labelled true.
    ///
    /// An empty node reports its classification as 0.0 or 1.0.
    #[must_use]
    pub fn true_fraction(&self) -> f64 {
        let n = self.frames.len();
        if n == 0 {
            return if self.classify_as_true { 1.0 } else { 0.0 };
        }
        let misclassified = self.misclassified.min(n);
        let trues = if self.classify_as_true {
            n - misclassified
        } else {
            misclassified
        };
        trues as f64 / n as f64
    }
}
