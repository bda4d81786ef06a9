use tracing::debug;

use crate::{
    TreeError,
    context::TrainingContext,
    feature::FeatureSpace,
    node::{Branch, FrameSpan, Node, NodeIndex},
    partition::partition_in_place,
    split::SplitCandidate,
};

/// A binary decision tree over frames.
///
/// Stored as an arena-based `Vec<Node>` with index references. Every node's
/// frames are a contiguous span of the single `frames` buffer: splitting a
/// node partitions its span in place and hands each child one half.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) frames: Vec<usize>,
    pub(crate) features: FeatureSpace,
}

impl DecisionTree {
    /// Create a single-leaf tree holding every frame of the training series.
    ///
    /// The leaf classifies as true only when strictly more frames are true.
    pub(crate) fn with_root(ctx: &TrainingContext<'_>, tree: usize) -> Self {
        let frame_count = ctx.frame_count();
        let true_count = (0..frame_count).filter(|&f| ctx.frame_label(f)).count();
        let false_count = frame_count - true_count;
        let classify_as_true = true_count > false_count;
        let misclassified = if classify_as_true {
            false_count
        } else {
            true_count
        };

        debug!(
            tree,
            frame_count,
            true_count,
            classify_as_true,
            misclassified,
            "root created"
        );

        let root = Node::leaf(
            None,
            FrameSpan::new(0, frame_count),
            classify_as_true,
            misclassified,
            tree,
        );
        Self {
            nodes: vec![root],
            frames: (0..frame_count).collect(),
            features: ctx.features(),
        }
    }

    /// Apply `candidate` to the leaf at `node`.
    ///
    /// Partitions the node's frame span in place so frames scoring below the
    /// threshold come first, then creates the two children over the halves
    /// with the candidate's precomputed misclassified counts.
    pub(crate) fn split_node(
        &mut self,
        ctx: &TrainingContext<'_>,
        node: NodeIndex,
        candidate: SplitCandidate,
    ) -> Result<(NodeIndex, NodeIndex), TreeError> {
        let span = self.nodes[node.index()].frames;
        let tree = self.nodes[node.index()].tree;

        let n_lower = partition_in_place(&mut self.frames[span.range()], |&frame| {
            Ok::<_, TreeError>(ctx.score(frame, candidate.feature)? < candidate.threshold)
        })?;
        let (lower_span, high_span) = span.split_at(n_lower);

        debug!(
            node = %node,
            misclassified = self.nodes[node.index()].misclassified,
            feature = %candidate.feature,
            threshold = candidate.threshold,
            true_below = candidate.true_below,
            n_lower,
            n_high_eq = high_span.len(),
            misses = candidate.misses,
            "splitting node"
        );

        let lower = NodeIndex::new(self.nodes.len());
        self.nodes.push(Node::leaf(
            Some(node),
            lower_span,
            candidate.true_below,
            candidate.misses_below,
            tree,
        ));
        let high_eq = NodeIndex::new(self.nodes.len());
        self.nodes.push(Node::leaf(
            Some(node),
            high_span,
            !candidate.true_below,
            candidate.misses_above,
            tree,
        ));

        let parent = &mut self.nodes[node.index()];
        parent.candidate = None;
        parent.branch = Some(Branch {
            feature: candidate.feature,
            threshold: candidate.threshold,
            lower,
            high_eq,
        });

        Ok((lower, high_eq))
    }

    /// Return the root node index.
    #[must_use]
    pub fn root(&self) -> NodeIndex {
        NodeIndex::new(0)
    }

    /// Borrow the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` did not come from this tree.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.index()]
    }

    /// Borrow every node in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The training frames that reached the node at `index`.
    #[must_use]
    pub fn node_frames(&self, index: NodeIndex) -> &[usize] {
        &self.frames[self.node(index).frames.range()]
    }

    /// Return the frame size the tree was trained on.
    #[must_use]
    pub fn frame_size(&self) -> usize {
        self.features.frame_size()
    }

    /// Number of nodes in the subtree rooted at the root, counted recursively.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.subtree_size(self.root())
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Sum of leaf misclassified counts.
    #[must_use]
    pub fn total_errors(&self) -> usize {
        self.subtree_errors(self.root())
    }

    /// Return the maximum depth of the tree. A lone root has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0usize;
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((index, d)) = stack.pop() {
            match self.node(index).branch() {
                None => max_depth = max_depth.max(d),
                Some(branch) => {
                    stack.push((branch.lower, d + 1));
                    stack.push((branch.high_eq, d + 1));
                }
            }
        }
        max_depth
    }

    /// Classify one frame of `frame_size` samples.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFrameMismatch`] when `frame.len() != frame_size`.
    pub fn predict_frame(&self, frame: &[i64]) -> Result<bool, TreeError> {
        let leaf = self.leaf_for(frame)?;
        Ok(self.node(leaf).classify_as_true())
    }

    /// Training true-fraction of the leaf `frame` lands in.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFrameMismatch`] when `frame.len() != frame_size`.
    pub fn score_frame(&self, frame: &[i64]) -> Result<f64, TreeError> {
        let leaf = self.leaf_for(frame)?;
        Ok(self.node(leaf).true_fraction())
    }

    /// Walk from the root to the leaf `frame` lands in.
    fn leaf_for(&self, frame: &[i64]) -> Result<NodeIndex, TreeError> {
        if frame.len() != self.frame_size() {
            return Err(TreeError::PredictionFrameMismatch {
                expected: self.frame_size(),
                got: frame.len(),
            });
        }
        let mut index = self.root();
        while let Some(branch) = self.node(index).branch() {
            let score = self.features.score(frame, 0, branch.feature)?;
            index = if score < branch.threshold {
                branch.lower
            } else {
                branch.high_eq
            };
        }
        Ok(index)
    }

    fn subtree_size(&self, index: NodeIndex) -> usize {
        match self.node(index).branch() {
            None => 1,
            Some(branch) => 1 + self.subtree_size(branch.lower) + self.subtree_size(branch.high_eq),
        }
    }

    fn subtree_errors(&self, index: NodeIndex) -> usize {
        let node = self.node(index);
        match node.branch() {
            None => node.misclassified(),
            Some(branch) => self.subtree_errors(branch.lower) + self.subtree_errors(branch.high_eq),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureIndex;

    const SAMPLES: [i64; 7] = [10, 15, 11, 12, 8, 3, 7];
    const LABELS: [u8; 7] = [0, 1, 0, 1, 0, 0, 1];

    #[test]
    fn root_seed_for_balanced_scenario() {
        let ctx = TrainingContext::for_tests(&SAMPLES, &LABELS, 2);
        let tree = DecisionTree::with_root(&ctx, 0);
        let root = tree.node(tree.root());
        // Three true frames out of six: a tie classifies as false.
        assert!(!root.classify_as_true());
        assert_eq!(root.misclassified(), 3);
        assert_eq!(tree.node_frames(tree.root()), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn root_majority_true() {
        let samples = [1, 2, 3, 4, 5];
        let labels = [0, 1, 1, 0, 1];
        let ctx = TrainingContext::for_tests(&samples, &labels, 1);
        let tree = DecisionTree::with_root(&ctx, 0);
        let root = tree.node(tree.root());
        assert!(root.classify_as_true());
        assert_eq!(root.misclassified(), 2);
    }

    #[test]
    fn split_node_partitions_span() {
        let ctx = TrainingContext::for_tests(&SAMPLES, &LABELS, 2);
        let mut tree = DecisionTree::with_root(&ctx, 0);
        let candidate = SplitCandidate {
            threshold: 1,
            feature: FeatureIndex::new(2),
            true_below: false,
            misses: 0,
            misses_below: 0,
            misses_above: 0,
        };
        let (lower, high_eq) = tree.split_node(&ctx, tree.root(), candidate).unwrap();

        let mut lower_frames = tree.node_frames(lower).to_vec();
        lower_frames.sort_unstable();
        let mut high_frames = tree.node_frames(high_eq).to_vec();
        high_frames.sort_unstable();
        // Differences are [5, -4, 1, -4, -5, 4].
        assert_eq!(lower_frames, vec![1, 3, 4]);
        assert_eq!(high_frames, vec![0, 2, 5]);

        assert!(!tree.node(lower).classify_as_true());
        assert!(tree.node(high_eq).classify_as_true());
        assert_eq!(tree.node(lower).parent(), Some(tree.root()));
        assert!(!tree.node(tree.root()).is_leaf());
        assert_eq!(tree.n_nodes(), 3);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.total_errors(), 0);
    }

    #[test]
    fn predict_follows_threshold() {
        let ctx = TrainingContext::for_tests(&SAMPLES, &LABELS, 2);
        let mut tree = DecisionTree::with_root(&ctx, 0);
        let candidate = SplitCandidate {
            threshold: 1,
            feature: FeatureIndex::new(2),
            true_below: false,
            misses: 0,
            misses_below: 0,
            misses_above: 0,
        };
        tree.split_node(&ctx, tree.root(), candidate).unwrap();

        assert!(tree.predict_frame(&[10, 15]).unwrap());
        assert!(!tree.predict_frame(&[8, 3]).unwrap());
        // Difference exactly at the threshold goes high-or-equal.
        assert!(tree.predict_frame(&[0, 1]).unwrap());
        assert!((tree.score_frame(&[3, 7]).unwrap() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn prediction_frame_mismatch() {
        let ctx = TrainingContext::for_tests(&SAMPLES, &LABELS, 2);
        let tree = DecisionTree::with_root(&ctx, 0);
        let err = tree.predict_frame(&[1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            TreeError::PredictionFrameMismatch { expected: 2, got: 3 }
        ));
    }
}
