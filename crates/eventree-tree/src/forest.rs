//! Forest training: validation, root seeding, and best-first growth.

use tracing::{debug, info, instrument};

use crate::config::ForestConfig;
use crate::context::TrainingContext;
use crate::error::TreeError;
use crate::queue::GrowthQueue;
use crate::split::evaluate_best_split;
use crate::tree::DecisionTree;

/// A fitted forest of frame decision trees.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Forest {
    pub(crate) trees: Vec<DecisionTree>,
    pub(crate) config: ForestConfig,
    pub(crate) n_frames: usize,
}

impl Forest {
    /// Total number of nodes across all trees.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.trees.iter().map(DecisionTree::n_nodes).sum()
    }

    /// Mean over trees of the summed leaf misclassified counts.
    #[must_use]
    pub fn average_error(&self) -> f64 {
        let errors: usize = self.trees.iter().map(DecisionTree::total_errors).sum();
        errors as f64 / self.trees.len() as f64
    }

    /// Borrow the fitted trees.
    #[must_use]
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return the frame size the forest was trained on.
    #[must_use]
    pub fn frame_size(&self) -> usize {
        self.config.frame_size
    }

    /// Return the number of frames in the training series.
    #[must_use]
    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    /// Return the configuration the forest was trained with.
    #[must_use]
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

fn validate(config: &ForestConfig, samples: &[i64], labels: &[u8]) -> Result<(), TreeError> {
    if config.tree_count != 1 {
        return Err(TreeError::UnsupportedTreeCount {
            tree_count: config.tree_count,
        });
    }
    if samples.len() != labels.len() {
        return Err(TreeError::LengthMismatch {
            n_samples: samples.len(),
            n_labels: labels.len(),
        });
    }
    if config.frame_size > samples.len() {
        return Err(TreeError::FrameSizeExceedsSeries {
            frame_size: config.frame_size,
            n_samples: samples.len(),
        });
    }
    if let Some((index, &value)) = labels.iter().enumerate().find(|&(_, &v)| v > 1) {
        return Err(TreeError::InvalidLabel { index, value });
    }
    Ok(())
}

/// Train every tree through one global growth queue.
///
/// The loop pops the leaf whose candidate removes the most misclassified
/// frames. It halts for good the first time the popped leaf has no
/// candidate or already misclassifies fewer than `min_misclassified` frames.
#[instrument(skip_all, fields(frame_size = config.frame_size, n_samples = samples.len()))]
pub(crate) fn train_with(
    config: &ForestConfig,
    samples: &[i64],
    labels: &[u8],
) -> Result<Forest, TreeError> {
    validate(config, samples, labels)?;

    let ctx = TrainingContext::new(samples, labels, config.frame_size, config.tree_count)
        .with_threshold_sweep(config.threshold_sweep)
        .with_feature_reuse(config.feature_reuse);

    info!(
        n_frames = ctx.frame_count(),
        n_features = ctx.features().n_features(),
        n_trees = config.tree_count,
        min_misclassified = config.min_misclassified,
        "training forest"
    );

    let mut trees: Vec<DecisionTree> = Vec::with_capacity(config.tree_count);
    let mut queue = GrowthQueue::new();
    for tree_index in 0..config.tree_count {
        let mut tree = DecisionTree::with_root(&ctx, tree_index);
        let root = tree.root();
        let candidate = evaluate_best_split(&ctx, &tree.nodes, &tree.frames, root)?;
        let reduction = candidate.map_or(0, |c| c.reduction(tree.node(root).misclassified()));
        tree.nodes[root.index()].candidate = candidate;
        queue.push(tree_index, root, reduction);
        trees.push(tree);
    }

    let mut n_splits = 0usize;
    while let Some((tree_index, index)) = queue.pop() {
        let tree = &mut trees[tree_index];
        let leaf = tree.node(index);
        let Some(candidate) = leaf.candidate else {
            debug!(node = %index, "best leaf has no improving split");
            break;
        };
        if leaf.misclassified() < config.min_misclassified {
            debug!(
                node = %index,
                misclassified = leaf.misclassified(),
                "best leaf below stopping threshold"
            );
            break;
        }

        let (lower, high_eq) = tree.split_node(&ctx, index, candidate)?;
        n_splits += 1;

        for child in [lower, high_eq] {
            let misclassified = tree.node(child).misclassified();
            if misclassified == 0 {
                continue;
            }
            if let Some(candidate) = evaluate_best_split(&ctx, &tree.nodes, &tree.frames, child)? {
                tree.nodes[child.index()].candidate = Some(candidate);
                queue.push(tree_index, child, candidate.reduction(misclassified));
            }
        }
        debug!(queued = queue.len(), "growth step complete");
    }

    let forest = Forest {
        trees,
        config: config.clone(),
        n_frames: ctx.frame_count(),
    };

    info!(
        n_splits,
        node_count = forest.node_count(),
        average_error = forest.average_error(),
        "forest training complete"
    );

    Ok(forest)
}
