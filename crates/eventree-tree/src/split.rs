use std::collections::BTreeSet;

use tracing::trace;

use crate::context::TrainingContext;
use crate::error::TreeError;
use crate::feature::FeatureIndex;
use crate::node::{Node, NodeIndex};

/// A split must bring the misclassified count strictly below this fraction
/// of the parent's count (rounded down).
const IMPROVEMENT_BAR: f64 = 0.99;

/// Which sorted positions the threshold sweep evaluates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default,
    serde::Serialize, serde::Deserialize,
)]
pub enum ThresholdSweep {
    /// Every sorted position is a split point, including positions whose
    /// score repeats the previous one.
    #[default]
    EveryPosition,
    /// Only positions where the score differs from the previous one.
    DistinctValues,
}

/// Whether a node may split on features already used by its ancestors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default,
    serde::Serialize, serde::Deserialize,
)]
pub enum FeatureReuse {
    /// Any allowed feature may be chosen at any depth.
    #[default]
    Allowed,
    /// Features chosen by an ancestor branch are removed from the allowed set.
    ExcludeAncestors,
}

/// Best split found for a leaf, not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitCandidate {
    /// Frames scoring `< threshold` go to the lower child.
    pub threshold: i64,
    /// Feature the frames are scored on.
    pub feature: FeatureIndex,
    /// Whether the lower child classifies as true.
    pub true_below: bool,
    /// Total misclassified frames across both children.
    pub misses: usize,
    /// Misclassified frames the lower child will carry.
    pub misses_below: usize,
    /// Misclassified frames the high-or-equal child will carry.
    pub misses_above: usize,
}

impl SplitCandidate {
    /// How many misclassified frames the split removes from a parent
    /// carrying `parent_misclassified`.
    #[must_use]
    pub fn reduction(&self, parent_misclassified: usize) -> usize {
        parent_misclassified.saturating_sub(self.misses_below + self.misses_above)
    }
}

/// Running true/false counts on one side of the sweep position.
#[derive(Debug, Clone, Copy, Default)]
struct LabelCounts {
    trues: usize,
    falses: usize,
}

/// Find the best split of `node` over its allowed features.
///
/// Returns `None` when no feature brings the misclassified count below
/// `floor(0.99 * misclassified)`, or when no feature is allowed.
pub(crate) fn evaluate_best_split(
    ctx: &TrainingContext<'_>,
    nodes: &[Node],
    frame_buffer: &[usize],
    node: NodeIndex,
) -> Result<Option<SplitCandidate>, TreeError> {
    let target = &nodes[node.index()];
    let allowed = allowed_features(ctx, nodes, node);
    if allowed.is_empty() {
        trace!(node = %node, "no features left to split on");
        return Ok(None);
    }

    let upper_bar = (target.misclassified as f64 * IMPROVEMENT_BAR) as usize;
    let frames = &frame_buffer[target.frames.range()];

    let mut best_misses = upper_bar;
    let mut best: Option<SplitCandidate> = None;
    for feature in allowed {
        let candidate = search_best_threshold(ctx, frames, target.misclassified, feature)?;
        if let Some(candidate) = candidate
            && candidate.misses < best_misses
        {
            best_misses = candidate.misses;
            best = Some(candidate);
        }
    }
    Ok(best)
}

/// Features `node` may split on, in ascending order.
fn allowed_features(
    ctx: &TrainingContext<'_>,
    nodes: &[Node],
    node: NodeIndex,
) -> BTreeSet<FeatureIndex> {
    let target = &nodes[node.index()];
    let mut allowed: BTreeSet<FeatureIndex> = ctx.allowed_features(target.tree).iter().copied().collect();
    if ctx.feature_reuse == FeatureReuse::ExcludeAncestors {
        let mut at = target.parent;
        while let Some(ancestor) = at {
            let ancestor = &nodes[ancestor.index()];
            if let Some(branch) = &ancestor.branch {
                allowed.remove(&branch.feature);
            }
            at = ancestor.parent;
        }
    }
    allowed
}

/// Sweep every threshold of `feature` over `frames`.
///
/// Frames are sorted by `(score, frame)` ascending. At each sorted position
/// `p`, frames `[0, p)` are "below" and the threshold is the score at `p`;
/// both labellings of the below side are tried. Only candidates strictly
/// better than `misclassified` are returned.
pub(crate) fn search_best_threshold(
    ctx: &TrainingContext<'_>,
    frames: &[usize],
    misclassified: usize,
    feature: FeatureIndex,
) -> Result<Option<SplitCandidate>, TreeError> {
    let mut scored: Vec<(i64, usize)> = Vec::with_capacity(frames.len());
    let mut above = LabelCounts::default();
    for &frame in frames {
        scored.push((ctx.score(frame, feature)?, frame));
        if ctx.frame_label(frame) {
            above.trues += 1;
        } else {
            above.falses += 1;
        }
    }
    // Frame indices are unique, so this order is total.
    scored.sort_unstable();

    let mut below = LabelCounts::default();
    let mut best_misses = misclassified;
    let mut best: Option<SplitCandidate> = None;

    for (position, &(score, frame)) in scored.iter().enumerate() {
        let repeated = position > 0 && scored[position - 1].0 == score;
        let consider = match ctx.threshold_sweep {
            ThresholdSweep::EveryPosition => true,
            ThresholdSweep::DistinctValues => !repeated,
        };

        if consider {
            let miss_as_false_below = below.trues + above.falses;
            let miss_as_true_below = below.falses + above.trues;
            let candidate = if miss_as_true_below < miss_as_false_below {
                SplitCandidate {
                    threshold: score,
                    feature,
                    true_below: true,
                    misses: miss_as_true_below,
                    misses_below: below.falses,
                    misses_above: above.trues,
                }
            } else {
                SplitCandidate {
                    threshold: score,
                    feature,
                    true_below: false,
                    misses: miss_as_false_below,
                    misses_below: below.trues,
                    misses_above: above.falses,
                }
            };
            if candidate.misses < best_misses {
                best_misses = candidate.misses;
                best = Some(candidate);
            }
        }

        if ctx.frame_label(frame) {
            below.trues += 1;
            above.trues -= 1;
        } else {
            below.falses += 1;
            above.falses -= 1;
        }
    }

    Ok(best)
}
