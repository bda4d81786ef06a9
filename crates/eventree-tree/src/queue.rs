//! Global best-first queue of splittable leaves.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::node::NodeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    reduction: usize,
    tree: usize,
    node: NodeIndex,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on reduction; earlier (tree, node) wins ties.
        self.reduction
            .cmp(&other.reduction)
            .then_with(|| other.tree.cmp(&self.tree))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Leaves awaiting a split, ranked by how many misclassified frames their
/// precomputed candidate would remove.
#[derive(Debug, Default)]
pub(crate) struct GrowthQueue {
    heap: BinaryHeap<QueueEntry>,
}

impl GrowthQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, tree: usize, node: NodeIndex, reduction: usize) {
        self.heap.push(QueueEntry {
            reduction,
            tree,
            node,
        });
    }

    /// Remove the leaf with the largest reduction.
    pub(crate) fn pop(&mut self) -> Option<(usize, NodeIndex)> {
        self.heap.pop().map(|e| (e.tree, e.node))
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}
