// Priority queue of unsolved subproblems

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::subproblem::Subproblem;
use crate::domain::NodeSelection;

/// Entry in the frontier with its selection key.
struct QueuedNode {
    node: Subproblem,
    key: f64, // Higher = selected first
}

impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher key first, then the earlier-created subproblem
        self.key
            .total_cmp(&other.key)
            .then_with(|| other.node.id().cmp(&self.node.id()))
    }
}

/// Unexplored subproblems, handed out best-first or depth-first.
pub struct Frontier {
    strategy: NodeSelection,
    heap: BinaryHeap<QueuedNode>,
}

impl Frontier {
    pub fn new(strategy: NodeSelection) -> Self {
        Self {
            strategy,
            heap: BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, node: Subproblem) {
        let key = match self.strategy {
            NodeSelection::BestBound => node.bound(),
            NodeSelection::DepthFirst => node.depth() as f64,
        };
        self.heap.push(QueuedNode { node, key });
    }

    pub fn pop(&mut self) -> Option<Subproblem> {
        self.heap.pop().map(|queued| queued.node)
    }

    /// Largest inherited bound still waiting, `None` when empty.
    pub fn best_bound(&self) -> Option<f64> {
        self.heap
            .iter()
            .map(|queued| queued.node.bound())
            .max_by(f64::total_cmp)
    }

    /// Drop every subproblem whose bound cannot beat `incumbent` by more than `tolerance`.
    ///
    /// Returns the number of dropped subproblems.
    pub fn prune_by_bound(&mut self, incumbent: f64, tolerance: f64) -> usize {
        let before = self.heap.len();
        self.heap
            .retain(|queued| queued.node.bound() > incumbent + tolerance);
        before - self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
