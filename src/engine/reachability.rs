//! Downstream skip marking for failed logic gates.

use super::Sequence;
use crate::domain::NodeId;
use crate::graph::FlowGraph;
use std::collections::{BTreeSet, HashSet};

/// Ranks of every node reachable from `start` whose rank is after `start_rank`.
///
/// Traversal follows all outgoing edges transitively, visiting each node at
/// most once. Nodes without a rank (wallets, selectors, withheld cycle
/// members) are passed through but never marked, and nothing at or before
/// `start_rank` is marked even when an edge loops back.
pub fn mark_downstream(
    start: &NodeId,
    start_rank: usize,
    sequence: &Sequence,
    graph: &FlowGraph,
) -> BTreeSet<usize> {
    let mut skip = BTreeSet::new();
    let mut visited: HashSet<&NodeId> = HashSet::new();
    let mut stack: Vec<&NodeId> = graph.outgoing(start).map(|e| &e.target).collect();
    stack.reverse();

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        if let Some(rank) = sequence.rank_of(id) {
            if rank > start_rank {
                skip.insert(rank);
            }
        }
        let mut next: Vec<&NodeId> = graph
            .outgoing(id)
            .map(|e| &e.target)
            .filter(|t| !visited.contains(t))
            .collect();
        next.reverse();
        stack.extend(next);
    }

    skip
}

/// Node ids for a set of ranks, in rank order.
pub fn ids_for_ranks(ranks: &BTreeSet<usize>, sequence: &Sequence) -> Vec<NodeId> {
    ranks
        .iter()
        .filter_map(|&r| sequence.at_rank(r))
        .map(|n| n.id.clone())
        .collect()
}
