//! Deterministic execution order over the executable subgraph.

use crate::domain::{Node, NodeId};
use crate::graph::FlowGraph;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, VecDeque};
use thiserror::Error;

/// Nodes whose vertical positions differ by less than this are treated as one row.
pub const ROW_TOLERANCE: f64 = 50.0;

/// Linear execution order plus the 1-based rank of every sequenced node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    pub steps: Vec<Node>,
    pub ranks: BTreeMap<NodeId, usize>,
    /// Executable nodes withheld because they never became ready (cycle members
    /// and everything downstream of a cycle), in input order.
    pub cyclic: Vec<NodeId>,
}

impl Sequence {
    pub fn rank_of(&self, id: &NodeId) -> Option<usize> {
        self.ranks.get(id).copied()
    }

    /// Node at a 1-based rank.
    pub fn at_rank(&self, rank: usize) -> Option<&Node> {
        rank.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.cyclic.is_empty()
    }

    /// Reject a partial result.
    pub fn into_acyclic(self) -> Result<Sequence, SequenceError> {
        if self.cyclic.is_empty() {
            Ok(self)
        } else {
            Err(SequenceError::CycleDetected {
                node_ids: self.cyclic,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("cycle detected among steps: {}", join_ids(.node_ids))]
    CycleDetected { node_ids: Vec<NodeId> },
}

fn join_ids(ids: &[NodeId]) -> String {
    ids.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Row-major canvas order: same row (within [`ROW_TOLERANCE`]) left to right,
/// otherwise top to bottom.
pub fn position_order(a: &Node, b: &Node) -> Ordering {
    let dy = a.position.y - b.position.y;
    if dy.abs() < ROW_TOLERANCE {
        a.position.x.total_cmp(&b.position.x)
    } else {
        a.position.y.total_cmp(&b.position.y)
    }
}

/// Stable insertion sort by [`position_order`].
///
/// The row comparison is not transitive, so `slice::sort_by` is not allowed
/// to see it.
fn sort_by_position(batch: &mut [&Node]) {
    for i in 1..batch.len() {
        let mut j = i;
        while j > 0 && position_order(batch[j - 1], batch[j]) == Ordering::Greater {
            batch.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Compute the execution order with Kahn's algorithm.
///
/// Wallet and selector nodes are excluded and their edges carry no dependency
/// weight. Edges naming unknown nodes are ignored. A graph without a wallet
/// node has no execution context and yields an empty sequence.
pub fn compute_sequence(graph: &FlowGraph) -> Sequence {
    if !graph.has_wallet() {
        return Sequence::default();
    }

    let executable: Vec<&Node> = graph
        .nodes()
        .iter()
        .filter(|n| n.kind().is_executable())
        .filter(|n| graph.node(&n.id).is_some_and(|first| std::ptr::eq(first, *n)))
        .collect();

    let mut in_degree: HashMap<&NodeId, usize> =
        executable.iter().map(|n| (&n.id, 0)).collect();
    let mut adjacency: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();

    for edge in graph.edges() {
        if !in_degree.contains_key(&edge.source) || !in_degree.contains_key(&edge.target) {
            continue;
        }
        adjacency.entry(&edge.source).or_default().push(&edge.target);
        if let Some(degree) = in_degree.get_mut(&edge.target) {
            *degree += 1;
        }
    }

    let mut ready: Vec<&Node> = executable
        .iter()
        .copied()
        .filter(|n| in_degree.get(&n.id) == Some(&0))
        .collect();
    sort_by_position(&mut ready);
    let mut queue: VecDeque<&Node> = ready.into();

    let mut steps: Vec<Node> = Vec::with_capacity(executable.len());
    let mut ranks = BTreeMap::new();

    while let Some(node) = queue.pop_front() {
        steps.push(node.clone());
        ranks.insert(node.id.clone(), steps.len());

        let mut newly_ready: Vec<&Node> = Vec::new();
        for succ in adjacency.get(&node.id).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(*succ) {
                *degree -= 1;
                if *degree == 0 {
                    if let Some(n) = graph.node(succ) {
                        newly_ready.push(n);
                    }
                }
            }
        }
        sort_by_position(&mut newly_ready);
        queue.extend(newly_ready);
    }

    let cyclic = executable
        .iter()
        .filter(|n| !ranks.contains_key(&n.id))
        .map(|n| n.id.clone())
        .collect();

    Sequence {
        steps,
        ranks,
        cyclic,
    }
}
