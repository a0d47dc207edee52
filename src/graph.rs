//! Immutable lookup view over a node/edge snapshot.

use crate::domain::{Edge, Node, NodeData, NodeId, NodeKind};
use std::collections::HashMap;

/// A snapshot of the editing surface: nodes and directed edges.
///
/// Rebuilt whenever the editor changes; nothing derived from it is cached.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<NodeId, usize>,
}

impl FlowGraph {
    /// Build the view. When ids repeat, the first node wins lookups.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            index.entry(node.id.clone()).or_insert(i);
        }
        Self {
            nodes,
            edges,
            index,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Edges leaving `id`, in input order.
    pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.source == id)
    }

    /// Edges entering `id`, in input order.
    pub fn incoming<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.target == id)
    }

    pub fn has_incoming(&self, id: &NodeId) -> bool {
        self.incoming(id).next().is_some()
    }

    pub fn has_wallet(&self) -> bool {
        self.nodes.iter().any(|n| n.kind() == NodeKind::Wallet)
    }

    /// The first wallet node's configured address, if any.
    pub fn wallet_address(&self) -> Option<&str> {
        self.nodes.iter().find_map(|n| match &n.data {
            NodeData::Wallet { address } => address.as_deref(),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Position;

    fn wallet(id: &str) -> Node {
        Node::new(
            id,
            Position::default(),
            NodeData::Wallet {
                address: Some("0xw".into()),
            },
        )
    }

    fn stake(id: &str) -> Node {
        Node::new(
            id,
            Position::default(),
            NodeData::Stake {
                asset: "SUI".into(),
                amount: "1".into(),
                protocol: None,
            },
        )
    }

    #[test]
    fn test_lookup_and_adjacency() {
        let graph = FlowGraph::new(
            vec![wallet("w"), stake("a"), stake("b")],
            vec![Edge::new("w", "a"), Edge::new("a", "b")],
        );
        assert!(graph.has_wallet());
        assert_eq!(graph.wallet_address(), Some("0xw"));
        assert_eq!(
            graph.node(&NodeId::new("a")).map(Node::kind),
            Some(NodeKind::Stake)
        );

        let a = NodeId::new("a");
        assert_eq!(graph.outgoing(&a).count(), 1);
        assert_eq!(graph.incoming(&a).count(), 1);
        assert!(!graph.has_incoming(&NodeId::new("w")));
    }

    #[test]
    fn test_stale_ids_yield_nothing() {
        let graph = FlowGraph::new(vec![stake("a")], vec![Edge::new("ghost", "a")]);
        assert!(graph.node(&NodeId::new("ghost")).is_none());
        assert!(!graph.has_wallet());
    }

    #[test]
    fn test_first_duplicate_id_wins() {
        let graph = FlowGraph::new(vec![stake("a"), wallet("a")], vec![]);
        assert_eq!(
            graph.node(&NodeId::new("a")).map(Node::kind),
            Some(NodeKind::Stake)
        );
    }
}
