use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

/// Reconstructed AST as a rooted tree.
///
/// Nodes carry their display label; edges point parent -> child. Node indices
/// are dense and assigned in creation order, so the root (when present) is
/// index 0 and `NodeIndex::index()` doubles as the stable output id.
#[derive(Debug, Default)]
pub struct AstGraph {
    graph: DiGraph<String, ()>,
}

impl AstGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
        }
    }

    /// Add the root node. Must be the first node added.
    pub fn add_root(&mut self, label: impl Into<String>) -> NodeIndex {
        debug_assert_eq!(self.graph.node_count(), 0);
        self.graph.add_node(label.into())
    }

    /// Add a node attached under `parent`.
    pub fn add_child(&mut self, parent: NodeIndex, label: impl Into<String>) -> NodeIndex {
        let child = self.graph.add_node(label.into());
        self.graph.add_edge(parent, child, ());
        child
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn label(&self, node: NodeIndex) -> &str {
        &self.graph[node]
    }

    /// Id of the node's unique parent, if any.
    pub fn parent(&self, node: NodeIndex) -> Option<usize> {
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .next()
            .map(NodeIndex::index)
    }

    /// Labels in creation order, paired with their dense ids.
    pub fn nodes(&self) -> impl Iterator<Item = (usize, &str)> {
        self.graph
            .node_indices()
            .map(|ix| (ix.index(), self.graph[ix].as_str()))
    }

    /// (parent, child) id pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph.edge_indices().map(|e| {
            let (parent, child) = self
                .graph
                .edge_endpoints(e)
                .expect("edge index came from this graph");
            (parent.index(), child.index())
        })
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_in_creation_order() {
        let mut g = AstGraph::new();
        let root = g.add_root("root");
        let a = g.add_child(root, "a");
        let b = g.add_child(root, "b");
        let c = g.add_child(a, "c");

        assert_eq!(root.index(), 0);
        assert_eq!(a.index(), 1);
        assert_eq!(b.index(), 2);
        assert_eq!(c.index(), 3);
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn every_non_root_node_has_exactly_one_parent() {
        let mut g = AstGraph::new();
        let root = g.add_root("root");
        let a = g.add_child(root, "a");
        g.add_child(a, "b");

        assert_eq!(g.parent(root), None);
        for ix in g.node_indices().skip(1) {
            assert!(g.parent(ix).is_some());
        }
    }

    #[test]
    fn edges_report_creation_order_ids() {
        let mut g = AstGraph::new();
        let root = g.add_root("root");
        let a = g.add_child(root, "a");
        g.add_child(a, "b");

        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges, vec![(0, 1), (1, 2)]);
    }
}
