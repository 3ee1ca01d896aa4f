use indexmap::{IndexMap, IndexSet};
use petgraph::graph::UnGraph;
use petgraph::prelude::NodeIndex;
use serde::Serialize;

pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NodeKind {
    Variable,
    Row,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub is_integer: bool,
}

/// Hands out dense node ids. One allocator lives in each run context, so every
/// representation built for the same instance gets disjoint ids.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: NodeId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> NodeId {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn allocated(&self) -> usize {
        self.next
    }
}

pub type StructureGraph = UnGraph<Node, ()>;
pub type NodeKey = (NodeKind, String);

/// Undirected simple graph over named nodes.
///
/// Edges are deduplicated and self-loops rejected, so the neighbour lists petgraph keeps
/// are always the exact symmetric closure of the edge set.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    pub graph: StructureGraph,
    pub node_lookup: IndexMap<NodeKey, NodeIndex>,
    edge_set: IndexSet<(NodeIndex, NodeIndex)>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: StructureGraph::with_capacity(nodes, edges),
            node_lookup: IndexMap::with_capacity(nodes),
            edge_set: IndexSet::with_capacity(edges),
        }
    }

    /// Adds a node with a fresh id, or returns the existing node with the same kind and name.
    pub fn add_node(
        &mut self,
        ids: &mut IdAllocator,
        kind: NodeKind,
        name: &str,
        is_integer: bool,
    ) -> NodeIndex {
        let key = (kind, name.to_string());
        if let Some(&idx) = self.node_lookup.get(&key) {
            return idx;
        }
        let node = Node {
            id: ids.allocate(),
            name: key.1.clone(),
            kind,
            is_integer,
        };
        self.insert_node(node)
    }

    /// Inserts a node that already carries its id (used for induced subgraphs).
    pub(crate) fn insert_node(&mut self, node: Node) -> NodeIndex {
        let key = (node.kind, node.name.clone());
        let idx = self.graph.add_node(node);
        self.node_lookup.insert(key, idx);
        idx
    }

    /// Returns `false` for self-loops and for pairs that are already adjacent.
    pub fn add_edge(&mut self, a: NodeIndex, b: NodeIndex) -> bool {
        if a == b {
            return false;
        }
        let pair = if a < b { (a, b) } else { (b, a) };
        if !self.edge_set.insert(pair) {
            return false;
        }
        self.graph.add_edge(pair.0, pair.1, ());
        true
    }

    pub fn contains_edge(&self, a: NodeIndex, b: NodeIndex) -> bool {
        let pair = if a < b { (a, b) } else { (b, a) };
        self.edge_set.contains(&pair)
    }

    pub fn node_index(&self, kind: NodeKind, name: &str) -> Option<NodeIndex> {
        self.node_lookup.get(&(kind, name.to_string())).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Each undirected edge once, as a pair of node ids.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edge_set
            .iter()
            .map(|&(a, b)| (self.graph[a].id, self.graph[b].id))
    }

    /// Neighbours ordered by node id.
    pub fn neighbors(&self, idx: NodeIndex) -> Vec<&Node> {
        let mut neighbors: Vec<&Node> = self.graph.neighbors(idx).map(|n| &self.graph[n]).collect();
        neighbors.sort_by_key(|node| node.id);
        neighbors
    }

    pub fn neighbors_by_name(&self, kind: NodeKind, name: &str) -> Vec<&Node> {
        self.node_index(kind, name)
            .map(|idx| self.neighbors(idx))
            .unwrap_or_default()
    }

    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors(idx).count()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn integer_node_count(&self) -> usize {
        self.nodes().filter(|node| node.is_integer).count()
    }

    /// Induced subgraph over `indices`, keeping node ids and names.
    pub fn induced_subgraph(&self, indices: &[NodeIndex]) -> GraphModel {
        let mut sub = GraphModel::with_capacity(indices.len(), indices.len());
        let mut mapping: IndexMap<NodeIndex, NodeIndex> = IndexMap::with_capacity(indices.len());
        for &idx in indices {
            let new_idx = sub.insert_node(self.graph[idx].clone());
            mapping.insert(idx, new_idx);
        }
        for &(a, b) in &self.edge_set {
            if let (Some(&new_a), Some(&new_b)) = (mapping.get(&a), mapping.get(&b)) {
                sub.add_edge(new_a, new_b);
            }
        }
        sub
    }
}
