use petgraph::prelude::NodeIndex;
use petgraph::visit::NodeIndexable;

use crate::graph::model::GraphModel;

/// Connected component as an induced subgraph. Node ids and names carry over from the parent.
pub type Component = GraphModel;

pub struct ComponentDecomposer;

impl ComponentDecomposer {
    /// Node sets of the connected components, each sorted by node id.
    ///
    /// Traversal starts from the lowest-id unvisited node, so the output order is fixed for a
    /// given graph.
    pub fn partition(graph: &GraphModel) -> Vec<Vec<NodeIndex>> {
        let mut order: Vec<NodeIndex> = graph.node_indices().collect();
        order.sort_by_key(|&idx| graph.node(idx).id);

        let mut visited = vec![false; graph.graph.node_bound()];
        let mut components = Vec::new();
        let mut stack = Vec::new();

        for start in order {
            if visited[start.index()] {
                continue;
            }
            visited[start.index()] = true;
            stack.push(start);
            let mut members = Vec::new();
            while let Some(node) = stack.pop() {
                members.push(node);
                for neighbor in graph.graph.neighbors(node) {
                    if !visited[neighbor.index()] {
                        visited[neighbor.index()] = true;
                        stack.push(neighbor);
                    }
                }
            }
            members.sort_by_key(|&idx| graph.node(idx).id);
            components.push(members);
        }
        components
    }

    pub fn decompose(graph: &GraphModel) -> Vec<Component> {
        Self::partition(graph)
            .iter()
            .map(|members| graph.induced_subgraph(members))
            .collect()
    }

    pub fn count(graph: &GraphModel) -> usize {
        Self::partition(graph).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{IdAllocator, NodeKind};

    fn graph_with_edges(nodes: usize, edges: &[(usize, usize)]) -> GraphModel {
        let mut ids = IdAllocator::new();
        let mut g = GraphModel::new();
        let idx: Vec<_> = (0..nodes)
            .map(|i| g.add_node(&mut ids, NodeKind::Variable, &format!("v{i}"), false))
            .collect();
        for &(a, b) in edges {
            g.add_edge(idx[a], idx[b]);
        }
        g
    }

    #[test]
    fn components_partition_the_nodes() {
        let g = graph_with_edges(6, &[(0, 1), (1, 2), (3, 4)]);
        let components = ComponentDecomposer::decompose(&g);
        let sizes: Vec<_> = components.iter().map(|c| c.node_count()).collect();
        assert_eq!(sizes, vec![3, 2, 1]);
        let mut ids: Vec<_> = components
            .iter()
            .flat_map(|c| c.nodes().map(|n| n.id))
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn components_keep_induced_edges() {
        let g = graph_with_edges(5, &[(0, 1), (1, 2), (2, 0), (3, 4)]);
        let components = ComponentDecomposer::decompose(&g);
        assert_eq!(components[0].edge_count(), 3);
        assert_eq!(components[1].edge_count(), 1);
    }

    #[test]
    fn isolated_node_is_singleton() {
        let g = graph_with_edges(3, &[(0, 2)]);
        let components = ComponentDecomposer::decompose(&g);
        assert_eq!(components.len(), 2);
        assert_eq!(components[1].node_count(), 1);
        assert_eq!(components[1].nodes().next().map(|n| n.name.as_str()), Some("v1"));
    }

    #[test]
    fn empty_graph_has_no_components() {
        assert_eq!(ComponentDecomposer::count(&GraphModel::new()), 0);
    }
}
