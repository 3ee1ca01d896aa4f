//! Mutable adjacency structure for vertex elimination, contraction and deletion.
//!
//! Vertices are addressed by their local index (the petgraph index of the source model). A
//! min-degree queue is kept for the vertices selected with [`EliminationGraph::track`]; ties
//! are broken by lowest node id.

use std::collections::BTreeSet;

use petgraph::visit::NodeIndexable;

use crate::graph::{GraphModel, NodeId};

#[derive(Debug, Clone)]
pub struct EliminationGraph {
    adjacency: Vec<BTreeSet<usize>>,
    ids: Vec<NodeId>,
    alive: Vec<bool>,
    tracked: Vec<bool>,
    queue: BTreeSet<(usize, NodeId, usize)>,
    remaining: usize,
}

impl EliminationGraph {
    pub fn from_model(graph: &GraphModel) -> Self {
        let n = graph.graph.node_bound();
        let mut adjacency = vec![BTreeSet::new(); n];
        let mut ids = vec![0; n];
        for idx in graph.node_indices() {
            ids[idx.index()] = graph.node(idx).id;
            adjacency[idx.index()] = graph.graph.neighbors(idx).map(|nb| nb.index()).collect();
        }
        Self {
            adjacency,
            ids,
            alive: vec![true; n],
            tracked: vec![false; n],
            queue: BTreeSet::new(),
            remaining: n,
        }
    }

    /// Puts every live vertex satisfying `keep` into the min-degree queue.
    pub fn track(mut self, keep: impl Fn(usize) -> bool) -> Self {
        for v in 0..self.adjacency.len() {
            if self.alive[v] && keep(v) {
                self.tracked[v] = true;
                self.enqueue(v);
            }
        }
        self
    }

    pub fn track_all(self) -> Self {
        self.track(|_| true)
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_alive(&self, v: usize) -> bool {
        self.alive[v]
    }

    pub fn id(&self, v: usize) -> NodeId {
        self.ids[v]
    }

    pub fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    pub fn neighbors(&self, v: usize) -> &BTreeSet<usize> {
        &self.adjacency[v]
    }

    pub fn alive_vertices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.adjacency.len()).filter(move |&v| self.alive[v])
    }

    /// Tracked vertex of minimum degree, lowest id first.
    pub fn min_degree_vertex(&self) -> Option<usize> {
        self.queue.iter().next().map(|&(_, _, v)| v)
    }

    /// Neighbour of `v` with minimum degree, lowest id first.
    pub fn min_degree_neighbor(&self, v: usize) -> Option<usize> {
        self.adjacency[v]
            .iter()
            .copied()
            .min_by_key(|&u| (self.degree(u), self.ids[u]))
    }

    /// Number of edges elimination of `v` would add.
    pub fn fill_in(&self, v: usize) -> usize {
        let neighbors: Vec<usize> = self.adjacency[v].iter().copied().collect();
        let mut missing = 0;
        for (i, &a) in neighbors.iter().enumerate() {
            for &b in &neighbors[i + 1..] {
                if !self.adjacency[a].contains(&b) {
                    missing += 1;
                }
            }
        }
        missing
    }

    /// Turns the neighbourhood of `v` into a clique, then deletes `v`.
    /// Returns the degree of `v` at elimination time.
    pub fn eliminate(&mut self, v: usize) -> usize {
        let neighbors: Vec<usize> = self.adjacency[v].iter().copied().collect();
        self.remove(v);
        for (i, &a) in neighbors.iter().enumerate() {
            for &b in &neighbors[i + 1..] {
                self.link(a, b);
            }
        }
        neighbors.len()
    }

    /// Deletes `v` without fill-in.
    pub fn remove(&mut self, v: usize) {
        if !self.alive[v] {
            return;
        }
        self.dequeue(v);
        self.alive[v] = false;
        self.remaining -= 1;
        let neighbors = std::mem::take(&mut self.adjacency[v]);
        for u in neighbors {
            self.dequeue(u);
            self.adjacency[u].remove(&v);
            self.enqueue(u);
        }
    }

    /// Merges `v` into its neighbour `into`.
    pub fn contract(&mut self, v: usize, into: usize) {
        let neighbors: Vec<usize> = self.adjacency[v].iter().copied().collect();
        self.remove(v);
        for u in neighbors {
            if u != into {
                self.link(into, u);
            }
        }
    }

    fn link(&mut self, a: usize, b: usize) {
        if a == b || self.adjacency[a].contains(&b) {
            return;
        }
        self.dequeue(a);
        self.dequeue(b);
        self.adjacency[a].insert(b);
        self.adjacency[b].insert(a);
        self.enqueue(a);
        self.enqueue(b);
    }

    fn dequeue(&mut self, v: usize) {
        if self.tracked[v] && self.alive[v] {
            self.queue.remove(&(self.adjacency[v].len(), self.ids[v], v));
        }
    }

    fn enqueue(&mut self, v: usize) {
        if self.tracked[v] && self.alive[v] {
            self.queue.insert((self.adjacency[v].len(), self.ids[v], v));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{IdAllocator, NodeKind};

    fn path(n: usize) -> GraphModel {
        let mut ids = IdAllocator::new();
        let mut g = GraphModel::new();
        let idx: Vec<_> = (0..n)
            .map(|i| g.add_node(&mut ids, NodeKind::Variable, &format!("p{i}"), false))
            .collect();
        for w in idx.windows(2) {
            g.add_edge(w[0], w[1]);
        }
        g
    }

    #[test]
    fn eliminating_middle_vertex_adds_fill_edge() {
        let mut eg = EliminationGraph::from_model(&path(3)).track_all();
        assert_eq!(eg.fill_in(1), 1);
        assert_eq!(eg.eliminate(1), 2);
        assert!(eg.neighbors(0).contains(&2));
        assert_eq!(eg.remaining(), 2);
    }

    #[test]
    fn queue_follows_degree_changes() {
        let mut eg = EliminationGraph::from_model(&path(4)).track_all();
        assert_eq!(eg.min_degree_vertex(), Some(0));
        eg.remove(0);
        assert_eq!(eg.min_degree_vertex(), Some(1));
        eg.eliminate(1);
        assert_eq!(eg.degree(2), 1);
        assert_eq!(eg.min_degree_vertex(), Some(2));
    }

    #[test]
    fn contraction_merges_neighbourhoods() {
        let mut eg = EliminationGraph::from_model(&path(4)).track_all();
        eg.contract(1, 2);
        assert!(eg.neighbors(2).contains(&0));
        assert!(eg.neighbors(2).contains(&3));
        assert!(!eg.is_alive(1));
    }

    #[test]
    fn untracked_vertices_never_surface() {
        let eg = EliminationGraph::from_model(&path(3)).track(|v| v == 1);
        assert_eq!(eg.min_degree_vertex(), Some(1));
    }
}
