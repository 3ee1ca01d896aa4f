use petgraph::visit::NodeIndexable;

use crate::graph::GraphModel;
use crate::pipeline::cancel::{CancellationToken, Interrupt};

const CHECK_INTERVAL: usize = 64;

pub const TREEDEPTH_NAME: &str = "MaxDegreeSeparation";

/// Treedepth upper bound by repeated removal of a maximum-degree vertex.
///
/// The removed vertex becomes the root of the current subtree and each remaining connected
/// piece is handled independently one level deeper, so the bound is the depth of the deepest
/// root-to-leaf chain. Empty graph: 0, single vertex: 1.
pub struct TreedepthHeuristic;

impl TreedepthHeuristic {
    pub fn upper_bound(graph: &GraphModel, cancel: &CancellationToken) -> Result<usize, Interrupt> {
        let n = graph.graph.node_bound();
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut ids = vec![0; n];
        for idx in graph.node_indices() {
            ids[idx.index()] = graph.node(idx).id;
            adjacency[idx.index()] = graph.graph.neighbors(idx).map(|nb| nb.index()).collect();
        }

        let mut all: Vec<usize> = graph.node_indices().map(|idx| idx.index()).collect();
        all.sort_by_key(|&v| ids[v]);

        let mut removed = vec![false; n];
        let mut splitter = Splitter::new(n);
        let mut stack: Vec<(Vec<usize>, usize)> = splitter
            .split(&all, &adjacency, &removed)
            .into_iter()
            .map(|members| (members, 1))
            .collect();

        let mut depth = 0;
        let mut steps = 0usize;
        while let Some((members, level)) = stack.pop() {
            depth = depth.max(level);
            if members.len() == 1 {
                continue;
            }
            steps += 1;
            if steps % CHECK_INTERVAL == 0 {
                cancel.checkpoint()?;
            }

            let Some(root) = members.iter().copied().max_by(|&a, &b| {
                let deg_a = live_degree(a, &adjacency, &removed);
                let deg_b = live_degree(b, &adjacency, &removed);
                deg_a.cmp(&deg_b).then(ids[b].cmp(&ids[a]))
            }) else {
                continue;
            };
            removed[root] = true;

            let rest: Vec<usize> = members.into_iter().filter(|&v| v != root).collect();
            for piece in splitter.split(&rest, &adjacency, &removed) {
                stack.push((piece, level + 1));
            }
        }
        Ok(depth)
    }
}

fn live_degree(v: usize, adjacency: &[Vec<usize>], removed: &[bool]) -> usize {
    adjacency[v].iter().filter(|&&u| !removed[u]).count()
}

/// Connected pieces of a vertex subset, reusing one visitation buffer.
struct Splitter {
    stamp: Vec<usize>,
    round: usize,
}

impl Splitter {
    fn new(n: usize) -> Self {
        Self {
            stamp: vec![0; n],
            round: 0,
        }
    }

    /// Pieces come out in the order of their first member in `members`.
    fn split(&mut self, members: &[usize], adjacency: &[Vec<usize>], removed: &[bool]) -> Vec<Vec<usize>> {
        self.round += 1;
        let round = self.round;
        let mut pieces = Vec::new();
        let mut stack = Vec::new();
        for &start in members {
            if self.stamp[start] == round || removed[start] {
                continue;
            }
            self.stamp[start] = round;
            stack.push(start);
            let mut piece = Vec::new();
            while let Some(v) = stack.pop() {
                piece.push(v);
                for &u in &adjacency[v] {
                    if !removed[u] && self.stamp[u] != round {
                        self.stamp[u] = round;
                        stack.push(u);
                    }
                }
            }
            pieces.push(piece);
        }
        pieces
    }
}
