use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::bounds::elimination::EliminationGraph;
use crate::graph::GraphModel;
use crate::pipeline::cancel::{CancellationToken, Interrupt};

const CHECK_INTERVAL: usize = 256;

/// Treewidth lower/upper bound provider. Implementations must be deterministic and assume a
/// connected input graph. Long-running providers poll `cancel` and return
/// [`Interrupt::Cancelled`] once it fires; provider failures are `Interrupt::Failed`.
pub trait TreewidthHeuristics {
    fn lower_bound_name(&self) -> &'static str;
    fn upper_bound_name(&self) -> &'static str;
    fn lower_bound(&self, graph: &GraphModel, cancel: &CancellationToken) -> Result<usize, Interrupt>;
    fn upper_bound(&self, graph: &GraphModel, cancel: &CancellationToken) -> Result<usize, Interrupt>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LowerBoundHeuristic {
    /// Contract a minimum-degree vertex into its minimum-degree neighbour.
    #[default]
    MinorMinWidth,
    /// Delete a minimum-degree vertex (degeneracy).
    MinDegree,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum UpperBoundHeuristic {
    /// Eliminate a minimum-degree vertex.
    #[default]
    GreedyDegree,
    /// Eliminate the vertex adding the fewest fill edges.
    GreedyFillIn,
}

/// Elimination-ordering heuristics shipped with the crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyHeuristics {
    pub lower: LowerBoundHeuristic,
    pub upper: UpperBoundHeuristic,
}

impl GreedyHeuristics {
    pub fn new(lower: LowerBoundHeuristic, upper: UpperBoundHeuristic) -> Self {
        Self { lower, upper }
    }
}

impl TreewidthHeuristics for GreedyHeuristics {
    fn lower_bound_name(&self) -> &'static str {
        match self.lower {
            LowerBoundHeuristic::MinorMinWidth => "MinorMinWidth",
            LowerBoundHeuristic::MinDegree => "MinDegree",
        }
    }

    fn upper_bound_name(&self) -> &'static str {
        match self.upper {
            UpperBoundHeuristic::GreedyDegree => "GreedyDegree",
            UpperBoundHeuristic::GreedyFillIn => "GreedyFillIn",
        }
    }

    fn lower_bound(&self, graph: &GraphModel, cancel: &CancellationToken) -> Result<usize, Interrupt> {
        let eg = EliminationGraph::from_model(graph).track_all();
        match self.lower {
            LowerBoundHeuristic::MinorMinWidth => minor_min_width(eg, cancel),
            LowerBoundHeuristic::MinDegree => min_degree(eg, cancel),
        }
    }

    fn upper_bound(&self, graph: &GraphModel, cancel: &CancellationToken) -> Result<usize, Interrupt> {
        match self.upper {
            UpperBoundHeuristic::GreedyDegree => {
                greedy_degree(EliminationGraph::from_model(graph).track_all(), cancel)
            }
            UpperBoundHeuristic::GreedyFillIn => {
                greedy_fill_in(EliminationGraph::from_model(graph), cancel)
            }
        }
    }
}

/// Counts elimination steps and polls the token every [`CHECK_INTERVAL`] of them.
struct StepCounter<'a> {
    steps: usize,
    cancel: &'a CancellationToken,
}

impl<'a> StepCounter<'a> {
    fn new(cancel: &'a CancellationToken) -> Self {
        Self { steps: 0, cancel }
    }

    fn tick(&mut self) -> Result<(), Interrupt> {
        self.steps += 1;
        if self.steps % CHECK_INTERVAL == 0 {
            self.cancel.checkpoint()?;
        }
        Ok(())
    }
}

fn minor_min_width(mut eg: EliminationGraph, cancel: &CancellationToken) -> Result<usize, Interrupt> {
    let mut steps = StepCounter::new(cancel);
    let mut bound = 0;
    while eg.remaining() > 1 {
        let Some(v) = eg.min_degree_vertex() else {
            break;
        };
        bound = bound.max(eg.degree(v));
        match eg.min_degree_neighbor(v) {
            Some(u) => eg.contract(v, u),
            None => eg.remove(v),
        }
        steps.tick()?;
    }
    Ok(bound)
}

fn min_degree(mut eg: EliminationGraph, cancel: &CancellationToken) -> Result<usize, Interrupt> {
    let mut steps = StepCounter::new(cancel);
    let mut bound = 0;
    while let Some(v) = eg.min_degree_vertex() {
        bound = bound.max(eg.degree(v));
        eg.remove(v);
        steps.tick()?;
    }
    Ok(bound)
}

fn greedy_degree(mut eg: EliminationGraph, cancel: &CancellationToken) -> Result<usize, Interrupt> {
    let mut steps = StepCounter::new(cancel);
    let mut width = 0;
    while let Some(v) = eg.min_degree_vertex() {
        width = width.max(eg.eliminate(v));
        steps.tick()?;
    }
    Ok(width)
}

fn greedy_fill_in(mut eg: EliminationGraph, cancel: &CancellationToken) -> Result<usize, Interrupt> {
    let mut steps = StepCounter::new(cancel);
    let mut width = 0;
    loop {
        let next = eg
            .alive_vertices()
            .min_by_key(|&v| (eg.fill_in(v), eg.degree(v), eg.id(v)));
        let Some(v) = next else {
            break;
        };
        width = width.max(eg.eliminate(v));
        steps.tick()?;
    }
    Ok(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{IdAllocator, NodeKind};

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

    fn live() -> CancellationToken {
        CancellationToken::new()
    }

    fn clique(n: usize) -> GraphModel {
        let edges: Vec<_> = (0..n)
            .flat_map(|a| ((a + 1)..n).map(move |b| (a, b)))
            .collect();
        graph_with_edges(n, &edges)
    }

    fn all_heuristics() -> Vec<GreedyHeuristics> {
        let mut out = Vec::new();
        for lower in [LowerBoundHeuristic::MinorMinWidth, LowerBoundHeuristic::MinDegree] {
            for upper in [UpperBoundHeuristic::GreedyDegree, UpperBoundHeuristic::GreedyFillIn] {
                out.push(GreedyHeuristics::new(lower, upper));
            }
        }
        out
    }

    #[test]
    fn clique_bounds_are_exact() {
        let g = clique(5);
        for h in all_heuristics() {
            assert_eq!(h.lower_bound(&g, &live()).unwrap(), 4, "{}", h.lower_bound_name());
            assert_eq!(h.upper_bound(&g, &live()).unwrap(), 4, "{}", h.upper_bound_name());
        }
    }

    #[test]
    fn tree_has_width_one() {
        let g = graph_with_edges(6, &[(0, 1), (0, 2), (1, 3), (1, 4), (2, 5)]);
        for h in all_heuristics() {
            assert_eq!(h.lower_bound(&g, &live()).unwrap(), 1);
            assert_eq!(h.upper_bound(&g, &live()).unwrap(), 1);
        }
    }

    #[test]
    fn cycle_has_width_two() {
        let g = graph_with_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        let h = GreedyHeuristics::default();
        assert_eq!(h.lower_bound(&g, &live()).unwrap(), 2);
        assert_eq!(h.upper_bound(&g, &live()).unwrap(), 2);
    }

    #[test]
    fn grid_bounds_bracket_treewidth() {
        // 3x3 grid, treewidth 3
        let mut edges = Vec::new();
        for r in 0..3 {
            for c in 0..3 {
                let v = r * 3 + c;
                if c < 2 {
                    edges.push((v, v + 1));
                }
                if r < 2 {
                    edges.push((v, v + 3));
                }
            }
        }
        let g = graph_with_edges(9, &edges);
        for h in all_heuristics() {
            let lb = h.lower_bound(&g, &live()).unwrap();
            let ub = h.upper_bound(&g, &live()).unwrap();
            assert!(lb <= 3 && 3 <= ub, "lb {lb} ub {ub}");
        }
    }

    #[test]
    fn single_vertex_is_zero() {
        let g = graph_with_edges(1, &[]);
        let h = GreedyHeuristics::default();
        assert_eq!(h.lower_bound(&g, &live()).unwrap(), 0);
        assert_eq!(h.upper_bound(&g, &live()).unwrap(), 0);
    }

    #[test]
    fn long_eliminations_observe_cancellation() {
        let edges: Vec<_> = (0..1999).map(|i| (i, i + 1)).collect();
        let g = graph_with_edges(2000, &edges);
        let token = CancellationToken::new();
        token.cancel();
        for h in all_heuristics() {
            assert!(matches!(h.lower_bound(&g, &token), Err(Interrupt::Cancelled)));
            assert!(matches!(h.upper_bound(&g, &token), Err(Interrupt::Cancelled)));
        }
    }

    #[test]
    fn short_eliminations_finish_before_the_first_poll() {
        let token = CancellationToken::new();
        token.cancel();
        let h = GreedyHeuristics::default();
        assert_eq!(h.upper_bound(&clique(4), &token).unwrap(), 3);
    }
}
