use log::debug;

use crate::bounds::{Algorithm, BoundSide, TorsoReducer, TreewidthHeuristics};
use crate::graph::{Component, ComponentDecomposer, GraphModel};
use crate::pipeline::cancel::{CancellationToken, Interrupt};
use crate::pipeline::statistics::{degree_range, TorsoSummary};

/// Runs per-component algorithms and combines them into graph-level bounds.
///
/// The structural parameter of a disconnected graph is the maximum over its components.
pub struct BoundOrchestrator<'a, H: ?Sized> {
    heuristics: &'a H,
    cancel: &'a CancellationToken,
}

impl<'a, H> BoundOrchestrator<'a, H>
where
    H: TreewidthHeuristics + ?Sized,
{
    pub fn new(heuristics: &'a H, cancel: &'a CancellationToken) -> Self {
        Self { heuristics, cancel }
    }

    pub fn compute_bound(&self, graph: &GraphModel, algorithm: Algorithm) -> Result<usize, Interrupt> {
        let components = ComponentDecomposer::decompose(graph);
        debug!(
            "{}: {} components over {} nodes",
            algorithm.label(),
            components.len(),
            graph.node_count()
        );
        self.bound_over(&components, algorithm)
    }

    pub fn bound_over(&self, components: &[Component], algorithm: Algorithm) -> Result<usize, Interrupt> {
        let mut bound = 0;
        for component in components {
            self.cancel.checkpoint()?;
            if component.is_empty() {
                continue;
            }
            bound = bound.max(algorithm.evaluate(component, self.heuristics, self.cancel)?);
        }
        Ok(bound)
    }

    /// Reduces `primal` to its torso once, records its degree range and runs
    /// [`Algorithm::TorsoWidth`] over the torso's components.
    ///
    /// Reducing a torso again is the identity, so the per-component torso width of the torso
    /// equals that of the primal graph.
    pub fn compute_torso(
        &self,
        primal: &GraphModel,
        lower: bool,
        upper: bool,
    ) -> Result<TorsoSummary, Interrupt> {
        let torso = TorsoReducer::reduce(primal, self.cancel)?;
        self.cancel.checkpoint()?;
        let (min_degree, max_degree) = degree_range(&torso);
        let components = ComponentDecomposer::decompose(&torso);
        let lower = if lower {
            Some(self.bound_over(&components, Algorithm::TorsoWidth(BoundSide::Lower))?)
        } else {
            None
        };
        let upper = if upper {
            Some(self.bound_over(&components, Algorithm::TorsoWidth(BoundSide::Upper))?)
        } else {
            None
        };
        Ok(TorsoSummary {
            lower,
            upper,
            min_degree,
            max_degree,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::bounds::GreedyHeuristics;
    use crate::graph::{IdAllocator, NodeKind};

    /// Reports a fixed bound per component, keyed by the component's smallest node name.
    struct FixedHeuristics(HashMap<&'static str, usize>);

    impl FixedHeuristics {
        fn lookup(&self, graph: &GraphModel) -> usize {
            graph
                .nodes()
                .map(|n| n.name.as_str())
                .min()
                .and_then(|name| self.0.get(name).copied())
                .unwrap_or(0)
        }
    }

    impl TreewidthHeuristics for FixedHeuristics {
        fn lower_bound_name(&self) -> &'static str {
            "Fixed"
        }
        fn upper_bound_name(&self) -> &'static str {
            "Fixed"
        }
        fn lower_bound(&self, graph: &GraphModel, _cancel: &CancellationToken) -> Result<usize, Interrupt> {
            Ok(self.lookup(graph))
        }
        fn upper_bound(&self, graph: &GraphModel, _cancel: &CancellationToken) -> Result<usize, Interrupt> {
            Ok(self.lookup(graph))
        }
    }

    fn two_edges_and_isolated() -> GraphModel {
        let mut ids = IdAllocator::new();
        let mut g = GraphModel::new();
        let names = ["a", "b", "c", "d", "e"];
        let idx: Vec<_> = names
            .iter()
            .map(|n| g.add_node(&mut ids, NodeKind::Variable, n, n != &"b"))
            .collect();
        g.add_edge(idx[0], idx[1]);
        g.add_edge(idx[2], idx[3]);
        g
    }

    #[test]
    fn combines_components_by_maximum() {
        let heuristics = FixedHeuristics(HashMap::from([("a", 3), ("c", 5)]));
        let token = CancellationToken::new();
        let orchestrator = BoundOrchestrator::new(&heuristics, &token);
        let g = two_edges_and_isolated();
        assert_eq!(orchestrator.compute_bound(&g, Algorithm::UpperBound).unwrap(), 5);
        assert_eq!(orchestrator.compute_bound(&g, Algorithm::LowerBound).unwrap(), 5);
    }

    #[test]
    fn cancellation_short_circuits() {
        let heuristics = GreedyHeuristics::default();
        let token = CancellationToken::new();
        token.cancel();
        let orchestrator = BoundOrchestrator::new(&heuristics, &token);
        let result = orchestrator.compute_bound(&two_edges_and_isolated(), Algorithm::UpperBound);
        assert!(matches!(result, Err(Interrupt::Cancelled)));
    }

    #[test]
    fn empty_graph_has_zero_bound() {
        let heuristics = GreedyHeuristics::default();
        let token = CancellationToken::new();
        let orchestrator = BoundOrchestrator::new(&heuristics, &token);
        assert_eq!(
            orchestrator.compute_bound(&GraphModel::new(), Algorithm::Treedepth).unwrap(),
            0
        );
    }

    #[test]
    fn torso_summary_matches_per_component_torso_width() {
        let heuristics = GreedyHeuristics::default();
        let token = CancellationToken::new();
        let orchestrator = BoundOrchestrator::new(&heuristics, &token);
        let g = two_edges_and_isolated();
        let summary = orchestrator.compute_torso(&g, true, true).unwrap();
        assert_eq!(summary.upper, Some(1));
        assert_eq!(summary.lower, Some(1));
        assert_eq!((summary.min_degree, summary.max_degree), (0, 1));
        let direct = orchestrator
            .compute_bound(&g, Algorithm::TorsoWidth(BoundSide::Upper))
            .unwrap();
        assert_eq!(Some(direct), summary.upper);
    }

    #[test]
    fn torso_summary_bounds_come_from_torso_width() {
        // x1 and x4 are continuous: the torso is a triangle plus a separate edge
        let mut ids = IdAllocator::new();
        let mut g = GraphModel::new();
        let flags = [false, true, true, true, false, true, true];
        let idx: Vec<_> = flags
            .iter()
            .enumerate()
            .map(|(i, &int)| g.add_node(&mut ids, NodeKind::Variable, &format!("x{}", i + 1), int))
            .collect();
        for (a, b) in [(0, 1), (0, 2), (0, 3), (4, 5), (4, 6)] {
            g.add_edge(idx[a], idx[b]);
        }

        let heuristics = GreedyHeuristics::default();
        let token = CancellationToken::new();
        let orchestrator = BoundOrchestrator::new(&heuristics, &token);
        let summary = orchestrator.compute_torso(&g, true, true).unwrap();
        assert_eq!(summary.lower, Some(2));
        assert_eq!(summary.upper, Some(2));
        assert_eq!((summary.min_degree, summary.max_degree), (1, 2));
        for (side, value) in [(BoundSide::Lower, summary.lower), (BoundSide::Upper, summary.upper)] {
            let direct = orchestrator.compute_bound(&g, Algorithm::TorsoWidth(side)).unwrap();
            assert_eq!(Some(direct), value);
        }
    }
}
