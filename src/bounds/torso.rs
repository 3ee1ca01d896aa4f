use indexmap::IndexMap;
use petgraph::prelude::NodeIndex;

use crate::bounds::elimination::EliminationGraph;
use crate::graph::GraphModel;
use crate::pipeline::cancel::{CancellationToken, Interrupt};

const CHECK_INTERVAL: usize = 256;

/// Projects a primal graph onto its integer variables.
pub struct TorsoReducer;

impl TorsoReducer {
    /// Eliminates every continuous vertex with fill-in.
    ///
    /// Two integer vertices end up adjacent iff they were adjacent before or are joined by a
    /// path whose inner vertices are all continuous. Continuous vertices are eliminated in
    /// min-degree order; the result does not depend on the order.
    pub fn reduce(primal: &GraphModel, cancel: &CancellationToken) -> Result<GraphModel, Interrupt> {
        let mut eg = EliminationGraph::from_model(primal)
            .track(|v| !primal.node(NodeIndex::new(v)).is_integer);

        let mut steps = 0usize;
        while let Some(v) = eg.min_degree_vertex() {
            eg.eliminate(v);
            steps += 1;
            if steps % CHECK_INTERVAL == 0 {
                cancel.checkpoint()?;
            }
        }

        let mut torso = GraphModel::with_capacity(eg.remaining(), eg.remaining());
        let mut mapping: IndexMap<usize, NodeIndex> = IndexMap::with_capacity(eg.remaining());
        for v in eg.alive_vertices() {
            let idx = torso.insert_node(primal.node(NodeIndex::new(v)).clone());
            mapping.insert(v, idx);
        }
        for (&v, &idx) in &mapping {
            for u in eg.neighbors(v) {
                if let Some(&other) = mapping.get(u) {
                    torso.add_edge(idx, other);
                }
            }
        }
        Ok(torso)
    }
}
