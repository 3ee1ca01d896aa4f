use std::fmt;

use clap::ValueEnum;
use indexmap::IndexMap;
use petgraph::prelude::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::graph::model::{GraphModel, IdAllocator, NodeKind};
use crate::lp::LinearProgram;

/// Turns a linear program into one graph encoding of its constraint structure.
pub trait GraphGenerator {
    fn generate(&self, lp: &LinearProgram, ids: &mut IdAllocator) -> GraphModel;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    Primal,
    Incidence,
    Dual,
}

impl Representation {
    pub const ALL: [Representation; 3] = [Self::Primal, Self::Incidence, Self::Dual];

    pub fn generate(
        self,
        lp: &LinearProgram,
        ids: &mut IdAllocator,
        include_objective: bool,
    ) -> GraphModel {
        match self {
            Self::Primal => PrimalGraphGenerator { include_objective }.generate(lp, ids),
            Self::Incidence => IncidenceGraphGenerator { include_objective }.generate(lp, ids),
            Self::Dual => DualGraphGenerator { include_objective }.generate(lp, ids),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Primal => "primal",
            Self::Incidence => "incidence",
            Self::Dual => "dual",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Variables as nodes, a clique over the support of every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimalGraphGenerator {
    pub include_objective: bool,
}

impl GraphGenerator for PrimalGraphGenerator {
    fn generate(&self, lp: &LinearProgram, ids: &mut IdAllocator) -> GraphModel {
        let mut graph = GraphModel::with_capacity(lp.columns.len(), lp.columns.len());
        let variables = variable_nodes(&mut graph, lp, ids);

        for (_, row) in lp.rows(self.include_objective) {
            let support: Vec<NodeIndex> = row
                .support()
                .filter_map(|var| variables.get(var.as_str()).copied())
                .collect();
            add_clique(&mut graph, &support);
        }
        graph
    }
}

/// Bipartite graph: variables and rows as nodes, one edge per nonzero coefficient.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncidenceGraphGenerator {
    pub include_objective: bool,
}

impl GraphGenerator for IncidenceGraphGenerator {
    fn generate(&self, lp: &LinearProgram, ids: &mut IdAllocator) -> GraphModel {
        let mut graph = GraphModel::with_capacity(lp.columns.len() + lp.rows.len(), lp.columns.len());
        let variables = variable_nodes(&mut graph, lp, ids);

        for (name, row) in lp.rows(self.include_objective) {
            let row_idx = graph.add_node(ids, NodeKind::Row, name, false);
            for var in row.support() {
                if let Some(&var_idx) = variables.get(var.as_str()) {
                    graph.add_edge(row_idx, var_idx);
                }
            }
        }
        graph
    }
}

/// Rows as nodes, a clique over the rows each variable appears in.
#[derive(Debug, Clone, Copy, Default)]
pub struct DualGraphGenerator {
    pub include_objective: bool,
}

impl GraphGenerator for DualGraphGenerator {
    fn generate(&self, lp: &LinearProgram, ids: &mut IdAllocator) -> GraphModel {
        let mut graph = GraphModel::with_capacity(lp.rows.len(), lp.rows.len());
        let mut rows_of_variable: IndexMap<&str, Vec<NodeIndex>> = IndexMap::new();

        for (name, row) in lp.rows(self.include_objective) {
            let row_idx = graph.add_node(ids, NodeKind::Row, name, false);
            for var in row.support() {
                rows_of_variable.entry(var.as_str()).or_default().push(row_idx);
            }
        }
        for rows in rows_of_variable.values() {
            add_clique(&mut graph, rows);
        }
        graph
    }
}

fn variable_nodes<'lp>(
    graph: &mut GraphModel,
    lp: &'lp LinearProgram,
    ids: &mut IdAllocator,
) -> IndexMap<&'lp str, NodeIndex> {
    lp.columns
        .iter()
        .map(|(name, column)| {
            let idx = graph.add_node(ids, NodeKind::Variable, name, column.is_integer);
            (name.as_str(), idx)
        })
        .collect()
}

fn add_clique(graph: &mut GraphModel, members: &[NodeIndex]) {
    for (i, &a) in members.iter().enumerate() {
        for &b in &members[i + 1..] {
            graph.add_edge(a, b);
        }
    }
}
