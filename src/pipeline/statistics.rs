use serde::Serialize;

use crate::graph::{ComponentDecomposer, GraphModel};
use crate::lp::statistics::ratio;

/// Bounds computed for one graph representation. `None` means not requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundSummary {
    pub treewidth_lb: Option<usize>,
    pub treewidth_ub: Option<usize>,
    pub torso: Option<TorsoSummary>,
    pub treedepth_ub: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TorsoSummary {
    pub lower: Option<usize>,
    pub upper: Option<usize>,
    pub min_degree: usize,
    pub max_degree: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatistics {
    pub num_nodes: usize,
    pub num_integer_nodes: usize,
    pub proportion_integer_nodes: f64,
    pub num_edges: usize,
    pub density: f64,
    pub min_degree: usize,
    pub max_degree: usize,
    pub avg_degree: f64,
    pub num_components: usize,
    #[serde(rename = "treewidthLB")]
    pub treewidth_lb: Option<usize>,
    #[serde(rename = "treewidthUB")]
    pub treewidth_ub: Option<usize>,
    #[serde(rename = "torsoWidthLB")]
    pub torso_width_lb: Option<usize>,
    #[serde(rename = "torsoWidthUB")]
    pub torso_width_ub: Option<usize>,
    pub torso_min_degree: Option<usize>,
    pub torso_max_degree: Option<usize>,
    #[serde(rename = "treedepthUB")]
    pub treedepth_ub: Option<usize>,
}

impl GraphStatistics {
    pub const FIELDS: [&'static str; 16] = [
        "numNodes",
        "numIntegerNodes",
        "proportionIntegerNodes",
        "numEdges",
        "density",
        "minDegree",
        "maxDegree",
        "avgDegree",
        "numComponents",
        "treewidthLB",
        "treewidthUB",
        "torsoWidthLB",
        "torsoWidthUB",
        "torsoMinDegree",
        "torsoMaxDegree",
        "treedepthUB",
    ];

    pub fn csv_fields(&self) -> Vec<String> {
        let opt = |value: Option<usize>| value.map(|v| v.to_string()).unwrap_or_default();
        vec![
            self.num_nodes.to_string(),
            self.num_integer_nodes.to_string(),
            format!("{:.4}", self.proportion_integer_nodes),
            self.num_edges.to_string(),
            format!("{:.6}", self.density),
            self.min_degree.to_string(),
            self.max_degree.to_string(),
            format!("{:.4}", self.avg_degree),
            self.num_components.to_string(),
            opt(self.treewidth_lb),
            opt(self.treewidth_ub),
            opt(self.torso_width_lb),
            opt(self.torso_width_ub),
            opt(self.torso_min_degree),
            opt(self.torso_max_degree),
            opt(self.treedepth_ub),
        ]
    }
}

/// Degree extremes of a graph, `(0, 0)` when empty.
pub fn degree_range(graph: &GraphModel) -> (usize, usize) {
    let mut degrees = graph.node_indices().map(|idx| graph.degree(idx));
    let Some(first) = degrees.next() else {
        return (0, 0);
    };
    degrees.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)))
}

pub struct StatisticsAggregator;

impl StatisticsAggregator {
    pub fn aggregate(graph: &GraphModel, bounds: &BoundSummary) -> GraphStatistics {
        let num_nodes = graph.node_count();
        let num_edges = graph.edge_count();
        let num_integer_nodes = graph.integer_node_count();
        let (min_degree, max_degree) = degree_range(graph);
        let density = if num_nodes < 2 {
            0.0
        } else {
            (2 * num_edges) as f64 / (num_nodes * (num_nodes - 1)) as f64
        };

        GraphStatistics {
            num_nodes,
            num_integer_nodes,
            proportion_integer_nodes: ratio(num_integer_nodes, num_nodes),
            num_edges,
            density,
            min_degree,
            max_degree,
            avg_degree: ratio(2 * num_edges, num_nodes),
            num_components: ComponentDecomposer::count(graph),
            treewidth_lb: bounds.treewidth_lb,
            treewidth_ub: bounds.treewidth_ub,
            torso_width_lb: bounds.torso.and_then(|t| t.lower),
            torso_width_ub: bounds.torso.and_then(|t| t.upper),
            torso_min_degree: bounds.torso.map(|t| t.min_degree),
            torso_max_degree: bounds.torso.map(|t| t.max_degree),
            treedepth_ub: bounds.treedepth_ub,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{IdAllocator, NodeKind};

    #[test]
    fn path_statistics() {
        let mut ids = IdAllocator::new();
        let mut g = GraphModel::new();
        let a = g.add_node(&mut ids, NodeKind::Variable, "a", true);
        let b = g.add_node(&mut ids, NodeKind::Variable, "b", false);
        let c = g.add_node(&mut ids, NodeKind::Variable, "c", false);
        g.add_node(&mut ids, NodeKind::Variable, "d", true);
        g.add_edge(a, b);
        g.add_edge(b, c);

        let bounds = BoundSummary {
            treewidth_lb: Some(1),
            ..BoundSummary::default()
        };
        let stats = StatisticsAggregator::aggregate(&g, &bounds);
        assert_eq!(stats.num_nodes, 4);
        assert_eq!(stats.num_edges, 2);
        assert_eq!(stats.num_integer_nodes, 2);
        assert!((stats.proportion_integer_nodes - 0.5).abs() < 1e-12);
        assert!((stats.density - 4.0 / 12.0).abs() < 1e-12);
        assert_eq!((stats.min_degree, stats.max_degree), (0, 2));
        assert!((stats.avg_degree - 1.0).abs() < 1e-12);
        assert_eq!(stats.num_components, 2);
        assert_eq!(stats.treewidth_lb, Some(1));
        assert_eq!(stats.torso_width_lb, None);
    }

    #[test]
    fn density_is_zero_below_two_nodes() {
        let mut ids = IdAllocator::new();
        let mut g = GraphModel::new();
        let empty = StatisticsAggregator::aggregate(&g, &BoundSummary::default());
        assert_eq!(empty.density, 0.0);
        assert_eq!(empty.avg_degree, 0.0);
        g.add_node(&mut ids, NodeKind::Row, "r", false);
        let single = StatisticsAggregator::aggregate(&g, &BoundSummary::default());
        assert_eq!(single.density, 0.0);
        assert_eq!(single.num_components, 1);
    }

    #[test]
    fn csv_fields_match_header() {
        let stats = GraphStatistics::default();
        assert_eq!(stats.csv_fields().len(), GraphStatistics::FIELDS.len());
    }
}
