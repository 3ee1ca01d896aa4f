use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;

use crate::graph::model::{GraphModel, NodeId};

/// Exports graphs in the DIMACS edge format (`p edge n m`, `e u v`, 1-based vertices in node-id
/// order), readable by external treewidth solvers.
pub struct DimacsWriter;

impl DimacsWriter {
    pub fn to_dimacs_string(graph: &GraphModel, comment: &str) -> String {
        let mut order: Vec<NodeId> = graph.nodes().map(|node| node.id).collect();
        order.sort_unstable();
        let position: IndexMap<NodeId, usize> = order
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos + 1))
            .collect();

        let mut out = String::new();
        if !comment.is_empty() {
            let _ = writeln!(out, "c {comment}");
        }
        let _ = writeln!(out, "p edge {} {}", graph.node_count(), graph.edge_count());
        for (a, b) in graph.edges() {
            let _ = writeln!(out, "e {} {}", position[&a], position[&b]);
        }
        out
    }

    pub fn write_to_path(graph: &GraphModel, comment: &str, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create DIMACS directory {:?}", parent))?;
        }
        let file = File::create(path).with_context(|| format!("create DIMACS file {:?}", path))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(Self::to_dimacs_string(graph, comment).as_bytes())
            .with_context(|| format!("write DIMACS file {:?}", path))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{IdAllocator, NodeKind};

    #[test]
    fn dimacs_uses_one_based_positions() {
        let mut ids = IdAllocator::new();
        ids.allocate();
        ids.allocate();
        let mut g = GraphModel::new();
        let a = g.add_node(&mut ids, NodeKind::Row, "r1", false);
        let b = g.add_node(&mut ids, NodeKind::Row, "r2", false);
        g.add_node(&mut ids, NodeKind::Row, "r3", false);
        g.add_edge(a, b);

        let text = DimacsWriter::to_dimacs_string(&g, "dual");
        assert_eq!(text, "c dual\np edge 3 1\ne 1 2\n");
    }
}
