pub mod bounds;
pub mod config;
pub mod error;
pub mod graph;
pub mod lp;
pub mod pipeline;
pub mod report;

pub use bounds::{Algorithm, GreedyHeuristics, TreewidthHeuristics};
pub use config::{AnalysisConfig, Metric, MetricSet, RepresentationSet};
pub use error::{Result, StructError};
pub use graph::{ComponentDecomposer, GraphModel, Representation};
pub use lp::{LinearProgram, LpLoader, LpStatistics};
pub use pipeline::{
    process_instance, BatchRunner, CancellationToken, GraphStatistics, InstanceOutcome,
    InstanceReport, StructuralWorkflow,
};
pub use report::{ReportFormat, ReportWriter};
