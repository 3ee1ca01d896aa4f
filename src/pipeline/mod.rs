pub mod cancel;
pub mod executor;
pub mod orchestrator;
pub mod statistics;
pub mod workflow;

pub use cancel::{CancellationToken, Interrupt};
pub use executor::{process_instance, BatchRunner, InstanceExecutor, InstanceOutcome};
pub use orchestrator::BoundOrchestrator;
pub use statistics::{BoundSummary, GraphStatistics, StatisticsAggregator, TorsoSummary};
pub use workflow::{InstanceReport, RunContext, StructuralWorkflow};
