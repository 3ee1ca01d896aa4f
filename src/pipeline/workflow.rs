use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::Serialize;

use crate::bounds::{Algorithm, BoundSide, TreewidthHeuristics};
use crate::config::AnalysisConfig;
use crate::graph::{DimacsWriter, GraphModel, IdAllocator, Representation};
use crate::lp::{instance_name, LinearProgram, LpLoader, LpStatistics};
use crate::pipeline::cancel::{CancellationToken, Interrupt};
use crate::pipeline::orchestrator::BoundOrchestrator;
use crate::pipeline::statistics::{BoundSummary, GraphStatistics, StatisticsAggregator};

/// Everything computed for one instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceReport {
    pub instance: String,
    pub lp: LpStatistics,
    pub primal: Option<GraphStatistics>,
    pub incidence: Option<GraphStatistics>,
    pub dual: Option<GraphStatistics>,
    pub elapsed_secs: f64,
}

impl InstanceReport {
    pub fn graph(&self, representation: Representation) -> Option<&GraphStatistics> {
        match representation {
            Representation::Primal => self.primal.as_ref(),
            Representation::Incidence => self.incidence.as_ref(),
            Representation::Dual => self.dual.as_ref(),
        }
    }

    fn graph_mut(&mut self, representation: Representation) -> &mut Option<GraphStatistics> {
        match representation {
            Representation::Primal => &mut self.primal,
            Representation::Incidence => &mut self.incidence,
            Representation::Dual => &mut self.dual,
        }
    }
}

/// Per-instance state: node ids start from zero for every instance.
pub struct RunContext<'a> {
    pub instance: String,
    pub ids: IdAllocator,
    pub cancel: &'a CancellationToken,
}

impl<'a> RunContext<'a> {
    pub fn new(instance: impl Into<String>, cancel: &'a CancellationToken) -> Self {
        Self {
            instance: instance.into(),
            ids: IdAllocator::new(),
            cancel,
        }
    }
}

/// The structural parameter pipeline for one instance: parse, generate, bound, aggregate.
pub struct StructuralWorkflow<H> {
    config: AnalysisConfig,
    heuristics: H,
}

impl<H: TreewidthHeuristics> StructuralWorkflow<H> {
    pub fn new(config: AnalysisConfig, heuristics: H) -> Self {
        Self { config, heuristics }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn process_path(&self, path: &Path, cancel: &CancellationToken) -> Result<InstanceReport, Interrupt> {
        let start = Instant::now();
        let lp = LpLoader::from_path(path)?;
        debug!("{}: parsed {} rows, {} columns", path.display(), lp.rows.len(), lp.columns.len());
        cancel.checkpoint()?;

        let mut ctx = RunContext::new(instance_name(path), cancel);
        let mut report = self.analyze(&lp, &mut ctx)?;
        report.elapsed_secs = start.elapsed().as_secs_f64();
        Ok(report)
    }

    pub fn analyze(&self, lp: &LinearProgram, ctx: &mut RunContext<'_>) -> Result<InstanceReport, Interrupt> {
        let start = Instant::now();
        let mut report = InstanceReport {
            instance: ctx.instance.clone(),
            lp: LpStatistics::compute(lp, self.config.include_objective),
            primal: None,
            incidence: None,
            dual: None,
            elapsed_secs: 0.0,
        };

        for representation in self.config.representations.enabled() {
            let graph = representation.generate(lp, &mut ctx.ids, self.config.include_objective);
            ctx.cancel.checkpoint()?;
            debug!(
                "{}: {} graph with {} nodes, {} edges",
                ctx.instance,
                representation,
                graph.node_count(),
                graph.edge_count()
            );
            self.export_dimacs(&ctx.instance, representation, &graph);

            let bounds = self.compute_bounds(&ctx.instance, representation, &graph, ctx.cancel)?;
            *report.graph_mut(representation) = Some(StatisticsAggregator::aggregate(&graph, &bounds));
        }

        report.elapsed_secs = start.elapsed().as_secs_f64();
        Ok(report)
    }

    fn compute_bounds(
        &self,
        instance: &str,
        representation: Representation,
        graph: &GraphModel,
        cancel: &CancellationToken,
    ) -> Result<BoundSummary, Interrupt> {
        let metrics = self.config.metrics;
        let orchestrator = BoundOrchestrator::new(&self.heuristics, cancel);
        let mut bounds = BoundSummary::default();

        if metrics.lower_bound {
            bounds.treewidth_lb = Some(self.timed(instance, representation, graph, Algorithm::LowerBound, || {
                orchestrator.compute_bound(graph, Algorithm::LowerBound)
            })?);
        }
        if metrics.upper_bound {
            bounds.treewidth_ub = Some(self.timed(instance, representation, graph, Algorithm::UpperBound, || {
                orchestrator.compute_bound(graph, Algorithm::UpperBound)
            })?);
        }
        if representation != Representation::Primal {
            return Ok(bounds);
        }

        if metrics.torso_width {
            let start = Instant::now();
            let torso = orchestrator.compute_torso(graph, true, true)?;
            for (side, value) in [(BoundSide::Lower, torso.lower), (BoundSide::Upper, torso.upper)] {
                let algorithm = Algorithm::TorsoWidth(side);
                log_bound(
                    instance,
                    representation,
                    graph,
                    algorithm.label(),
                    value,
                    algorithm.heuristic_name(&self.heuristics),
                    start.elapsed(),
                );
            }
            bounds.torso = Some(torso);
        }
        if metrics.treedepth {
            bounds.treedepth_ub = Some(self.timed(instance, representation, graph, Algorithm::Treedepth, || {
                orchestrator.compute_bound(graph, Algorithm::Treedepth)
            })?);
        }
        Ok(bounds)
    }

    fn timed<F>(
        &self,
        instance: &str,
        representation: Representation,
        graph: &GraphModel,
        algorithm: Algorithm,
        run: F,
    ) -> Result<usize, Interrupt>
    where
        F: FnOnce() -> Result<usize, Interrupt>,
    {
        let start = Instant::now();
        let value = run()?;
        log_bound(
            instance,
            representation,
            graph,
            algorithm.label(),
            Some(value),
            algorithm.heuristic_name(&self.heuristics),
            start.elapsed(),
        );
        Ok(value)
    }

    fn export_dimacs(&self, instance: &str, representation: Representation, graph: &GraphModel) {
        let Some(dir) = self.config.dimacs_dir.as_ref() else {
            return;
        };
        let path = dir.join(format!("{instance}.{representation}.dimacs"));
        let comment = format!("{instance} {representation}");
        if let Err(err) = DimacsWriter::write_to_path(graph, &comment, &path) {
            warn!("{instance}: DIMACS export to {:?} failed: {err:#}", path);
        }
    }
}

fn log_bound(
    instance: &str,
    representation: Representation,
    graph: &GraphModel,
    label: &str,
    value: Option<usize>,
    heuristic: &str,
    elapsed: Duration,
) {
    if let Some(value) = value {
        info!(
            "{} {} {}: {} of {} nodes with {}, time: {:?}",
            instance,
            representation,
            label,
            value,
            graph.node_count(),
            heuristic,
            elapsed
        );
    }
}
