use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use milp_struct::bounds::{LowerBoundHeuristic, UpperBoundHeuristic};
use milp_struct::lp::expand_inputs;
use milp_struct::{
    AnalysisConfig, BatchRunner, Metric, MetricSet, Representation, RepresentationSet,
    ReportWriter,
};

#[derive(Parser)]
#[command(name = "milp-struct")]
#[command(about = "Structural parameters (treewidth, torso width, treedepth) of MILP instances")]
struct Args {
    /// Instance files (.mps, .json) or .txt lists of instance paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Report file; .json/.jsonl writes JSON lines, anything else CSV
    #[arg(short, long, default_value = "results.csv")]
    output: PathBuf,

    /// JSON analysis config; command-line flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, value_delimiter = ',')]
    representations: Option<Vec<Representation>>,

    #[arg(long, value_enum, value_delimiter = ',')]
    metrics: Option<Vec<Metric>>,

    /// Count the objective row as a constraint
    #[arg(long)]
    objective: bool,

    /// Per-instance wall-clock budget in seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[arg(long)]
    grace: Option<u64>,

    #[arg(long, value_enum)]
    lower_bound: Option<LowerBoundHeuristic>,

    #[arg(long, value_enum)]
    upper_bound: Option<UpperBoundHeuristic>,

    /// Also export every generated graph in DIMACS format
    #[arg(long)]
    dimacs_dir: Option<PathBuf>,
}

impl Args {
    fn analysis_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_path(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(selected) = &self.representations {
            config.representations = RepresentationSet::only(selected);
        }
        if let Some(selected) = &self.metrics {
            config.metrics = MetricSet::only(selected);
        }
        config.include_objective |= self.objective;
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(grace) = self.grace {
            config.grace_secs = grace;
        }
        if let Some(lower) = self.lower_bound {
            config.lower_bound_heuristic = lower;
        }
        if let Some(upper) = self.upper_bound {
            config.upper_bound_heuristic = upper;
        }
        if self.dimacs_dir.is_some() {
            config.dimacs_dir = self.dimacs_dir.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let config = args.analysis_config()?;
    let paths = expand_inputs(&args.inputs).context("expand input list")?;

    if let Some(dir) = &config.dimacs_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("create DIMACS directory {:?}", dir))?;
    }

    info!(
        "Analysing {} instances ({} s budget each), report to {:?}",
        paths.len(),
        config.timeout_secs,
        args.output
    );
    let start = Instant::now();
    let mut writer = ReportWriter::create(&args.output, config.representations)?;
    let runner = BatchRunner::new(config.clone(), config.heuristics());

    let mut completed = 0;
    for path in &paths {
        let outcome = runner.process_instance(path);
        completed += usize::from(outcome.is_completed());
        writer.append(&outcome)?;
    }
    info!(
        "Batch finished: {}/{} instances completed in {:?}",
        completed,
        paths.len(),
        start.elapsed()
    );
    Ok(())
}
