use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::bounds::{GreedyHeuristics, LowerBoundHeuristic, UpperBoundHeuristic};
use crate::error::{Result, StructError};
use crate::graph::Representation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepresentationSet {
    pub primal: bool,
    pub incidence: bool,
    pub dual: bool,
}

impl Default for RepresentationSet {
    fn default() -> Self {
        Self {
            primal: true,
            incidence: true,
            dual: true,
        }
    }
}

impl RepresentationSet {
    pub fn only(selected: &[Representation]) -> Self {
        Self {
            primal: selected.contains(&Representation::Primal),
            incidence: selected.contains(&Representation::Incidence),
            dual: selected.contains(&Representation::Dual),
        }
    }

    pub fn contains(&self, representation: Representation) -> bool {
        match representation {
            Representation::Primal => self.primal,
            Representation::Incidence => self.incidence,
            Representation::Dual => self.dual,
        }
    }

    /// Enabled representations in report order.
    pub fn enabled(&self) -> Vec<Representation> {
        Representation::ALL
            .into_iter()
            .filter(|r| self.contains(*r))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    LowerBound,
    UpperBound,
    TorsoWidth,
    Treedepth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricSet {
    pub lower_bound: bool,
    pub upper_bound: bool,
    pub torso_width: bool,
    pub treedepth: bool,
}

impl Default for MetricSet {
    fn default() -> Self {
        Self {
            lower_bound: true,
            upper_bound: true,
            torso_width: true,
            treedepth: true,
        }
    }
}

impl MetricSet {
    pub fn only(selected: &[Metric]) -> Self {
        Self {
            lower_bound: selected.contains(&Metric::LowerBound),
            upper_bound: selected.contains(&Metric::UpperBound),
            torso_width: selected.contains(&Metric::TorsoWidth),
            treedepth: selected.contains(&Metric::Treedepth),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub representations: RepresentationSet,
    pub include_objective: bool,
    pub metrics: MetricSet,
    pub timeout_secs: u64,
    pub grace_secs: u64,
    pub lower_bound_heuristic: LowerBoundHeuristic,
    pub upper_bound_heuristic: UpperBoundHeuristic,
    pub dimacs_dir: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            representations: RepresentationSet::default(),
            include_objective: false,
            metrics: MetricSet::default(),
            timeout_secs: 600,
            grace_secs: 5,
            lower_bound_heuristic: LowerBoundHeuristic::default(),
            upper_bound_heuristic: UpperBoundHeuristic::default(),
            dimacs_dir: None,
        }
    }
}

impl AnalysisConfig {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("open config file {:?}", path))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("deserialize config file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(StructError::Config("timeout must be at least one second".into()));
        }
        if self.representations.enabled().is_empty() {
            return Err(StructError::Config(
                "at least one graph representation must be enabled".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }

    pub fn heuristics(&self) -> GreedyHeuristics {
        GreedyHeuristics::new(self.lower_bound_heuristic, self.upper_bound_heuristic)
    }
}
