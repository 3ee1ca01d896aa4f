//! Per-component bound algorithms.
//!
//! Every algorithm is a variant of [`Algorithm`] and is run through
//! [`Algorithm::evaluate`] on one connected component. Combining components is the job of the
//! orchestrator.

pub mod elimination;
pub mod torso;
pub mod treedepth;
pub mod treewidth;

pub use elimination::EliminationGraph;
pub use torso::TorsoReducer;
pub use treedepth::TreedepthHeuristic;
pub use treewidth::{
    GreedyHeuristics, LowerBoundHeuristic, TreewidthHeuristics, UpperBoundHeuristic,
};

use crate::graph::{Component, ComponentDecomposer};
use crate::pipeline::cancel::{CancellationToken, Interrupt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundSide {
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Treewidth lower bound.
    LowerBound,
    /// Treewidth upper bound.
    UpperBound,
    /// Treewidth bound of the torso over integer variables.
    TorsoWidth(BoundSide),
    /// Treedepth upper bound.
    Treedepth,
}

impl Algorithm {
    pub fn evaluate<H>(
        self,
        component: &Component,
        heuristics: &H,
        cancel: &CancellationToken,
    ) -> Result<usize, Interrupt>
    where
        H: TreewidthHeuristics + ?Sized,
    {
        match self {
            Self::LowerBound if component.edge_count() == 0 => Ok(0),
            Self::UpperBound if component.edge_count() == 0 => Ok(0),
            Self::LowerBound => heuristics.lower_bound(component, cancel),
            Self::UpperBound => heuristics.upper_bound(component, cancel),
            Self::TorsoWidth(side) => {
                let torso = TorsoReducer::reduce(component, cancel)?;
                let inner = match side {
                    BoundSide::Lower => Self::LowerBound,
                    BoundSide::Upper => Self::UpperBound,
                };
                let mut bound = 0;
                for piece in ComponentDecomposer::decompose(&torso) {
                    cancel.checkpoint()?;
                    bound = bound.max(inner.evaluate(&piece, heuristics, cancel)?);
                }
                Ok(bound)
            }
            Self::Treedepth => TreedepthHeuristic::upper_bound(component, cancel),
        }
    }

    /// Short label for log lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::LowerBound => "LB TreeWidth",
            Self::UpperBound => "UB TreeWidth",
            Self::TorsoWidth(BoundSide::Lower) => "LB TorsoWidth",
            Self::TorsoWidth(BoundSide::Upper) => "UB TorsoWidth",
            Self::Treedepth => "UB TreeDepth",
        }
    }

    pub fn heuristic_name<H>(self, heuristics: &H) -> &'static str
    where
        H: TreewidthHeuristics + ?Sized,
    {
        match self {
            Self::LowerBound | Self::TorsoWidth(BoundSide::Lower) => heuristics.lower_bound_name(),
            Self::UpperBound | Self::TorsoWidth(BoundSide::Upper) => heuristics.upper_bound_name(),
            Self::Treedepth => treedepth::TREEDEPTH_NAME,
        }
    }
}
