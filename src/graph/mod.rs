pub mod components;
pub mod construction;
pub mod model;
pub mod serialization;

pub use components::{Component, ComponentDecomposer};
pub use construction::{
    DualGraphGenerator, GraphGenerator, IncidenceGraphGenerator, PrimalGraphGenerator,
    Representation,
};
pub use model::{GraphModel, IdAllocator, Node, NodeId, NodeKind};
pub use serialization::DimacsWriter;
