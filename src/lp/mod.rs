pub mod json;
pub mod loader;
pub mod model;
pub mod mps;
pub mod statistics;

pub use json::JsonProgramReader;
pub use loader::{expand_inputs, instance_name, LpLoader};
pub use model::{Column, LinearProgram, Row};
pub use mps::MpsParser;
pub use statistics::LpStatistics;
