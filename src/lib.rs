//! A minimal computational-graph engine with reverse-mode automatic
//! differentiation.
//!
//! Callers wire [`Graph`] nodes into a DAG, seed the Input nodes through
//! [`Graph::topological_sort`], then drive forward/backward passes over the
//! returned order and adjust trainable Inputs with [`optim::sgd_update`].
//! Node values and gradients are dense `f64` arrays supplied by `ndarray`.

pub mod error;
pub mod graph;
pub mod ops;
pub mod optim;
pub mod utils;
pub mod value;

mod pass;
mod schedule;

pub use error::GradFlowError;
pub use graph::{Graph, NodeId};
pub use ops::Op;
pub use optim::sgd_update;
pub use value::Value;

// Re-export the array crate so callers can build values without naming it
// in their own manifests.
pub use ndarray;
