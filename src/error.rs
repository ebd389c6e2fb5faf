use crate::graph::NodeId;
use thiserror::Error;

/// Custom error type for the gradflow engine.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum GradFlowError {
    #[error("Cycle detected in the computation graph: {remaining} node(s) could not be ordered")]
    GraphCycle { remaining: usize },

    #[error("Shape mismatch during operation {operation}: expected {expected}, got {actual}")]
    ShapeMismatch {
        expected: String,
        actual: String,
        operation: String,
    },

    #[error("Node {id} has no value: it was read before a forward evaluation defined it")]
    UnresolvedValue { id: NodeId },

    #[error("Node {holder} holds no gradient entry for node {id}")]
    MissingGradient { id: NodeId, holder: NodeId },

    #[error("{op} expects {expected} inbound node(s), got {actual}")]
    InvalidArity {
        op: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("Node {id} is not an Input node (operation {operation})")]
    NotAnInput { id: NodeId, operation: String },

    #[error("Node {id} does not belong to this graph")]
    UnknownNode { id: NodeId },
}
