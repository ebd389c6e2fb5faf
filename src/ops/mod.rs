//! Operation variants and the shared forward/backward protocol.
//!
//! Each variant lives in its own file with a forward section, a backward
//! section, and its tests; this module owns the [`Op`] enum, the arity
//! table, and the gradient-accumulation helper every backward step shares.

pub mod add;
pub mod input;
pub mod linear;
pub mod mse;
pub mod multiply;
pub mod sigmoid;

use crate::error::GradFlowError;
use crate::graph::{Graph, NodeId};
use crate::value::{broadcast_zip, Value};
use std::collections::HashMap;

/// The closed set of node kinds. Selection happens by pattern matching; no
/// open-ended subclassing is needed since the kind set is fixed and small.
#[derive(Debug, Clone)]
pub enum Op {
    Input,
    Add,
    Multiply,
    Linear,
    Sigmoid,
    MeanSquaredError(MseState),
}

/// Forward-pass intermediates a MeanSquaredError node retains for its
/// backward step: the elementwise difference column and the batch size.
#[derive(Debug, Clone, Default)]
pub struct MseState {
    pub(crate) diff: Option<Value>,
    pub(crate) batch: usize,
}

impl Op {
    /// The variant's display name, used in construction errors.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Input => "Input",
            Op::Add => "Add",
            Op::Multiply => "Multiply",
            Op::Linear => "Linear",
            Op::Sigmoid => "Sigmoid",
            Op::MeanSquaredError(_) => "MeanSquaredError",
        }
    }

    pub(crate) fn is_input(&self) -> bool {
        matches!(self, Op::Input)
    }

    /// Checks the inbound-list length a variant accepts at construction.
    pub(crate) fn validate_arity(&self, actual: usize) -> Result<(), GradFlowError> {
        let (ok, expected) = match self {
            Op::Input => (actual == 0, "exactly 0"),
            Op::Add | Op::Multiply => (actual >= 1, "at least 1"),
            Op::Linear => (actual == 3, "exactly 3"),
            Op::Sigmoid => (actual == 1, "exactly 1"),
            Op::MeanSquaredError(_) => (actual == 2, "exactly 2"),
        };
        if ok {
            Ok(())
        } else {
            Err(GradFlowError::InvalidArity {
                op: self.name(),
                expected,
                actual,
            })
        }
    }
}

impl Graph {
    /// Computes the node's value from its inbound values.
    pub(crate) fn forward_node(&mut self, id: NodeId) -> Result<(), GradFlowError> {
        match self.node_ref(id)?.op {
            Op::Input => input::forward(self, id),
            Op::Add => add::forward(self, id),
            Op::Multiply => multiply::forward(self, id),
            Op::Linear => linear::forward(self, id),
            Op::Sigmoid => sigmoid::forward(self, id),
            Op::MeanSquaredError(_) => mse::forward(self, id),
        }
    }

    /// Rebuilds the node's gradient map from its consumers' entries
    /// (or from its own forward intermediates, for the terminal cost).
    pub(crate) fn backward_node(&mut self, id: NodeId) -> Result<(), GradFlowError> {
        match self.node_ref(id)?.op {
            Op::Input => input::backward(self, id),
            Op::Add => add::backward(self, id),
            Op::Multiply => multiply::backward(self, id),
            Op::Linear => linear::backward(self, id),
            Op::Sigmoid => sigmoid::backward(self, id),
            Op::MeanSquaredError(_) => mse::backward(self, id),
        }
    }

    /// A consumer's accumulated partial for `id`: the chain-rule upstream
    /// term every non-terminal backward step reads.
    pub(crate) fn consumer_gradient(
        &self,
        consumer: NodeId,
        id: NodeId,
    ) -> Result<&Value, GradFlowError> {
        self.node_ref(consumer)?
            .gradients
            .get(&id)
            .ok_or(GradFlowError::MissingGradient { id, holder: consumer })
    }
}

/// Adds a chain-rule contribution into the accumulator for `key`, growing
/// the accumulator through broadcasting when the contribution is wider.
pub(crate) fn accumulate(
    acc: &mut HashMap<NodeId, Value>,
    key: NodeId,
    contribution: &Value,
    operation: &str,
) -> Result<(), GradFlowError> {
    let merged = match acc.get(&key) {
        Some(current) => broadcast_zip(current, contribution, operation, |a, b| a + b)?,
        None => contribution.clone(),
    };
    acc.insert(key, merged);
    Ok(())
}
