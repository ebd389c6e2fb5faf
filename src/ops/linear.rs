// src/ops/linear.rs

use crate::error::GradFlowError;
use crate::graph::{Graph, NodeId};
use crate::ops::accumulate;
use crate::value::{as_matrix, broadcast_zip, zeros_like};
use ndarray::Axis;
use std::collections::HashMap;

const OPERATION: &str = "Linear";

// --- Forward Operation ---

/// Computes `x . w + b`, the affine transform of a batch of rows.
///
/// `x` and `w` must be rank-2 with agreeing inner dimensions; `b` is added
/// under broadcasting (typically a vector spanning the output columns).
pub(crate) fn forward(g: &mut Graph, id: NodeId) -> Result<(), GradFlowError> {
    let inbound = g.node_ref(id)?.inbound.clone();
    let (x_id, w_id, b_id) = (inbound[0], inbound[1], inbound[2]);
    let x = as_matrix(g.value_of(x_id)?, OPERATION)?;
    let w = as_matrix(g.value_of(w_id)?, OPERATION)?;
    if x.ncols() != w.nrows() {
        return Err(GradFlowError::ShapeMismatch {
            expected: format!("weights with {} row(s)", x.ncols()),
            actual: format!("{:?}", w.shape()),
            operation: OPERATION.to_string(),
        });
    }
    let xw = x.dot(&w).into_dyn();
    let b = g.value_of(b_id)?;
    let value = broadcast_zip(&xw, b, OPERATION, |p, q| p + q)?;
    g.node_mut(id)?.value = Some(value);
    Ok(())
}

// --- Backward Operation ---

/// Standard affine gradients: `dX = dC . W^T`, `dW = X^T . dC`, and `dB`
/// is `dC` summed over the batch axis.
pub(crate) fn backward(g: &mut Graph, id: NodeId) -> Result<(), GradFlowError> {
    let inbound = g.node_ref(id)?.inbound.clone();
    let outbound = g.node_ref(id)?.outbound.clone();
    let (x_id, w_id, b_id) = (inbound[0], inbound[1], inbound[2]);
    let x = as_matrix(g.value_of(x_id)?, OPERATION)?.to_owned();
    let w = as_matrix(g.value_of(w_id)?, OPERATION)?.to_owned();
    let mut gradients = HashMap::new();
    gradients.insert(x_id, zeros_like(g.value_of(x_id)?));
    gradients.insert(w_id, zeros_like(g.value_of(w_id)?));
    gradients.insert(b_id, zeros_like(g.value_of(b_id)?));
    for &consumer in &outbound {
        let grad = as_matrix(g.consumer_gradient(consumer, id)?, OPERATION)?.to_owned();
        if grad.dim() != (x.nrows(), w.ncols()) {
            return Err(GradFlowError::ShapeMismatch {
                expected: format!("[{}, {}]", x.nrows(), w.ncols()),
                actual: format!("{:?}", grad.shape()),
                operation: OPERATION.to_string(),
            });
        }
        accumulate(&mut gradients, x_id, &grad.dot(&w.t()).into_dyn(), OPERATION)?;
        accumulate(&mut gradients, w_id, &x.t().dot(&grad).into_dyn(), OPERATION)?;
        accumulate(&mut gradients, b_id, &grad.sum_axis(Axis(0)).into_dyn(), OPERATION)?;
    }
    g.node_mut(id)?.gradients = gradients;
    Ok(())
}

// --- Tests ---
