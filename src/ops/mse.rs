// src/ops/mse.rs

use crate::error::GradFlowError;
use crate::graph::{Graph, NodeId};
use crate::ops::{MseState, Op};
use crate::value::{into_column, scalar};
use std::collections::HashMap;

const OPERATION: &str = "MeanSquaredError";

// --- Forward Operation ---

/// Mean squared error over a batch.
///
/// Both operands are reshaped to `m x 1` columns, where `m` is the
/// first-axis extent of the label value (1 for a 0-d label), before
/// differencing. The difference column and `m` are retained for backward.
pub(crate) fn forward(g: &mut Graph, id: NodeId) -> Result<(), GradFlowError> {
    let inbound = g.node_ref(id)?.inbound.clone();
    let (y_id, a_id) = (inbound[0], inbound[1]);
    let y_raw = g.value_of(y_id)?;
    let m = if y_raw.ndim() == 0 { 1 } else { y_raw.shape()[0] };
    let y = into_column(y_raw, m, OPERATION)?;
    let a = into_column(g.value_of(a_id)?, m, OPERATION)?;
    let diff = &y - &a;
    let mean = diff
        .mapv(|d| d * d)
        .mean()
        .ok_or_else(|| GradFlowError::ShapeMismatch {
            expected: "a non-empty batch".to_string(),
            actual: format!("{:?}", y.shape()),
            operation: OPERATION.to_string(),
        })?;
    let node = g.node_mut(id)?;
    node.value = Some(scalar(mean));
    if let Op::MeanSquaredError(state) = &mut node.op {
        state.diff = Some(diff.into_dyn());
        state.batch = m;
    }
    Ok(())
}

// --- Backward Operation ---

/// Terminal semantics: the cost node reads no consumers and instead seeds
/// its gradient map directly from the retained forward intermediates,
/// `(2/m) * diff` for the labels and `-(2/m) * diff` for the predictions.
pub(crate) fn backward(g: &mut Graph, id: NodeId) -> Result<(), GradFlowError> {
    let inbound = g.node_ref(id)?.inbound.clone();
    let (y_id, a_id) = (inbound[0], inbound[1]);
    let (diff, m) = match &g.node_ref(id)?.op {
        Op::MeanSquaredError(MseState {
            diff: Some(diff),
            batch,
        }) => (diff.clone(), *batch),
        _ => return Err(GradFlowError::UnresolvedValue { id }),
    };
    let scale = 2.0 / m as f64;
    let mut gradients = HashMap::new();
    gradients.insert(y_id, diff.mapv(|d| scale * d));
    gradients.insert(a_id, diff.mapv(|d| -scale * d));
    g.node_mut(id)?.gradients = gradients;
    Ok(())
}

// --- Tests ---
