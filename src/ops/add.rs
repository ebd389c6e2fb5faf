// src/ops/add.rs

use crate::error::GradFlowError;
use crate::graph::{Graph, NodeId};
use crate::ops::accumulate;
use crate::value::{broadcast_zip, zeros_like, Value};
use std::collections::HashMap;

const OPERATION: &str = "Add";

// --- Forward Operation ---

/// Sums every inbound value elementwise, under broadcasting.
pub(crate) fn forward(g: &mut Graph, id: NodeId) -> Result<(), GradFlowError> {
    let inbound = g.node_ref(id)?.inbound.clone();
    let mut sum: Option<Value> = None;
    for &producer in &inbound {
        let v = g.value_of(producer)?;
        sum = Some(match sum {
            Some(acc) => broadcast_zip(&acc, v, OPERATION, |a, b| a + b)?,
            None => v.clone(),
        });
    }
    g.node_mut(id)?.value = sum;
    Ok(())
}

// --- Backward Operation ---

/// The derivative of a sum w.r.t. each addend is 1: every inbound slot
/// receives each consumer's gradient unchanged.
pub(crate) fn backward(g: &mut Graph, id: NodeId) -> Result<(), GradFlowError> {
    let inbound = g.node_ref(id)?.inbound.clone();
    let outbound = g.node_ref(id)?.outbound.clone();
    let mut gradients = HashMap::new();
    for &producer in &inbound {
        gradients.insert(producer, zeros_like(g.value_of(producer)?));
    }
    for &consumer in &outbound {
        let grad = g.consumer_gradient(consumer, id)?.clone();
        for &producer in &inbound {
            accumulate(&mut gradients, producer, &grad, OPERATION)?;
        }
    }
    g.node_mut(id)?.gradients = gradients;
    Ok(())
}

// --- Tests ---
