// src/ops/sigmoid.rs

use crate::error::GradFlowError;
use crate::graph::{Graph, NodeId};
use crate::ops::accumulate;
use crate::value::{broadcast_zip, zeros_like};
use std::collections::HashMap;

const OPERATION: &str = "Sigmoid";

fn logistic(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

// --- Forward Operation ---

/// Applies the logistic function elementwise to the single inbound value.
pub(crate) fn forward(g: &mut Graph, id: NodeId) -> Result<(), GradFlowError> {
    let source = g.node_ref(id)?.inbound[0];
    let value = g.value_of(source)?.mapv(logistic);
    g.node_mut(id)?.value = Some(value);
    Ok(())
}

// --- Backward Operation ---

/// The sigmoid derivative expressed through its own output,
/// `s * (1 - s)`, so the exponential is never recomputed.
pub(crate) fn backward(g: &mut Graph, id: NodeId) -> Result<(), GradFlowError> {
    let source = g.node_ref(id)?.inbound[0];
    let outbound = g.node_ref(id)?.outbound.clone();
    let derivative = g.value_of(id)?.mapv(|s| s * (1.0 - s));
    let mut gradients = HashMap::new();
    gradients.insert(source, zeros_like(g.value_of(source)?));
    for &consumer in &outbound {
        let grad = g.consumer_gradient(consumer, id)?;
        let contribution = broadcast_zip(grad, &derivative, OPERATION, |a, b| a * b)?;
        accumulate(&mut gradients, source, &contribution, OPERATION)?;
    }
    g.node_mut(id)?.gradients = gradients;
    Ok(())
}

// --- Tests ---
