// src/ops/multiply.rs

use crate::error::GradFlowError;
use crate::graph::{Graph, NodeId};
use crate::ops::accumulate;
use crate::value::{broadcast_zip, scalar, zeros_like, Value};
use std::collections::HashMap;

const OPERATION: &str = "Multiply";

// --- Forward Operation ---

/// Multiplies every inbound value elementwise, under broadcasting.
pub(crate) fn forward(g: &mut Graph, id: NodeId) -> Result<(), GradFlowError> {
    let inbound = g.node_ref(id)?.inbound.clone();
    let mut product: Option<Value> = None;
    for &producer in &inbound {
        let v = g.value_of(producer)?;
        product = Some(match product {
            Some(acc) => broadcast_zip(&acc, v, OPERATION, |a, b| a * b)?,
            None => v.clone(),
        });
    }
    g.node_mut(id)?.value = product;
    Ok(())
}

// --- Backward Operation ---

/// Generalized product rule: each inbound slot receives the consumer's
/// gradient times the product of every *other* inbound value. A node
/// appearing in several slots accumulates one contribution per slot.
pub(crate) fn backward(g: &mut Graph, id: NodeId) -> Result<(), GradFlowError> {
    let inbound = g.node_ref(id)?.inbound.clone();
    let outbound = g.node_ref(id)?.outbound.clone();
    let values: Vec<Value> = inbound
        .iter()
        .map(|&p| g.value_of(p).cloned())
        .collect::<Result<_, _>>()?;
    let mut gradients = HashMap::new();
    for (slot, &producer) in inbound.iter().enumerate() {
        gradients.insert(producer, zeros_like(&values[slot]));
    }
    for &consumer in &outbound {
        let grad = g.consumer_gradient(consumer, id)?.clone();
        for (slot, &producer) in inbound.iter().enumerate() {
            let mut others = scalar(1.0);
            for (j, v) in values.iter().enumerate() {
                if j != slot {
                    others = broadcast_zip(&others, v, OPERATION, |a, b| a * b)?;
                }
            }
            let contribution = broadcast_zip(&grad, &others, OPERATION, |a, b| a * b)?;
            accumulate(&mut gradients, producer, &contribution, OPERATION)?;
        }
    }
    g.node_mut(id)?.gradients = gradients;
    Ok(())
}

// --- Tests ---
