// src/ops/input.rs

use crate::error::GradFlowError;
use crate::graph::{Graph, NodeId};
use crate::value::{broadcast_zip, scalar};
use std::collections::HashMap;

const OPERATION: &str = "Input";

// --- Forward Operation ---

/// An Input's value comes from seeding or [`Graph::set_value`]; forward is
/// only a presence check.
pub(crate) fn forward(g: &Graph, id: NodeId) -> Result<(), GradFlowError> {
    g.value_of(id).map(|_| ())
}

// --- Backward Operation ---

/// Sums every consumer's partial for this node into `gradients[self]`,
/// starting from a scalar zero. With no consumers the zero stands: a
/// trainable nothing reads simply receives a zero gradient.
pub(crate) fn backward(g: &mut Graph, id: NodeId) -> Result<(), GradFlowError> {
    let outbound = g.node_ref(id)?.outbound.clone();
    let mut total = scalar(0.0);
    for &consumer in &outbound {
        let grad = g.consumer_gradient(consumer, id)?;
        total = broadcast_zip(&total, grad, OPERATION, |a, b| a + b)?;
    }
    g.node_mut(id)?.gradients = HashMap::from([(id, total)]);
    Ok(())
}

// --- Tests ---

#[cfg(test)]
mod tests {
    use crate::error::GradFlowError;
    use crate::graph::Graph;
    use crate::value::scalar;
    use ndarray::arr1;

    #[test]
    fn forward_requires_a_seeded_value() {
        let mut g = Graph::new();
        let x = g.input();
        assert!(matches!(
            g.forward_node(x),
            Err(GradFlowError::UnresolvedValue { .. })
        ));
        g.set_value(x, scalar(1.0)).unwrap();
        assert!(g.forward_node(x).is_ok());
    }

    #[test]
    fn backward_without_consumers_yields_a_scalar_zero() {
        let mut g = Graph::new();
        let x = g.input();
        g.set_value(x, arr1(&[1.0, 2.0]).into_dyn()).unwrap();
        g.backward_node(x).unwrap();
        let grad = g.gradient(x, x).unwrap();
        assert_eq!(grad.ndim(), 0);
        assert_eq!(grad.sum(), 0.0);
    }

    #[test]
    fn backward_sums_every_consumer_contribution() {
        let mut g = Graph::new();
        let x = g.input();
        let s1 = g.sigmoid(x).unwrap();
        let s2 = g.sigmoid(x).unwrap();
        g.set_value(x, arr1(&[0.0, 0.0]).into_dyn()).unwrap();
        g.node_mut(s1)
            .unwrap()
            .gradients
            .insert(x, arr1(&[1.0, 2.0]).into_dyn());
        g.node_mut(s2)
            .unwrap()
            .gradients
            .insert(x, arr1(&[10.0, 20.0]).into_dyn());
        g.backward_node(x).unwrap();
        assert_eq!(g.gradient(x, x).unwrap(), &arr1(&[11.0, 22.0]).into_dyn());
    }

    #[test]
    fn backward_reports_a_consumer_missing_its_entry() {
        let mut g = Graph::new();
        let x = g.input();
        let s = g.sigmoid(x).unwrap();
        g.set_value(x, scalar(0.0)).unwrap();
        assert_eq!(
            g.backward_node(x),
            Err(GradFlowError::MissingGradient { id: x, holder: s })
        );
    }
}
