use crate::error::GradFlowError;
use crate::graph::{Graph, NodeId};
use log::debug;
use ndarray::Zip;

/// Applies one stochastic-gradient-descent step to the trainable Inputs.
///
/// Each trainable's value becomes `value - learning_rate * gradients[self]`,
/// reading the self-gradient the latest backward pass accumulated. The
/// scaled gradient must broadcast to the value's shape (a consumerless
/// Input carries a scalar-zero gradient, which broadcasts to a no-op); the
/// stored value's shape never changes.
///
/// Must run strictly after a full forward+backward cycle. Gradients are not
/// cleared here: the next backward pass rebuilds them from scratch.
pub fn sgd_update(
    graph: &mut Graph,
    trainables: &[NodeId],
    learning_rate: f64,
) -> Result<(), GradFlowError> {
    for &id in trainables {
        let node = graph.node_mut(id)?;
        if !node.op.is_input() {
            return Err(GradFlowError::NotAnInput {
                id,
                operation: "sgd_update".to_string(),
            });
        }
        let gradient = node
            .gradients
            .get(&id)
            .ok_or(GradFlowError::MissingGradient { id, holder: id })?;
        let value = node
            .value
            .as_ref()
            .ok_or(GradFlowError::UnresolvedValue { id })?;
        let scaled = gradient.mapv(|g| g * learning_rate);
        let stepped = match scaled.broadcast(value.raw_dim()) {
            Some(step) => Zip::from(value).and(&step).map_collect(|&v, &s| v - s),
            None => {
                return Err(GradFlowError::ShapeMismatch {
                    expected: format!("{:?}", value.shape()),
                    actual: format!("{:?}", gradient.shape()),
                    operation: "sgd_update".to_string(),
                })
            }
        };
        debug!(
            "sgd step on {}: lr={}, gradient shape {:?}",
            id,
            learning_rate,
            gradient.shape()
        );
        node.value = Some(stepped);
    }
    Ok(())
}

#[cfg(test)]
#[path = "sgd_test.rs"]
mod sgd_test;
