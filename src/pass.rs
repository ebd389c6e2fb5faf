//! Forward and backward execution over a computed topological order.

use crate::error::GradFlowError;
use crate::graph::{Graph, NodeId};
use crate::value::Value;
use log::trace;

impl Graph {
    /// Runs a forward pass over `order` and returns the terminal node's value.
    ///
    /// The order must come from [`Graph::topological_sort`], which guarantees
    /// every inbound value is defined before its reader runs.
    pub fn run_forward(
        &mut self,
        order: &[NodeId],
        terminal: NodeId,
    ) -> Result<Value, GradFlowError> {
        if !order.contains(&terminal) {
            return Err(GradFlowError::UnresolvedValue { id: terminal });
        }
        trace!("forward pass over {} node(s)", order.len());
        for &id in order {
            self.forward_node(id)?;
        }
        Ok(self.value_of(terminal)?.clone())
    }

    /// Runs a forward pass, then a backward pass in exactly the reverse
    /// order, leaving every node's gradient map freshly accumulated.
    pub fn run_forward_and_backward(&mut self, order: &[NodeId]) -> Result<(), GradFlowError> {
        trace!("forward pass over {} node(s)", order.len());
        for &id in order {
            self.forward_node(id)?;
        }
        // A violated reverse order must surface as MissingGradient, never
        // as a stale entry left by an earlier pass.
        for &id in order {
            self.node_mut(id)?.gradients.clear();
        }
        trace!("backward pass over {} node(s)", order.len());
        for &id in order.iter().rev() {
            self.backward_node(id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::scalar;
    use std::collections::HashMap;

    #[test]
    fn a_terminal_outside_the_order_is_unresolved() {
        let mut g = Graph::new();
        let x = g.input();
        let stranger = g.input();
        let order = g
            .topological_sort(HashMap::from([(x, scalar(1.0))]))
            .unwrap();
        assert_eq!(
            g.run_forward(&order, stranger),
            Err(GradFlowError::UnresolvedValue { id: stranger })
        );
    }

    #[test]
    fn backward_rebuilds_gradients_from_scratch() {
        let mut g = Graph::new();
        let x = g.input();
        let s = g.sigmoid(x).unwrap();
        let cost = g.mean_squared_error(x, s).unwrap();
        let order = g
            .topological_sort(HashMap::from([(x, scalar(0.0))]))
            .unwrap();
        g.run_forward_and_backward(&order).unwrap();
        let first = g.gradient(x, x).unwrap().clone();
        g.run_forward_and_backward(&order).unwrap();
        assert_eq!(g.gradient(x, x).unwrap(), &first);
        assert_eq!(g.node_ref(cost).unwrap().gradients.len(), 2);
    }
}
