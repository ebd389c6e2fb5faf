//! The graph arena: nodes, handles, and wiring.

use crate::error::GradFlowError;
use crate::ops::{MseState, Op};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;

/// Handle addressing a node inside a [`Graph`].
///
/// Copyable, ordered by creation, and meaningless outside the graph that
/// issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in its graph's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A graph vertex: one operation, its cached value, its edges, and the
/// gradients accumulated by the latest backward pass.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) op: Op,
    pub(crate) value: Option<Value>,
    pub(crate) inbound: Vec<NodeId>,
    pub(crate) outbound: Vec<NodeId>,
    pub(crate) gradients: HashMap<NodeId, Value>,
}

/// The computation graph: an arena of nodes wired into a DAG.
///
/// Nodes are created through [`Graph::build_node`] or the per-operation
/// constructors and addressed by [`NodeId`]. Values and gradients live on the
/// nodes and are filled in by the scheduling and pass methods.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    pub fn new() -> Self {
        Graph { nodes: Vec::new() }
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node computing `op` over the given inbound nodes.
    ///
    /// Checks the operation's arity, wires the new node as an outbound
    /// neighbor of every inbound node, and returns its handle. The node has
    /// no value until a forward pass (or seeding, for Input) assigns one.
    pub fn build_node(&mut self, op: Op, inbound: &[NodeId]) -> Result<NodeId, GradFlowError> {
        op.validate_arity(inbound.len())?;
        for &producer in inbound {
            self.check_id(producer)?;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            op,
            value: None,
            inbound: inbound.to_vec(),
            outbound: Vec::new(),
            gradients: HashMap::new(),
        });
        for &producer in inbound {
            // outbound is a set: one edge per distinct consumer
            let outbound = &mut self.nodes[producer.0].outbound;
            if !outbound.contains(&id) {
                outbound.push(id);
            }
        }
        Ok(id)
    }

    /// Adds an Input node. Its value comes from seeding or [`Graph::set_value`].
    pub fn input(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            op: Op::Input,
            value: None,
            inbound: Vec::new(),
            outbound: Vec::new(),
            gradients: HashMap::new(),
        });
        id
    }

    /// Adds a node summing one or more inbound values.
    pub fn add(&mut self, inbound: &[NodeId]) -> Result<NodeId, GradFlowError> {
        self.build_node(Op::Add, inbound)
    }

    /// Adds a node multiplying one or more inbound values.
    pub fn multiply(&mut self, inbound: &[NodeId]) -> Result<NodeId, GradFlowError> {
        self.build_node(Op::Multiply, inbound)
    }

    /// Adds a node computing `x . w + b`.
    pub fn linear(&mut self, x: NodeId, w: NodeId, b: NodeId) -> Result<NodeId, GradFlowError> {
        self.build_node(Op::Linear, &[x, w, b])
    }

    /// Adds a node applying the logistic function elementwise.
    pub fn sigmoid(&mut self, x: NodeId) -> Result<NodeId, GradFlowError> {
        self.build_node(Op::Sigmoid, &[x])
    }

    /// Adds a mean-squared-error cost node over labels `y` and predictions `a`.
    pub fn mean_squared_error(&mut self, y: NodeId, a: NodeId) -> Result<NodeId, GradFlowError> {
        self.build_node(Op::MeanSquaredError(MseState::default()), &[y, a])
    }

    /// Overwrites an Input node's value, e.g. to feed the next mini-batch.
    pub fn set_value(&mut self, id: NodeId, value: Value) -> Result<(), GradFlowError> {
        let node = self.node_mut(id)?;
        if !node.op.is_input() {
            return Err(GradFlowError::NotAnInput {
                id,
                operation: "set_value".to_string(),
            });
        }
        node.value = Some(value);
        Ok(())
    }

    /// The node's current value, if any pass or seeding assigned one.
    pub fn value(&self, id: NodeId) -> Option<&Value> {
        self.nodes.get(id.0)?.value.as_ref()
    }

    /// The gradient of the cost with respect to `wrt`, as accumulated on
    /// `node` by the latest backward pass.
    pub fn gradient(&self, node: NodeId, wrt: NodeId) -> Option<&Value> {
        self.nodes.get(node.0)?.gradients.get(&wrt)
    }

    /// The node's operation variant.
    pub fn op(&self, id: NodeId) -> Option<&Op> {
        self.nodes.get(id.0).map(|n| &n.op)
    }

    /// Nodes this node reads from, in slot order.
    pub fn inbound(&self, id: NodeId) -> Option<&[NodeId]> {
        self.nodes.get(id.0).map(|n| n.inbound.as_slice())
    }

    /// Nodes reading from this node.
    pub fn outbound(&self, id: NodeId) -> Option<&[NodeId]> {
        self.nodes.get(id.0).map(|n| n.outbound.as_slice())
    }

    pub(crate) fn node_ref(&self, id: NodeId) -> Result<&Node, GradFlowError> {
        self.nodes.get(id.0).ok_or(GradFlowError::UnknownNode { id })
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, GradFlowError> {
        self.nodes
            .get_mut(id.0)
            .ok_or(GradFlowError::UnknownNode { id })
    }

    /// The node's value, or `UnresolvedValue` when no pass has defined it yet.
    pub(crate) fn value_of(&self, id: NodeId) -> Result<&Value, GradFlowError> {
        self.node_ref(id)?
            .value
            .as_ref()
            .ok_or(GradFlowError::UnresolvedValue { id })
    }

    fn check_id(&self, id: NodeId) -> Result<(), GradFlowError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(GradFlowError::UnknownNode { id })
        }
    }

    /// Wires an extra edge after construction, bypassing arity checks.
    /// Misuse can create a cycle; the scheduler reports those.
    #[cfg(test)]
    pub(crate) fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<(), GradFlowError> {
        self.check_id(from)?;
        self.check_id(to)?;
        self.nodes[to.0].inbound.push(from);
        let outbound = &mut self.nodes[from.0].outbound;
        if !outbound.contains(&to) {
            outbound.push(to);
        }
        Ok(())
    }
}
