//! Topological scheduling over the node arena (Kahn's algorithm).

use crate::error::GradFlowError;
use crate::graph::{Graph, NodeId};
use crate::value::Value;
use log::debug;
use std::collections::{HashMap, HashSet, VecDeque};

impl Graph {
    /// Linearizes the subgraph reachable from the seeded Input nodes.
    ///
    /// Every node in the returned order appears strictly after all of its
    /// inbound nodes, and each seeded Input receives its value from `seed`
    /// as it is dequeued. Seeds are taken in id order, so the produced
    /// order is deterministic for a given seed set.
    ///
    /// Fails with [`GradFlowError::NotAnInput`] when a seed key addresses a
    /// non-Input node, [`GradFlowError::UnknownNode`] when it addresses no
    /// node at all, and [`GradFlowError::GraphCycle`] when the reachable
    /// subgraph is not a DAG.
    pub fn topological_sort(
        &mut self,
        mut seed: HashMap<NodeId, Value>,
    ) -> Result<Vec<NodeId>, GradFlowError> {
        let mut roots: Vec<NodeId> = seed.keys().copied().collect();
        roots.sort();
        for &id in &roots {
            if !self.node_ref(id)?.op.is_input() {
                return Err(GradFlowError::NotAnInput {
                    id,
                    operation: "topological_sort".to_string(),
                });
            }
        }

        // Discover every node reachable from the seeds over outbound edges.
        let mut discovered: HashSet<NodeId> = roots.iter().copied().collect();
        let mut frontier: VecDeque<NodeId> = roots.iter().copied().collect();
        while let Some(id) = frontier.pop_front() {
            for &consumer in &self.node_ref(id)?.outbound {
                if discovered.insert(consumer) {
                    frontier.push_back(consumer);
                }
            }
        }

        // In-degree counts one entry per inbound slot, restricted to edges
        // among discovered nodes.
        let mut in_degree: HashMap<NodeId, usize> = HashMap::new();
        for &id in &discovered {
            let count = self
                .node_ref(id)?
                .inbound
                .iter()
                .filter(|p| discovered.contains(p))
                .count();
            in_degree.insert(id, count);
        }

        let mut ready: VecDeque<NodeId> = roots.iter().copied().collect();
        let mut emitted: HashSet<NodeId> = HashSet::new();
        let mut order = Vec::with_capacity(discovered.len());
        while let Some(id) = ready.pop_front() {
            if let Some(value) = seed.remove(&id) {
                self.node_mut(id)?.value = Some(value);
            }
            emitted.insert(id);
            order.push(id);
            let outbound = self.node_ref(id)?.outbound.clone();
            for consumer in outbound {
                let slots = self
                    .node_ref(consumer)?
                    .inbound
                    .iter()
                    .filter(|&&p| p == id)
                    .count();
                if let Some(remaining) = in_degree.get_mut(&consumer) {
                    *remaining = remaining.saturating_sub(slots);
                    if *remaining == 0 && !emitted.contains(&consumer) {
                        ready.push_back(consumer);
                    }
                }
            }
        }

        if order.len() != discovered.len() {
            return Err(GradFlowError::GraphCycle {
                remaining: discovered.len() - order.len(),
            });
        }
        debug!("topological order over {} node(s): {:?}", order.len(), order);
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::scalar;

    fn seeds(pairs: Vec<(NodeId, Value)>) -> HashMap<NodeId, Value> {
        pairs.into_iter().collect()
    }

    fn assert_topological(g: &Graph, order: &[NodeId]) {
        for (pos, &id) in order.iter().enumerate() {
            for &producer in g.inbound(id).unwrap() {
                let producer_pos = order.iter().position(|&n| n == producer).unwrap();
                assert!(producer_pos < pos, "{} must precede {}", producer, id);
            }
        }
    }

    #[test]
    fn orders_a_diamond_and_assigns_seed_values() {
        let mut g = Graph::new();
        let x = g.input();
        let y = g.input();
        let sum = g.add(&[x, y]).unwrap();
        let product = g.multiply(&[x, y]).unwrap();
        let top = g.add(&[sum, product]).unwrap();
        let order = g
            .topological_sort(seeds(vec![(x, scalar(2.0)), (y, scalar(3.0))]))
            .unwrap();
        assert_eq!(order.len(), 5);
        assert_topological(&g, &order);
        assert_eq!(g.value(x).unwrap().sum(), 2.0);
        assert_eq!(g.value(y).unwrap().sum(), 3.0);
        assert!(g.value(top).is_none());
    }

    #[test]
    fn only_nodes_reachable_from_the_seeds_are_ordered() {
        let mut g = Graph::new();
        let x = g.input();
        let orphan = g.input();
        let _lonely = g.sigmoid(orphan).unwrap();
        let s = g.sigmoid(x).unwrap();
        let order = g.topological_sort(seeds(vec![(x, scalar(0.0))])).unwrap();
        assert_eq!(order, vec![x, s]);
    }

    #[test]
    fn the_order_is_deterministic_for_a_seed_set() {
        let build = || {
            let mut g = Graph::new();
            let a = g.input();
            let b = g.input();
            let c = g.input();
            let s1 = g.add(&[a, b]).unwrap();
            let s2 = g.add(&[b, c]).unwrap();
            let _top = g.multiply(&[s1, s2]).unwrap();
            let order = g
                .topological_sort(seeds(vec![
                    (c, scalar(1.0)),
                    (a, scalar(2.0)),
                    (b, scalar(3.0)),
                ]))
                .unwrap();
            order
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn a_back_edge_is_reported_as_a_cycle() {
        let mut g = Graph::new();
        let x = g.input();
        let s1 = g.sigmoid(x).unwrap();
        let s2 = g.sigmoid(s1).unwrap();
        g.add_edge(s2, s1).unwrap();
        let err = g
            .topological_sort(seeds(vec![(x, scalar(0.0))]))
            .unwrap_err();
        assert_eq!(err, GradFlowError::GraphCycle { remaining: 2 });
    }

    #[test]
    fn seeding_a_non_input_is_rejected() {
        let mut g = Graph::new();
        let x = g.input();
        let s = g.sigmoid(x).unwrap();
        let err = g
            .topological_sort(seeds(vec![(s, scalar(0.0))]))
            .unwrap_err();
        assert!(matches!(err, GradFlowError::NotAnInput { .. }));
    }

    #[test]
    fn seeding_an_unknown_id_is_rejected() {
        let mut g = Graph::new();
        let _x = g.input();
        let mut other = Graph::new();
        let _ = other.input();
        let foreign = other.input();
        let err = g
            .topological_sort(seeds(vec![(foreign, scalar(0.0))]))
            .unwrap_err();
        assert!(matches!(err, GradFlowError::UnknownNode { .. }));
    }
}
