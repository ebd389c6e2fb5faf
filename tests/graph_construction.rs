mod common;

use common::{seeds, vector};
use gradflow::value::scalar;
use gradflow::{GradFlowError, Graph, Op};

#[test]
fn every_edge_points_forward_in_the_order() {
    let mut g = Graph::new();
    let x = g.input();
    let y = g.input();
    let z = g.input();
    let s1 = g.add(&[x, y]).unwrap();
    let s2 = g.multiply(&[y, z]).unwrap();
    let joined = g.add(&[s1, s2]).unwrap();
    let top = g.sigmoid(joined).unwrap();
    let order = g
        .topological_sort(seeds(vec![
            (x, scalar(1.0)),
            (y, scalar(2.0)),
            (z, scalar(3.0)),
        ]))
        .unwrap();
    assert_eq!(order.len(), 7);
    let position =
        |id| order.iter().position(|&n| n == id).expect("node missing from order");
    for &id in &order {
        for &producer in g.inbound(id).unwrap() {
            assert!(position(producer) < position(id));
        }
    }
    assert_eq!(position(top), 6);
}

#[test]
fn the_order_contains_only_reachable_nodes() {
    let mut g = Graph::new();
    let x = g.input();
    let unrelated = g.input();
    let _elsewhere = g.sigmoid(unrelated).unwrap();
    let s = g.sigmoid(x).unwrap();
    let order = g.topological_sort(seeds(vec![(x, scalar(0.0))])).unwrap();
    assert_eq!(order, vec![x, s]);
}

#[test]
fn outbound_mirrors_inbound_across_the_graph() {
    let mut g = Graph::new();
    let x = g.input();
    let y = g.input();
    let sum = g.add(&[x, y]).unwrap();
    let product = g.multiply(&[sum, x]).unwrap();
    assert_eq!(g.outbound(x).unwrap(), &[sum, product]);
    assert_eq!(g.outbound(y).unwrap(), &[sum]);
    assert_eq!(g.outbound(sum).unwrap(), &[product]);
    assert_eq!(g.inbound(product).unwrap(), &[sum, x]);
    assert!(matches!(g.op(product), Some(Op::Multiply)));
}

#[test]
fn construction_arity_violations_are_rejected() {
    let mut g = Graph::new();
    let x = g.input();
    let y = g.input();
    assert!(matches!(
        g.add(&[]),
        Err(GradFlowError::InvalidArity { .. })
    ));
    assert!(matches!(
        g.build_node(Op::Linear, &[x, y]),
        Err(GradFlowError::InvalidArity { .. })
    ));
    assert!(matches!(
        g.build_node(Op::Sigmoid, &[x, y]),
        Err(GradFlowError::InvalidArity { .. })
    ));
}

#[test]
fn seeding_a_non_input_node_fails() {
    let mut g = Graph::new();
    let x = g.input();
    let s = g.sigmoid(x).unwrap();
    assert!(matches!(
        g.topological_sort(seeds(vec![(s, scalar(0.0))])),
        Err(GradFlowError::NotAnInput { .. })
    ));
}

#[test]
fn set_value_reseeds_an_input_between_passes() {
    let mut g = Graph::new();
    let x = g.input();
    let s = g.sigmoid(x).unwrap();
    let order = g.topological_sort(seeds(vec![(x, scalar(0.0))])).unwrap();
    let first = g.run_forward(&order, s).unwrap();
    assert_eq!(first.sum(), 0.5);
    g.set_value(x, vector(&[0.0, 0.0])).unwrap();
    let second = g.run_forward(&order, s).unwrap();
    assert_eq!(second.sum(), 1.0);
    assert!(matches!(
        g.set_value(s, scalar(1.0)),
        Err(GradFlowError::NotAnInput { .. })
    ));
}
