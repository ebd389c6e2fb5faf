use gradflow::{NodeId, Value};
use ndarray::{arr1, Array2};
use std::collections::HashMap;

// Shared helpers for the integration suites. Not every suite uses every
// helper, hence the allow(dead_code).

#[allow(dead_code)]
pub fn seeds(pairs: Vec<(NodeId, Value)>) -> HashMap<NodeId, Value> {
    pairs.into_iter().collect()
}

#[allow(dead_code)]
pub fn vector(data: &[f64]) -> Value {
    arr1(data).into_dyn()
}

#[allow(dead_code)]
pub fn column(data: &[f64]) -> Value {
    Array2::from_shape_vec((data.len(), 1), data.to_vec())
        .expect("column construction failed")
        .into_dyn()
}
