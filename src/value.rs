//! Numeric values flowing through the graph.
//!
//! The engine stores every node value and gradient as a dynamic-dimensional
//! `f64` array and leaves all storage and arithmetic to `ndarray`.

use crate::error::GradFlowError;
use ndarray::{arr0, Array2, ArrayView2, ArrayViewD, Ix2, IxDyn, Zip};

/// The numeric payload carried by every node: a dense N-dimensional array.
pub type Value = ndarray::ArrayD<f64>;

/// Creates a 0-d (scalar) value.
pub fn scalar(x: f64) -> Value {
    arr0(x).into_dyn()
}

/// Creates a value of zeros shaped like `v`.
pub fn zeros_like(v: &Value) -> Value {
    Value::zeros(v.raw_dim())
}

/// NumPy-style broadcast shape of two shapes, right-aligned.
fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<IxDyn> {
    let ndim = a.len().max(b.len());
    let mut dims = vec![0; ndim];
    for i in 0..ndim {
        let ad = if i < ndim - a.len() { 1 } else { a[i - (ndim - a.len())] };
        let bd = if i < ndim - b.len() { 1 } else { b[i - (ndim - b.len())] };
        dims[i] = if ad == bd || bd == 1 {
            ad
        } else if ad == 1 {
            bd
        } else {
            return None;
        };
    }
    Some(IxDyn(&dims))
}

/// Combines two values elementwise under broadcasting.
///
/// Both operands are expanded to their common broadcast shape before `f` is
/// applied pairwise; incompatible shapes are a `ShapeMismatch`.
pub(crate) fn broadcast_zip<F>(
    lhs: &Value,
    rhs: &Value,
    operation: &str,
    f: F,
) -> Result<Value, GradFlowError>
where
    F: Fn(f64, f64) -> f64,
{
    let mismatch = || GradFlowError::ShapeMismatch {
        expected: format!("{:?}", lhs.shape()),
        actual: format!("{:?}", rhs.shape()),
        operation: operation.to_string(),
    };
    let dim = broadcast_shape(lhs.shape(), rhs.shape()).ok_or_else(mismatch)?;
    match (lhs.broadcast(dim.clone()), rhs.broadcast(dim)) {
        (Some(a), Some(b)) => Ok(Zip::from(&a).and(&b).map_collect(|&x, &y| f(x, y))),
        _ => Err(mismatch()),
    }
}

/// Reshapes a value of `rows` elements into a `rows x 1` column matrix,
/// regardless of the source layout.
pub(crate) fn into_column(
    v: &Value,
    rows: usize,
    operation: &str,
) -> Result<Array2<f64>, GradFlowError> {
    let mismatch = || GradFlowError::ShapeMismatch {
        expected: format!("[{}, 1]", rows),
        actual: format!("{:?}", v.shape()),
        operation: operation.to_string(),
    };
    if v.len() != rows {
        return Err(mismatch());
    }
    let data: Vec<f64> = v.iter().copied().collect();
    Array2::from_shape_vec((rows, 1), data).map_err(|_| mismatch())
}

/// Views a value as a rank-2 matrix, erroring on any other rank.
pub(crate) fn as_matrix<'a>(
    v: &'a Value,
    operation: &str,
) -> Result<ArrayView2<'a, f64>, GradFlowError> {
    let view: ArrayViewD<'a, f64> = v.view();
    view.into_dimensionality::<Ix2>()
        .map_err(|_| GradFlowError::ShapeMismatch {
            expected: "a rank-2 matrix".to_string(),
            actual: format!("{:?}", v.shape()),
            operation: operation.to_string(),
        })
}
