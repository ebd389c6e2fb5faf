//! Parameter updates driven by the gradients of the latest backward pass.

pub mod sgd;

pub use sgd::sgd_update;
