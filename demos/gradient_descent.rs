//! Scalar gradient-descent warm-up: minimize `f(x) = x^2 + 5` by stepping
//! against the analytic derivative, no graph involved.
//!
//! Run with `cargo run --example gradient_descent`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn cost(x: f64) -> f64 {
    x * x + 5.0
}

fn gradient(x: f64) -> f64 {
    2.0 * x
}

fn main() {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(42);
    let mut x: f64 = rng.gen_range(-10.0..10.0);
    let learning_rate = 0.1;

    for iteration in 0..100 {
        println!("Iteration {}: Cost = {:.3}, x = {:.3}", iteration, cost(x), x);
        x -= learning_rate * gradient(x);
    }
    println!("Final: Cost = {:.3}, x = {:.3}", cost(x), x);
}
