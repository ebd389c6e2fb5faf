//! Trains a two-layer network (Linear -> Sigmoid -> Linear) with an MSE
//! cost on a synthetic regression task, resampling a mini-batch each step.
//!
//! Run with `cargo run --example train_regression`; set
//! `RUST_LOG=gradflow=debug` to watch the engine schedule and step.

use gradflow::{sgd_update, GradFlowError, Graph};
use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;
use std::collections::HashMap;

const N_SAMPLES: usize = 128;
const N_FEATURES: usize = 4;
const N_HIDDEN: usize = 8;
const BATCH: usize = 16;
const EPOCHS: usize = 30;
const LEARNING_RATE: f64 = 0.05;

fn main() -> Result<(), GradFlowError> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(7);
    let features: Array2<f64> =
        Array2::random_using((N_SAMPLES, N_FEATURES), StandardNormal, &mut rng);
    let noise: Array1<f64> = Array1::random_using(N_SAMPLES, StandardNormal, &mut rng);
    let mut targets = Array2::<f64>::zeros((N_SAMPLES, 1));
    for (i, row) in features.outer_iter().enumerate() {
        targets[[i, 0]] = row.sum().tanh() * 2.0 + 0.1 * noise[i];
    }

    let mut graph = Graph::new();
    let x = graph.input();
    let y = graph.input();
    let w1 = graph.input();
    let b1 = graph.input();
    let w2 = graph.input();
    let b2 = graph.input();
    let hidden = graph.linear(x, w1, b1)?;
    let squashed = graph.sigmoid(hidden)?;
    let prediction = graph.linear(squashed, w2, b2)?;
    let cost = graph.mean_squared_error(y, prediction)?;

    let w1_init: Array2<f64> =
        Array2::random_using((N_FEATURES, N_HIDDEN), StandardNormal, &mut rng);
    let w2_init: Array2<f64> = Array2::random_using((N_HIDDEN, 1), StandardNormal, &mut rng);

    let picks = sample(&mut rng, N_SAMPLES, BATCH).into_vec();
    let order = graph.topological_sort(HashMap::from([
        (x, features.select(Axis(0), &picks).into_dyn()),
        (y, targets.select(Axis(0), &picks).into_dyn()),
        (w1, w1_init.into_dyn()),
        (b1, Array1::<f64>::zeros(N_HIDDEN).into_dyn()),
        (w2, w2_init.into_dyn()),
        (b2, Array1::<f64>::zeros(1).into_dyn()),
    ]))?;

    let trainables = [w1, b1, w2, b2];
    let steps_per_epoch = N_SAMPLES / BATCH;
    for epoch in 0..EPOCHS {
        let mut epoch_loss = 0.0;
        for _ in 0..steps_per_epoch {
            let picks = sample(&mut rng, N_SAMPLES, BATCH).into_vec();
            graph.set_value(x, features.select(Axis(0), &picks).into_dyn())?;
            graph.set_value(y, targets.select(Axis(0), &picks).into_dyn())?;
            graph.run_forward_and_backward(&order)?;
            if let Some(loss) = graph.value(cost) {
                epoch_loss += loss.sum();
            }
            sgd_update(&mut graph, &trainables, LEARNING_RATE)?;
        }
        println!("Epoch: {}, Loss: {:.3}", epoch + 1, epoch_loss / steps_per_epoch as f64);
    }
    Ok(())
}
