//! Trains a small classifier on a synthetic two-class dataset.
//!
//! Usage: `train_separable [architecture.json] [training.json]`
//!
//! Without arguments the network has widths [2, 4, 2] with ReLU and no
//! normalization, and the training configuration uses its defaults.

use std::env;
use std::error::Error;
use std::time::Instant;

use multilayer_net::architecture::{load_architecture, ArchitectureConfig};
use multilayer_net::config::{load_config, TrainingConfig};
use multilayer_net::network::MultiLayerNet;
use multilayer_net::optimizers::build_optimizer;
use multilayer_net::utils::{entropy_rng, sample_batch, seeded_rng, two_class_clusters};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const TRAIN_SAMPLES: usize = 1000;
const TEST_SAMPLES: usize = 200;

fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args: Vec<String> = env::args().collect();
    let architecture = match args.get(1) {
        Some(path) => load_architecture(path)?,
        None => ArchitectureConfig::new(vec![2, 4, 2]).with_weight_init_std(0.5),
    };
    let training = match args.get(2) {
        Some(path) => load_config(path)?,
        None => TrainingConfig::default(),
    };

    let mut rng = match training.seed {
        Some(seed) => seeded_rng(seed),
        None => entropy_rng(),
    };

    let program_start = Instant::now();
    let (x_train, t_train) = two_class_clusters(TRAIN_SAMPLES, &mut rng);
    let (x_test, t_test) = two_class_clusters(TEST_SAMPLES, &mut rng);

    let mut net = MultiLayerNet::new(&architecture, &mut rng)?;
    let mut optimizer = build_optimizer(
        training.optimizer,
        training.learning_rate,
        training.momentum,
    );
    info!(
        widths = ?net.layer_widths(),
        optimizer = ?training.optimizer,
        learning_rate = training.learning_rate,
        iterations = training.iterations,
        batch_size = training.batch_size,
        "starting training"
    );

    let train_start = Instant::now();
    for step in 0..training.iterations {
        let (x_batch, t_batch) = sample_batch(&x_train, &t_train, training.batch_size, &mut rng)?;
        let grads = net.gradient(&x_batch, &t_batch)?;
        optimizer.update(net.params_mut(), &grads)?;

        if step % training.eval_interval == 0 {
            info!(
                step,
                loss = net.loss(&x_batch, &t_batch)?,
                train_accuracy = net.accuracy(&x_train, &t_train)?,
                test_accuracy = net.accuracy(&x_test, &t_test)?,
                "progress"
            );
        }
    }
    let train_time = train_start.elapsed().as_secs_f64();

    info!(
        train_accuracy = net.accuracy(&x_train, &t_train)?,
        test_accuracy = net.accuracy(&x_test, &t_test)?,
        train_seconds = train_time,
        total_seconds = program_start.elapsed().as_secs_f64(),
        "training finished"
    );

    Ok(())
}
