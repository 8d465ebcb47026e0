//! Train a ranker from a JSON configuration and LETOR data files
//!
//! ```bash
//! # synthetic data, default configuration
//! cargo run --bin main
//!
//! # real data
//! cargo run --bin main -- --config sortnet.json \
//!   --train train.txt --validation vali.txt --report epochs.csv
//! ```

use clap::Parser;
use ltr_nn::network::NetworkShape;
use ltr_nn::report::{CsvReport, LogReport, Report};
use ltr_nn::{
    Activation, Algorithm, Network, Query, Ranker, Trainer, TrainerConfig, TrainingSummary, data, visualization,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ltr-nn", version, about = "Learning-to-rank with SortNet and pointwise MLP rankers")]
struct Cli {
    /// JSON training configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Training queries in LETOR format
    #[arg(short, long, requires = "validation")]
    train: Option<PathBuf>,

    /// Validation queries in LETOR format
    #[arg(short, long, requires = "train")]
    validation: Option<PathBuf>,

    /// Where to write the trained model, overrides the configuration
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Per-epoch CSV report
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Random seed for weight initialisation and pair sampling
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => TrainerConfig::from_file(path)?,
        None => default_config(),
    };
    if let Some(model) = cli.model {
        config.model_file = Some(model);
    }

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let (training, validation) = match (&cli.train, &cli.validation) {
        (Some(train), Some(validation)) => (data::read_letor_file(train)?, data::read_letor_file(validation)?),
        _ => {
            log::info!("no data files given, generating a synthetic dataset");
            (synthetic_queries(20, 8, 5, &mut rng), synthetic_queries(5, 8, 5, &mut rng))
        }
    };
    log::info!("{} training and {} validation queries", training.len(), validation.len());

    let summary = match &cli.report {
        Some(path) => run(config, training, validation, rng, CsvReport::create(path)?)?,
        None => run(config, training, validation, rng, LogReport)?,
    };

    println!("{}", visualization::plot_records(&summary.records));
    println!("Best NDCG: {:.6}", summary.max_score);
    println!("Model written to {}", summary.model_file.display());

    Ok(())
}

/// Train with the configured algorithm and print the final network
fn run<S: Report>(
    config: TrainerConfig,
    training: Vec<Query>,
    validation: Vec<Query>,
    rng: StdRng,
    report: S,
) -> ltr_nn::Result<TrainingSummary> {
    match config.algorithm {
        Algorithm::SortNet => {
            let mut trainer = Trainer::sortnet(config, training, validation, rng, report)?;
            let summary = trainer.train_and_validate()?;
            print_network(trainer.ranker().network());
            Ok(summary)
        }
        Algorithm::Pointwise => {
            let mut trainer = Trainer::pointwise(config, training, validation, rng, report)?;
            let summary = trainer.train_and_validate()?;
            print_network(trainer.ranker().network());
            Ok(summary)
        }
    }
}

fn print_network(network: &Network) {
    println!("{}", visualization::visualize_network_structure(network));
    println!("{}", visualization::visualize_weights(network));
}

fn default_config() -> TrainerConfig {
    let mut config = TrainerConfig::new(30, 0.05, NetworkShape::default().with_layer(8, Activation::Sigmoid));
    config.batch_size = 10;
    config
}

/// Queries whose labels follow a hidden linear relevance function
fn synthetic_queries<R: Rng>(num_queries: usize, docs_per_query: usize, feature_len: usize, rng: &mut R) -> Vec<Query> {
    let relevance: Vec<f64> = (0..feature_len).map(|_| rng.random_range(-1.0..1.0)).collect();

    (0..num_queries)
        .map(|q| {
            let docs = (0..docs_per_query)
                .map(|_| {
                    let features: Vec<f64> = (0..feature_len).map(|_| rng.random_range(0.0..1.0)).collect();
                    let score: f64 = features.iter().zip(&relevance).map(|(x, w)| x * w).sum();
                    // three relevance grades
                    let label = if score > 0.3 { 2.0 } else if score > 0.0 { 1.0 } else { 0.0 };
                    (features, label)
                })
                .collect();
            Query::from_labeled(format!("synthetic-{}", q), docs)
        })
        .collect()
}
