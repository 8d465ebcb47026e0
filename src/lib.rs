//! # LTR-NN
//!
//! Learning-to-rank with feed-forward neural networks in Rust.
//!
//! The network keeps its nodes and weighted edges in flat arenas and trains
//! through accumulated gradients applied in batches. On top of it sit two
//! rankers: a pointwise MLP regressing onto relevance labels and SortNet,
//! a pairwise comparator that learns which of two documents ranks higher.
//! Ranking quality is measured with NDCG@k.

mod activation;
mod regularization;
pub mod algorithm;
pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod loss;
pub mod model;
pub mod network;
pub mod optimizer;
pub mod ranker;
pub mod report;
pub mod trainer;
pub mod visualization;

// Re-export main types
pub use activation::Activation;
pub use regularization::Regularization;
pub use config::{Algorithm, TrainerConfig};
pub use data::{Document, Query};
pub use error::{LtrError, Result};
pub use model::Model;
pub use network::{LayerSpec, Network, NetworkShape, WeightInit};
pub use ranker::{MlpRanker, Ranker, SortNetRanker};
pub use trainer::{Trainer, TrainingSummary};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
