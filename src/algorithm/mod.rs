//! Training strategies plugged into the [`Trainer`](crate::Trainer) loop

mod pointwise;
mod sortnet;

pub use pointwise::Pointwise;
pub use sortnet::{PREFER_FIRST, PREFER_SECOND, SortNet, THRESHOLD, pair_target};

use crate::config::TrainerConfig;
use crate::data::Query;
use crate::error::Result;
use crate::ranker::Ranker;

/// One pass of an algorithm over the training set, and the loss it reports
pub trait TrainingAlgorithm<R: Ranker> {
    /// Train the ranker for one epoch
    fn train(&mut self, ranker: &mut R, queries: &[Query], config: &TrainerConfig) -> Result<()>;

    /// Mean loss of the ranker over `queries`
    fn loss(&self, ranker: &mut R, queries: &[Query]) -> Result<f64>;
}
