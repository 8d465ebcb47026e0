use super::TrainingAlgorithm;
use crate::config::TrainerConfig;
use crate::data::Query;
use crate::error::Result;
use crate::loss::{ErrorFunction, Square};
use crate::ranker::{MlpRanker, Ranker};

/// Pointwise training: regress every document's score onto its label
#[derive(Debug, Default)]
pub struct Pointwise<E = Square> {
    error: E,
}

impl<E: ErrorFunction> Pointwise<E> {
    pub fn new(error: E) -> Self {
        Pointwise { error }
    }
}

impl<E: ErrorFunction> TrainingAlgorithm<MlpRanker> for Pointwise<E> {
    fn train(&mut self, ranker: &mut MlpRanker, queries: &[Query], config: &TrainerConfig) -> Result<()> {
        let mut num_trained = 0;

        for doc in queries.iter().flat_map(|q| q.documents()) {
            ranker.predict(doc.features())?;
            ranker.back_prop(doc.label(), &self.error);
            num_trained += 1;
            if config.batch_size > 0 && num_trained % config.batch_size == 0 {
                ranker.update_weights(config.learning_rate, config.regularization_rate);
            }
        }

        ranker.update_weights(config.learning_rate, config.regularization_rate);
        Ok(())
    }

    fn loss(&self, ranker: &mut MlpRanker, queries: &[Query]) -> Result<f64> {
        let mut total = 0.0;
        let mut count = 0usize;
        for doc in queries.iter().flat_map(|q| q.documents()) {
            total += self.error.error(ranker.predict(doc.features())?, doc.label());
            count += 1;
        }
        Ok(if count == 0 { 0.0 } else { total / count as f64 })
    }
}
