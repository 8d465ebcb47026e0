use super::TrainingAlgorithm;
use crate::config::TrainerConfig;
use crate::data::Query;
use crate::error::Result;
use crate::loss::{ErrorFunction, Square};
use crate::ranker::{Ranker, SortNetRanker};
use rand::Rng;
use rand::rngs::ThreadRng;

/// Minimum margin `delta * prediction` for a pair to count as learned
pub const THRESHOLD: f64 = 0.5;

/// Target outputs when the first document is the more relevant one
pub const PREFER_FIRST: [f64; 2] = [1.0, 0.0];

/// Target outputs when the second document is the more relevant one
pub const PREFER_SECOND: [f64; 2] = [0.0, 1.0];

/// Targets to train a pair on, or `None` when the pair is skipped.
///
/// `delta` is the label difference of the pair and `prediction` the current
/// preference. Pairs with equal labels carry no signal; pairs already ordered
/// the right way with a margin of at least [`THRESHOLD`] are left alone.
pub fn pair_target(delta: f64, prediction: f64) -> Option<[f64; 2]> {
    if delta == 0.0 || delta * prediction >= THRESHOLD {
        None
    } else if delta > 0.0 {
        Some(PREFER_FIRST)
    } else {
        Some(PREFER_SECOND)
    }
}

/// SortNet pairwise training.
///
/// Every document of a query is paired with another document of the same
/// query drawn uniformly at random from `G`.
pub struct SortNet<G = ThreadRng> {
    rng: G,
    error: Square,
}

impl SortNet<ThreadRng> {
    pub fn new() -> Self {
        SortNet::with_rng(rand::rng())
    }
}

impl Default for SortNet<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Rng> SortNet<G> {
    pub fn with_rng(rng: G) -> Self {
        SortNet { rng, error: Square }
    }

    /// Uniform index in `0..len` other than `current`
    fn partner(&mut self, len: usize, current: usize) -> Option<usize> {
        if len < 2 {
            return None;
        }
        let drawn = self.rng.random_range(0..len - 1);
        Some(if drawn >= current { drawn + 1 } else { drawn })
    }
}

impl<G: Rng> TrainingAlgorithm<SortNetRanker> for SortNet<G> {
    fn train(&mut self, ranker: &mut SortNetRanker, queries: &[Query], config: &TrainerConfig) -> Result<()> {
        let (learning_rate, regularization_rate) = (config.learning_rate, config.regularization_rate);
        let mut num_trained = 0;
        let mut num_pairs = 0;

        for query in queries {
            let docs = query.documents();
            for (i, doc1) in docs.iter().enumerate() {
                let Some(j) = self.partner(docs.len(), i) else {
                    continue;
                };
                let doc2 = &docs[j];

                let delta = doc1.label() - doc2.label();
                if delta == 0.0 {
                    continue;
                }
                num_pairs += 1;

                let prediction = ranker.predict_pair(doc1.features(), doc2.features())?;
                if let Some(targets) = pair_target(delta, prediction) {
                    ranker.back_prop(&targets, &self.error)?;
                    num_trained += 1;
                    if config.batch_size > 0 && num_trained % config.batch_size == 0 {
                        ranker.update_weights(learning_rate, regularization_rate);
                    }
                }
            }
        }

        // Remainder of the last batch, or the whole sweep when batch_size is 0
        ranker.update_weights(learning_rate, regularization_rate);
        log::debug!("sortnet: trained on {} of {} informative pairs", num_trained, num_pairs);
        Ok(())
    }

    /// Mean squared error over every ordered pair with distinct labels
    fn loss(&self, ranker: &mut SortNetRanker, queries: &[Query]) -> Result<f64> {
        let mut total = 0.0;
        let mut count = 0usize;

        for query in queries {
            let docs = query.documents();
            for doc1 in docs {
                for doc2 in docs {
                    let delta = doc1.label() - doc2.label();
                    if delta == 0.0 {
                        continue;
                    }
                    ranker.predict_pair(doc1.features(), doc2.features())?;
                    let targets = if delta > 0.0 { PREFER_FIRST } else { PREFER_SECOND };
                    total += self.error.total_error(&ranker.outputs(), &targets);
                    count += 1;
                }
            }
        }

        Ok(if count == 0 { 0.0 } else { total / count as f64 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::ndcg_avg;
    use crate::network::{NetworkShape, WeightInit};
    use crate::optimizer::OptimizerKind;
    use crate::Activation;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn new_ranker(feature_len: usize) -> SortNetRanker {
        let hidden = NetworkShape::default().with_layer(4, Activation::Sigmoid);
        let mut rng = StdRng::seed_from_u64(21);
        SortNetRanker::with_rng(feature_len, &hidden, OptimizerKind::SGD, None, WeightInit::Xavier, &mut rng)
    }

    fn queries() -> Vec<Query> {
        vec![
            Query::from_labeled("a", vec![
                (vec![0.9, 0.1], 2.0),
                (vec![0.5, 0.5], 1.0),
                (vec![0.1, 0.9], 0.0),
            ]),
            Query::from_labeled("b", vec![
                (vec![0.2, 0.7], 0.0),
                (vec![0.8, 0.3], 2.0),
                (vec![0.6, 0.4], 1.0),
            ]),
        ]
    }

    #[test]
    fn test_pair_target() {
        assert_eq!(pair_target(2.0, 0.1), Some(PREFER_FIRST));
        assert_eq!(pair_target(-2.0, 0.1), Some(PREFER_SECOND));
        assert_eq!(pair_target(2.0, 10.0), None);
        assert_eq!(pair_target(0.0, -3.0), None);
        // wrong direction always trains
        assert_eq!(pair_target(1.0, -0.4), Some(PREFER_FIRST));
        assert_eq!(pair_target(1.0, 0.5), None);
    }

    #[test]
    fn test_partner_is_never_current() {
        let mut sortnet = SortNet::with_rng(StdRng::seed_from_u64(1));
        let mut seen = [false; 4];
        for _ in 0..200 {
            let j = sortnet.partner(4, 2).unwrap();
            assert_ne!(j, 2);
            seen[j] = true;
        }
        assert_eq!(seen, [true, true, false, true]);
        assert_eq!(sortnet.partner(1, 0), None);
    }

    #[test]
    fn test_equal_labels_never_train() {
        let queries = vec![Query::from_labeled("same", vec![
            (vec![0.1, 0.2], 1.0),
            (vec![0.3, 0.4], 1.0),
        ])];
        let mut ranker = new_ranker(2);
        let before = ranker.to_model();

        let mut sortnet = SortNet::with_rng(StdRng::seed_from_u64(2));
        let config = TrainerConfig::new(1, 0.5, NetworkShape::default());
        sortnet.train(&mut ranker, &queries, &config).unwrap();

        assert_eq!(ranker.to_model().weights, before.weights);
        assert_eq!(sortnet.loss(&mut ranker, &queries).unwrap(), 0.0);
    }

    #[test]
    fn test_batch_updates() {
        // zero weights and a negligible rate keep every prediction near 0,
        // so all six informative pairs of `queries()` trigger
        let hidden = NetworkShape::default().with_layer(4, Activation::Sigmoid);
        let mut config = TrainerConfig::new(1, 1e-12, NetworkShape::default());
        let triggered = 6;

        for (batch_size, updates) in [(1, triggered + 1), (2, 4), (4, 2), (0, 1)] {
            let mut rng = StdRng::seed_from_u64(3);
            let mut ranker = SortNetRanker::with_rng(2, &hidden, OptimizerKind::SGD, None, WeightInit::Zero, &mut rng);
            let mut sortnet = SortNet::with_rng(rng);

            config.batch_size = batch_size;
            sortnet.train(&mut ranker, &queries(), &config).unwrap();

            assert_eq!(ranker.network().iteration(), updates, "batch size {}", batch_size);
            assert_eq!(updates, if batch_size == 0 { 1 } else { triggered / batch_size + 1 });
            assert_eq!(ranker.network().num_accumulated(), 0);
        }
    }

    #[test]
    fn test_training_reduces_loss() {
        let queries = queries();
        let mut ranker = new_ranker(2);
        let mut sortnet = SortNet::with_rng(StdRng::seed_from_u64(4));
        let mut config = TrainerConfig::new(1, 0.5, NetworkShape::default());
        config.batch_size = 1;

        let before = sortnet.loss(&mut ranker, &queries).unwrap();
        let initial_ndcg = ndcg_avg(&mut ranker, &queries, 3).unwrap();
        for _ in 0..300 {
            sortnet.train(&mut ranker, &queries, &config).unwrap();
        }
        let after = sortnet.loss(&mut ranker, &queries).unwrap();

        assert!(after < before, "loss went from {} to {}", before, after);
        assert!(ndcg_avg(&mut ranker, &queries, 3).unwrap() >= initial_ndcg);
    }
}
