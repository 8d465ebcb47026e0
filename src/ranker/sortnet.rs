use super::Ranker;
use crate::data::Document;
use crate::error::{LtrError, Result};
use crate::loss::ErrorFunction;
use crate::model::Model;
use crate::network::{LayerSpec, Network, NetworkShape, WeightInit};
use crate::optimizer::OptimizerKind;
use crate::{Activation, Regularization};
use rand::Rng;

/// SortNet preference network.
///
/// The network reads the concatenated features `[x1, x2]` of two documents
/// and has two sigmoid outputs; `o1 - o2 > 0` means `x1` is preferred.
///
/// L. Rigutini, T. Papini, M. Maggini and F. Scarselli, "SortNet: Learning to
/// Rank by a Neural Preference Function", IEEE TNN 22, 2011.
#[derive(Clone, Debug)]
pub struct SortNetRanker {
    network: Network,
    feature_len: usize,
    pair: Vec<f64>,
}

impl SortNetRanker {
    pub const NAME: &'static str = "sortnet";

    pub fn with_rng<R: Rng + ?Sized>(
        feature_len: usize,
        hidden: &NetworkShape,
        optimizer: OptimizerKind,
        regularization: Option<Regularization>,
        init: WeightInit,
        rng: &mut R,
    ) -> Self {
        let mut layers = hidden.layers().to_vec();
        layers.push(LayerSpec::new(2, Activation::Sigmoid));
        let network = Network::with_rng(2 * feature_len, &NetworkShape::new(layers), optimizer, regularization, init, rng);
        SortNetRanker::from_network(network)
    }

    pub fn new(
        feature_len: usize,
        hidden: &NetworkShape,
        optimizer: OptimizerKind,
        regularization: Option<Regularization>,
        init: WeightInit,
    ) -> Self {
        Self::with_rng(feature_len, hidden, optimizer, regularization, init, &mut rand::rng())
    }

    fn from_network(network: Network) -> Self {
        let feature_len = network.input_dim() / 2;
        SortNetRanker { network, feature_len, pair: Vec::with_capacity(2 * feature_len) }
    }

    /// Restore a ranker saved with [`Ranker::to_model`]
    pub fn from_model(model: &Model) -> Result<Self> {
        if model.layers.last().map(|l| l.size) != Some(2) || model.input_dim % 2 != 0 {
            return Err(LtrError::Config("a sortnet model needs a paired input and two outputs".to_string()));
        }
        let network = Network::from_model(model, OptimizerKind::default(), None)?;
        Ok(SortNetRanker::from_network(network))
    }

    /// Preference of `doc1` over `doc2`, positive when `doc1` ranks higher
    pub fn predict_pair(&mut self, doc1: &[f64], doc2: &[f64]) -> Result<f64> {
        for side in [doc1, doc2] {
            if side.len() != self.feature_len {
                return Err(LtrError::DimensionMismatch { expected: self.feature_len, actual: side.len() });
            }
        }

        self.pair.clear();
        self.pair.extend_from_slice(doc1);
        self.pair.extend_from_slice(doc2);
        let outputs = self.network.forward(&self.pair)?;
        Ok(outputs[0] - outputs[1])
    }

    /// Outputs of the last pair prediction
    pub fn outputs(&self) -> Vec<f64> {
        self.network.outputs()
    }

    /// Accumulate the gradient of the last pair prediction against `targets`
    pub fn back_prop(&mut self, targets: &[f64; 2], error: &dyn ErrorFunction) -> Result<()> {
        self.network.back_prop_multi(targets, error)
    }
}

impl Ranker for SortNetRanker {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn feature_len(&self) -> usize {
        self.feature_len
    }

    /// Preference of the document over an all-zero reference document
    fn predict(&mut self, features: &[f64]) -> Result<f64> {
        let reference = vec![0.0; self.feature_len];
        self.predict_pair(features, &reference)
    }

    /// Sum of each document's preference over every other document of the query
    fn score_documents(&mut self, documents: &[Document]) -> Result<Vec<f64>> {
        let mut scores = vec![0.0; documents.len()];
        for (i, doc1) in documents.iter().enumerate() {
            for (j, doc2) in documents.iter().enumerate() {
                if i != j {
                    scores[i] += self.predict_pair(doc1.features(), doc2.features())?;
                }
            }
        }
        Ok(scores)
    }

    fn network(&self) -> &Network {
        &self.network
    }

    fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }
}
