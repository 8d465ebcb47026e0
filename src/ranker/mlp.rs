use super::Ranker;
use crate::error::{LtrError, Result};
use crate::loss::ErrorFunction;
use crate::model::Model;
use crate::network::{LayerSpec, Network, NetworkShape, WeightInit};
use crate::optimizer::OptimizerKind;
use crate::{Activation, Regularization};
use rand::Rng;

/// Pointwise ranker: one output node scoring each document on its own
#[derive(Clone, Debug)]
pub struct MlpRanker {
    network: Network,
}

impl MlpRanker {
    pub const NAME: &'static str = "mlp";

    /// Build a ranker whose hidden layers follow `hidden`, with a linear output
    pub fn with_rng<R: Rng + ?Sized>(
        feature_len: usize,
        hidden: &NetworkShape,
        optimizer: OptimizerKind,
        regularization: Option<Regularization>,
        init: WeightInit,
        rng: &mut R,
    ) -> Self {
        Self::with_output(feature_len, hidden, Activation::Identity, optimizer, regularization, init, rng)
    }

    /// Like [`with_rng`](Self::with_rng) with a chosen output activation
    pub fn with_output<R: Rng + ?Sized>(
        feature_len: usize,
        hidden: &NetworkShape,
        output: Activation,
        optimizer: OptimizerKind,
        regularization: Option<Regularization>,
        init: WeightInit,
        rng: &mut R,
    ) -> Self {
        let mut layers = hidden.layers().to_vec();
        layers.push(LayerSpec::new(1, output));
        let network = Network::with_rng(feature_len, &NetworkShape::new(layers), optimizer, regularization, init, rng);
        MlpRanker { network }
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

    /// Restore a ranker saved with [`Ranker::to_model`]
    pub fn from_model(model: &Model) -> Result<Self> {
        if model.layers.last().map(|l| l.size) != Some(1) {
            return Err(LtrError::Config("an mlp model needs exactly one output node".to_string()));
        }
        let network = Network::from_model(model, OptimizerKind::default(), None)?;
        Ok(MlpRanker { network })
    }

    /// Accumulate the gradient of the last prediction against `target`
    pub fn back_prop(&mut self, target: f64, error: &dyn ErrorFunction) {
        self.network.back_prop(target, error);
    }
}

impl Ranker for MlpRanker {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn feature_len(&self) -> usize {
        self.network.input_dim()
    }

    fn predict(&mut self, features: &[f64]) -> Result<f64> {
        Ok(self.network.forward(features)?[0])
    }

    fn network(&self) -> &Network {
        &self.network
    }

    fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }
}
