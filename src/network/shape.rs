use crate::Activation;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Constant every bias edge starts from, whatever the initialisation strategy
pub const BIAS_INIT: f64 = 0.01;

/// Size and activation of one non-input layer
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    #[serde(alias = "num")]
    pub size: usize,
    #[serde(alias = "activator")]
    pub activation: Activation,
}

impl LayerSpec {
    pub fn new(size: usize, activation: Activation) -> Self {
        LayerSpec { size, activation }
    }
}

/// Ordered non-input layers of a network, the last one being the output layer
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkShape {
    layers: Vec<LayerSpec>,
}

impl NetworkShape {
    pub fn new(layers: Vec<LayerSpec>) -> Self {
        NetworkShape { layers }
    }

    /// Append a layer
    pub fn with_layer(mut self, size: usize, activation: Activation) -> Self {
        self.layers.push(LayerSpec::new(size, activation));
        self
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// How non-bias weights are drawn at construction
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightInit {
    #[serde(alias = "zero")]
    Zero,
    /// Uniform in [-0.5, 0.5)
    #[serde(alias = "uniform")]
    Uniform,
    /// N(0, 0.1^2)
    #[serde(alias = "gaussian", alias = "normal", alias = "Normal")]
    Gaussian,
    /// N(0, 1/fan_in)
    #[default]
    #[serde(alias = "xavier")]
    Xavier,
}

impl WeightInit {
    /// Draw one weight for an edge into a node with `fan_in` non-bias inputs
    pub fn sample<R: Rng + ?Sized>(self, fan_in: usize, rng: &mut R) -> f64 {
        match self {
            WeightInit::Zero => 0.0,
            WeightInit::Uniform => rng.random_range(-0.5..0.5),
            WeightInit::Gaussian => {
                let z: f64 = rng.sample(StandardNormal);
                0.1 * z
            }
            WeightInit::Xavier => {
                let z: f64 = rng.sample(StandardNormal);
                z * (1.0 / fan_in.max(1) as f64).sqrt()
            }
        }
    }
}
