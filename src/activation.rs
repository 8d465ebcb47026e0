use serde::{Deserialize, Serialize};

/// Slope used by `LeakyReLU` for negative inputs
const LEAKY_SLOPE: f64 = 0.01;

/// Activation applied to the total input of a node
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    #[serde(alias = "identity", alias = "Linear", alias = "linear")]
    Identity,
    #[serde(alias = "sigmoid")]
    Sigmoid,
    #[serde(alias = "tanh")]
    Tanh,
    #[serde(alias = "relu", alias = "Relu")]
    ReLU,
    #[serde(alias = "leakyrelu", alias = "LeakyRelu")]
    LeakyReLU,
}

impl Activation {
    /// Output of the node for a given total input
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Identity => x,
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
            Activation::ReLU => x.max(0.0),
            Activation::LeakyReLU => {
                if x > 0.0 { x } else { LEAKY_SLOPE * x }
            }
        }
    }

    /// Derivative of the output with respect to the total input
    pub fn derivative(self, x: f64) -> f64 {
        match self {
            Activation::Identity => 1.0,
            Activation::Sigmoid => {
                let s = self.apply(x);
                s * (1.0 - s)
            }
            Activation::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            Activation::ReLU => {
                if x > 0.0 { 1.0 } else { 0.0 }
            }
            Activation::LeakyReLU => {
                if x > 0.0 { 1.0 } else { LEAKY_SLOPE }
            }
        }
    }
}
