//! Error functions used to seed backpropagation and to report losses

mod square;
mod cross_entropy;

pub use square::Square;
pub use cross_entropy::CrossEntropy;

use crate::Activation;
use serde::{Deserialize, Serialize};

/// Common trait for error functions
pub trait ErrorFunction {
    /// Error of a single output against its target
    fn error(&self, output: f64, target: f64) -> f64;

    /// Derivative of the error with respect to the output
    fn derivative(&self, output: f64, target: f64) -> f64;

    /// Summed error over paired outputs and targets
    fn total_error(&self, outputs: &[f64], targets: &[f64]) -> f64 {
        outputs.iter()
            .zip(targets)
            .map(|(&o, &t)| self.error(o, t))
            .sum()
    }
}

/// Error function selection as it appears in the configuration
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorFunctionKind {
    #[default]
    #[serde(alias = "square", alias = "squared")]
    Square,
    /// Labels in [0, 1], paired with a sigmoid output
    #[serde(alias = "crossEntropy", alias = "cross_entropy")]
    CrossEntropy,
}

impl ErrorFunctionKind {
    /// Output activation that keeps predictions in the function's domain
    pub fn output_activation(self) -> Activation {
        match self {
            ErrorFunctionKind::Square => Activation::Identity,
            ErrorFunctionKind::CrossEntropy => Activation::Sigmoid,
        }
    }
}

impl ErrorFunction for ErrorFunctionKind {
    fn error(&self, output: f64, target: f64) -> f64 {
        match self {
            ErrorFunctionKind::Square => Square.error(output, target),
            ErrorFunctionKind::CrossEntropy => CrossEntropy.error(output, target),
        }
    }

    fn derivative(&self, output: f64, target: f64) -> f64 {
        match self {
            ErrorFunctionKind::Square => Square.derivative(output, target),
            ErrorFunctionKind::CrossEntropy => CrossEntropy.derivative(output, target),
        }
    }
}
