//! Per-edge optimizers used when applying accumulated gradients
//!
//! Every edge of a [`Network`](crate::Network) owns its own optimizer
//! instance, so stateful rules (momentum, adaptive rates) keep one state per
//! weight. An optimizer turns the accumulated error derivative of its edge
//! into the delta that is *added* to the weight, so descent is already folded
//! into the sign of the returned value.

mod sgd;
mod adagrad;
mod adam;

pub use sgd::{Momentum, Nesterov, SGD};
pub use adagrad::{AdaDelta, AdaGrad, RMSProp};
pub use adam::Adam;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Common trait for optimizers
pub trait Optimizer: Debug {
    /// Compute the weight delta for an accumulated error derivative.
    ///
    /// `iteration` is the number of weight updates the network has applied
    /// so far, starting at 0.
    fn optimize(&mut self, error_der: f64, learning_rate: f64, iteration: usize) -> f64;

    /// Clone into a fresh box, keeping the accumulated state
    fn box_clone(&self) -> Box<dyn Optimizer>;
}

impl Clone for Box<dyn Optimizer> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Optimizer selection as it appears in the configuration
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizerKind {
    #[default]
    #[serde(alias = "sgd", alias = "Sgd")]
    SGD,
    #[serde(alias = "momentum")]
    Momentum,
    #[serde(alias = "nesterov")]
    Nesterov,
    #[serde(alias = "adagrad", alias = "Adagrad")]
    AdaGrad,
    #[serde(alias = "rmsprop", alias = "RmsProp")]
    RMSProp,
    #[serde(alias = "adadelta", alias = "Adadelta")]
    AdaDelta,
    #[serde(alias = "adam")]
    Adam,
}

impl OptimizerKind {
    /// Build a fresh optimizer instance with zeroed state
    pub fn build(self) -> Box<dyn Optimizer> {
        match self {
            OptimizerKind::SGD => Box::new(SGD),
            OptimizerKind::Momentum => Box::new(Momentum::default()),
            OptimizerKind::Nesterov => Box::new(Nesterov::default()),
            OptimizerKind::AdaGrad => Box::new(AdaGrad::default()),
            OptimizerKind::RMSProp => Box::new(RMSProp::default()),
            OptimizerKind::AdaDelta => Box::new(AdaDelta::default()),
            OptimizerKind::Adam => Box::new(Adam::default()),
        }
    }
}
