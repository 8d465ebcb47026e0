//! Training run configuration, read once from JSON
//!
//! ```json
//! {
//!   "algorithm": "sortnet",
//!   "numIterations": 50,
//!   "batchSize": 10,
//!   "learningRate": 0.05,
//!   "regularization": "L2",
//!   "regularizationRate": 0.01,
//!   "optimizer": "adam",
//!   "errorFunction": "square",
//!   "weightInit": "xavier",
//!   "layers": [{"num": 8, "activator": "Sigmoid"}],
//!   "ndcgK": 10,
//!   "modelFile": "model/sortnet.json"
//! }
//! ```

use crate::error::{LtrError, Result};
use crate::loss::ErrorFunctionKind;
use crate::network::{NetworkShape, WeightInit};
use crate::optimizer::OptimizerKind;
use crate::Regularization;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

pub const DEFAULT_NDCG_K: usize = 10;
pub const DEFAULT_MODEL_FILE: &str = "model/model.json";

/// Training strategy
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    /// Pairwise preference network
    #[default]
    #[serde(alias = "sortnet", alias = "Sortnet")]
    SortNet,
    /// Per-document regression onto the label
    #[serde(alias = "pointwise", alias = "mlp", alias = "MLP")]
    Pointwise,
}

/// Parameters of one training run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerConfig {
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(alias = "epochs")]
    pub num_iterations: usize,
    /// Triggered samples per weight update, 0 for one update per sweep
    #[serde(default)]
    pub batch_size: usize,
    pub learning_rate: f64,
    #[serde(default)]
    pub regularization: Option<Regularization>,
    #[serde(default)]
    pub regularization_rate: f64,
    #[serde(default)]
    pub optimizer: OptimizerKind,
    /// Error function of the pointwise algorithm. SortNet always uses the
    /// square error on its two outputs.
    #[serde(default)]
    pub error_function: ErrorFunctionKind,
    #[serde(default)]
    pub weight_init: WeightInit,
    /// Hidden layers; the output layer is added by the ranker
    #[serde(default)]
    pub layers: NetworkShape,
    #[serde(default)]
    pub ndcg_k: Option<usize>,
    #[serde(default)]
    pub model_file: Option<PathBuf>,
}

impl TrainerConfig {
    /// A configuration with defaults for everything but the essentials
    pub fn new(num_iterations: usize, learning_rate: f64, layers: NetworkShape) -> Self {
        TrainerConfig {
            algorithm: Algorithm::default(),
            num_iterations,
            batch_size: 0,
            learning_rate,
            regularization: None,
            regularization_rate: 0.0,
            optimizer: OptimizerKind::default(),
            error_function: ErrorFunctionKind::default(),
            weight_init: WeightInit::default(),
            layers,
            ndcg_k: None,
            model_file: None,
        }
    }

    /// Parse and validate JSON configuration
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: TrainerConfig = serde_json::from_reader(reader)
            .map_err(|e| LtrError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_reader(json.as_bytes())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())
            .map_err(|e| LtrError::Config(format!("cannot open {}: {}", path.as_ref().display(), e)))?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_iterations == 0 {
            return Err(LtrError::Config("numIterations must be positive".to_string()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(LtrError::Config(format!("learningRate must be positive, got {}", self.learning_rate)));
        }
        if !(self.regularization_rate.is_finite() && self.regularization_rate >= 0.0) {
            return Err(LtrError::Config(format!(
                "regularizationRate must be non-negative, got {}", self.regularization_rate
            )));
        }
        if let Some(i) = self.layers.layers().iter().position(|l| l.size == 0) {
            return Err(LtrError::Config(format!("hidden layer {} has no nodes", i)));
        }
        if self.ndcg_k == Some(0) {
            return Err(LtrError::Config("ndcgK must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Cutoff for validation NDCG
    pub fn ndcg_k(&self) -> usize {
        self.ndcg_k.unwrap_or(DEFAULT_NDCG_K)
    }

    /// Where the trained model is written
    pub fn model_file(&self) -> PathBuf {
        match &self.model_file {
            Some(path) if !path.as_os_str().is_empty() => path.clone(),
            _ => PathBuf::from(DEFAULT_MODEL_FILE),
        }
    }
}
