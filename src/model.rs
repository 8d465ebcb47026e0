//! Serialized snapshot of a trained network
//!
//! Weights are keyed by position: `weights[layer - 1][node][edge]`, where
//! edge 0 is the bias edge and edge `k` comes from node `k - 1` of the
//! previous layer. Optimizer state and gradient accumulators are not kept,
//! a restored network is meant for inference.

use crate::error::{LtrError, Result};
use crate::network::{Edge, LayerSpec, Network, NetworkShape};
use crate::optimizer::OptimizerKind;
use crate::{Activation, Regularization, WeightInit};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Topology and weights of a network
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Name of the algorithm that produced the model
    pub algorithm: String,
    pub input_dim: usize,
    /// Non-input layers, output layer last
    pub layers: Vec<LayerSpec>,
    pub weights: Vec<Vec<Vec<f64>>>,
    /// Pruned edges, same shape as `weights`
    pub dead: Vec<Vec<Vec<bool>>>,
}

impl Model {
    /// Write the model as JSON, creating parent directories as needed.
    /// The file is flushed and closed before returning.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        log::debug!("model written to {}", path.display());
        Ok(())
    }

    /// Read a model written by [`Model::write`]
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Network {
    /// Snapshot topology and weights
    pub fn to_model(&self, algorithm: &str) -> Model {
        let layers = self.layers[1..].iter()
            .map(|nodes| LayerSpec::new(nodes.len(), nodes.first().map_or(Activation::Identity, |n| n.activation)))
            .collect();

        let weights = self.per_edge(|edge| edge.weight);
        let dead = self.per_edge(|edge| edge.dead);

        Model {
            algorithm: algorithm.to_string(),
            input_dim: self.input_dim(),
            layers,
            weights,
            dead,
        }
    }

    fn per_edge<T>(&self, f: impl Fn(&Edge) -> T) -> Vec<Vec<Vec<T>>> {
        self.layers[1..].iter()
            .map(|nodes| nodes.iter()
                .map(|node| node.input_edges.iter().map(|&e| f(&self.edges[e])).collect())
                .collect())
            .collect()
    }

    /// Rebuild a network from a snapshot. Optimizers start fresh.
    pub fn from_model(
        model: &Model,
        optimizer: OptimizerKind,
        regularization: Option<Regularization>,
    ) -> Result<Self> {
        if model.weights.len() != model.layers.len() || model.dead.len() != model.layers.len() {
            return Err(LtrError::Config("model weights do not match its layers".to_string()));
        }

        let shape = NetworkShape::new(model.layers.clone());
        let mut network = Network::new(model.input_dim, &shape, optimizer, regularization, WeightInit::Zero);

        for (layer, (weights, dead)) in model.weights.iter().zip(&model.dead).enumerate() {
            let nodes = &network.layers[layer + 1];
            if weights.len() != nodes.len() || dead.len() != nodes.len() {
                return Err(LtrError::Config(format!("layer {} has the wrong number of nodes", layer + 1)));
            }

            let mut assignments = Vec::new();
            for (node, (w, d)) in nodes.iter().zip(weights.iter().zip(dead)) {
                if w.len() != node.input_edges.len() || d.len() != node.input_edges.len() {
                    return Err(LtrError::DimensionMismatch { expected: node.input_edges.len(), actual: w.len() });
                }
                assignments.extend(node.input_edges.iter().zip(w.iter().zip(d)).map(|(&e, (&w, &d))| (e, w, d)));
            }

            for (e, weight, is_dead) in assignments {
                network.edges[e].weight = weight;
                network.edges[e].dead = is_dead;
            }
        }

        Ok(network)
    }
}
