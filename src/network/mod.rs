//! Layered feed-forward network with per-edge optimizers
//!
//! Nodes live in `layers[layer][index]` and edges in a flat arena. Nodes
//! refer to their edges by [`EdgeId`] and edges refer to their endpoints by
//! [`NodeId`], so traversal is O(1) in both directions without ownership
//! cycles.
//!
//! Every node caches the scalars of the last forward/backward pass, so a
//! `Network` is not reentrant: forward, backprop and update calls must not
//! interleave across threads.

mod node;
mod shape;

pub use node::{Edge, EdgeId, Node, NodeId};
pub use shape::{BIAS_INIT, LayerSpec, NetworkShape, WeightInit};

use crate::error::{LtrError, Result};
use crate::loss::ErrorFunction;
use crate::optimizer::OptimizerKind;
use crate::{Activation, Regularization};
use rand::Rng;

/// A feed-forward neural network
#[derive(Clone, Debug)]
pub struct Network {
    pub(crate) layers: Vec<Vec<Node>>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) optimizer: OptimizerKind,
    pub(crate) regularization: Option<Regularization>,
    /// Samples backpropagated since the last weight update
    num_accumulated: usize,
    /// Weight updates applied so far
    iteration: usize,
}

impl Network {
    /// Create a new network with weights drawn from the thread RNG
    pub fn new(
        input_dim: usize,
        shape: &NetworkShape,
        optimizer: OptimizerKind,
        regularization: Option<Regularization>,
        init: WeightInit,
    ) -> Self {
        Self::with_rng(input_dim, shape, optimizer, regularization, init, &mut rand::rng())
    }

    /// Create a new network drawing initial weights from `rng`
    pub fn with_rng<R: Rng + ?Sized>(
        input_dim: usize,
        shape: &NetworkShape,
        optimizer: OptimizerKind,
        regularization: Option<Regularization>,
        init: WeightInit,
        rng: &mut R,
    ) -> Self {
        let mut network = Network {
            layers: vec![(0..input_dim).map(|_| Node::new(Activation::Identity)).collect()],
            edges: Vec::new(),
            optimizer,
            regularization,
            num_accumulated: 0,
            iteration: 0,
        };

        for spec in shape.layers() {
            let fan_in = network.layers[network.layers.len() - 1].len();
            network.add_layer(*spec, |_| init.sample(fan_in, &mut *rng));
        }

        network
    }

    /// Append a fully connected layer. `weight` is asked for every non-bias
    /// edge with the index of its source node.
    pub(crate) fn add_layer(&mut self, spec: LayerSpec, mut weight: impl FnMut(usize) -> f64) {
        let layer = self.layers.len();
        let previous = layer - 1;
        let mut nodes = Vec::with_capacity(spec.size);

        for index in 0..spec.size {
            let destination = NodeId::new(layer, index);
            let mut node = Node::new(spec.activation);

            let bias = self.edges.len();
            self.edges.push(Edge::new(None, destination, BIAS_INIT, self.optimizer.build()));
            node.input_edges.push(bias);

            for source_index in 0..self.layers[previous].len() {
                let id = self.edges.len();
                let source = NodeId::new(previous, source_index);
                self.edges.push(Edge::new(Some(source), destination, weight(source_index), self.optimizer.build()));
                node.input_edges.push(id);
                self.layers[previous][source_index].output_edges.push(id);
            }

            nodes.push(node);
        }

        self.layers.push(nodes);
    }

    /// Number of input features
    pub fn input_dim(&self) -> usize {
        self.layers[0].len()
    }

    /// Number of layers, input layer included
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(Vec::len).collect()
    }

    pub fn layer(&self, layer: usize) -> &[Node] {
        &self.layers[layer]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.layers[id.layer][id.index]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    /// Overwrite the weight of an edge
    pub fn set_weight(&mut self, id: EdgeId, weight: f64) {
        self.edges[id].weight = weight;
    }

    pub fn optimizer(&self) -> OptimizerKind {
        self.optimizer
    }

    pub fn regularization(&self) -> Option<Regularization> {
        self.regularization
    }

    /// Samples accumulated since the last weight update
    pub fn num_accumulated(&self) -> usize {
        self.num_accumulated
    }

    /// Number of `update_weights` calls so far
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Outputs of the last layer from the most recent forward pass
    pub fn outputs(&self) -> Vec<f64> {
        self.layers[self.layers.len() - 1].iter().map(|node| node.output).collect()
    }

    fn source_output(layers: &[Vec<Node>], edge: &Edge) -> f64 {
        match edge.source {
            Some(id) => layers[id.layer][id.index].output,
            None => 1.0,
        }
    }

    /// Forward pass through the network
    pub fn forward(&mut self, features: &[f64]) -> Result<Vec<f64>> {
        let expected = self.input_dim();
        if features.len() != expected {
            return Err(LtrError::DimensionMismatch { expected, actual: features.len() });
        }

        for (node, &x) in self.layers[0].iter_mut().zip(features) {
            node.total_input = x;
            node.output = x;
        }

        let Network { layers, edges, .. } = self;
        for layer in 1..layers.len() {
            for index in 0..layers[layer].len() {
                let view: &[Vec<Node>] = layers;
                let total: f64 = view[layer][index].input_edges.iter()
                    .map(|&e| &edges[e])
                    .filter(|edge| !edge.dead)
                    .map(|edge| edge.weight * Self::source_output(view, edge))
                    .sum();

                let node = &mut layers[layer][index];
                node.total_input = total;
                node.output = node.activation.apply(total);
            }
        }

        Ok(self.outputs())
    }

    /// Backpropagate the error of the first output node against `target`.
    ///
    /// Gradients are accumulated on the edges; nothing is applied until
    /// [`update_weights`](Self::update_weights).
    pub fn back_prop(&mut self, target: f64, error: &dyn ErrorFunction) {
        let last = self.layers.len() - 1;
        let output_node = &mut self.layers[last][0];
        output_node.output_der = error.derivative(output_node.output, target);
        self.propagate();
    }

    /// Backpropagate with one target per output node.
    ///
    /// Every output derivative is seeded before the downward sweep starts.
    pub fn back_prop_multi(&mut self, targets: &[f64], error: &dyn ErrorFunction) -> Result<()> {
        let last = self.layers.len() - 1;
        let outputs = &mut self.layers[last];
        if targets.len() != outputs.len() {
            return Err(LtrError::DimensionMismatch { expected: outputs.len(), actual: targets.len() });
        }

        for (node, &target) in outputs.iter_mut().zip(targets) {
            node.output_der = error.derivative(node.output, target);
        }
        self.propagate();
        Ok(())
    }

    /// Downward sweep from seeded output derivatives
    fn propagate(&mut self) {
        let Network { layers, edges, .. } = self;

        for layer in (1..layers.len()).rev() {
            for index in 0..layers[layer].len() {
                let input_der = {
                    let node = &mut layers[layer][index];
                    // ∂C/∂I = (∂C/∂O)(∂O/∂I)
                    node.input_der = node.activation.derivative(node.total_input) * node.output_der;
                    node.input_der
                };

                for &e in &layers[layer][index].input_edges {
                    let edge = &mut edges[e];
                    if edge.dead {
                        continue;
                    }
                    // ∂C/∂w = (∂C/∂I) * source output
                    edge.acc_error_der += input_der * Self::source_output(layers, edge);
                }
            }

            if layer > 1 {
                for index in 0..layers[layer - 1].len() {
                    let output_der: f64 = layers[layer - 1][index].output_edges.iter()
                        .map(|&e| {
                            let edge = &edges[e];
                            edge.weight * layers[layer][edge.destination.index].input_der
                        })
                        .sum();
                    layers[layer - 1][index].output_der = output_der;
                }
            }
        }

        self.num_accumulated += 1;
    }

    /// Apply the accumulated gradients, averaged over the accumulated samples,
    /// then the regularization penalty on every live edge.
    ///
    /// Under L1 a non-bias weight whose penalty step would cross zero is set
    /// to 0 and the edge is dead from then on. Bias edges are never pruned.
    pub fn update_weights(&mut self, learning_rate: f64, regularization_rate: f64) {
        if self.num_accumulated > 0 {
            let samples = self.num_accumulated as f64;
            let iteration = self.iteration;
            let regularization = self.regularization;

            for edge in self.edges.iter_mut().filter(|edge| !edge.dead) {
                // penalty is taken at the weight before this update
                let penalty = regularization.map_or(0.0, |reg| reg.derivative(edge.weight));

                let delta = edge.optimizer.optimize(edge.acc_error_der, learning_rate, iteration);
                let weight = edge.weight + delta / samples;
                let new_weight = weight - penalty * learning_rate * regularization_rate;

                let prunes = regularization.is_some_and(|reg| reg.prunes());
                if prunes && !edge.is_bias() && weight * new_weight < 0.0 {
                    edge.weight = 0.0;
                    edge.dead = true;
                } else {
                    edge.weight = new_weight;
                }

                edge.acc_error_der = 0.0;
            }
        }

        self.num_accumulated = 0;
        self.iteration += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::Square;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn small_network(outputs: usize, regularization: Option<Regularization>) -> Network {
        let shape = NetworkShape::default()
            .with_layer(3, Activation::Sigmoid)
            .with_layer(outputs, Activation::Sigmoid);
        let mut rng = StdRng::seed_from_u64(42);
        Network::with_rng(2, &shape, OptimizerKind::SGD, regularization, WeightInit::Uniform, &mut rng)
    }

    fn accumulators(network: &Network) -> Vec<f64> {
        network.edges().iter().map(Edge::accumulated_error_der).collect()
    }

    #[test]
    fn test_network_creation() {
        let network = small_network(2, None);
        assert_eq!(network.layer_sizes(), vec![2, 3, 2]);
        assert_eq!(network.input_dim(), 2);

        for layer in 1..network.num_layers() {
            for node in network.layer(layer) {
                assert_eq!(node.input_edges().len(), network.layer(layer - 1).len() + 1);
                let bias = network.edge(node.input_edges()[0]);
                assert!(bias.is_bias());
                assert_eq!(bias.weight(), BIAS_INIT);
            }
        }
        assert!(network.layer(0).iter().all(|node| node.input_edges().is_empty()));
    }

    #[test]
    fn test_forward_dimension_mismatch() {
        let mut network = small_network(1, None);
        let err = network.forward(&[0.1, 0.2, 0.3]).unwrap_err();
        assert!(matches!(err, LtrError::DimensionMismatch { expected: 2, actual: 3 }));
    }

    #[test]
    fn test_forward_known_weights() {
        let shape = NetworkShape::default().with_layer(1, Activation::Identity);
        let mut network = Network::new(2, &shape, OptimizerKind::SGD, None, WeightInit::Zero);
        let node = network.layer(1)[0].input_edges().to_vec();
        network.set_weight(node[0], 0.5);
        network.set_weight(node[1], 2.0);
        network.set_weight(node[2], -1.0);

        let output = network.forward(&[3.0, 4.0]).unwrap();
        assert_eq!(output, vec![0.5 + 6.0 - 4.0]);
    }

    #[test]
    fn test_forward_is_deterministic() {
        let mut network = small_network(2, None);
        let first = network.forward(&[0.3, -0.7]).unwrap();
        network.forward(&[1.0, 1.0]).unwrap();
        let second = network.forward(&[0.3, -0.7]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        let shape = NetworkShape::default()
            .with_layer(3, Activation::Tanh)
            .with_layer(1, Activation::Sigmoid);
        let mut rng = StdRng::seed_from_u64(3);
        let mut network = Network::with_rng(2, &shape, OptimizerKind::SGD, None, WeightInit::Uniform, &mut rng);
        let input = [0.4, -0.9];
        let target = 1.0;

        network.forward(&input).unwrap();
        network.back_prop(target, &Square);
        let analytic = accumulators(&network);

        let h = 1e-6;
        for id in 0..network.edges().len() {
            let mut plus = network.clone();
            let w = plus.edge(id).weight();
            plus.set_weight(id, w + h);
            let up = Square.error(plus.forward(&input).unwrap()[0], target);
            plus.set_weight(id, w - h);
            let down = Square.error(plus.forward(&input).unwrap()[0], target);

            let numeric = (up - down) / (2.0 * h);
            assert!((numeric - analytic[id]).abs() < 1e-6, "edge {}: {} vs {}", id, numeric, analytic[id]);
        }
    }

    #[test]
    fn test_gradients_accumulate_across_samples() {
        let samples = [([0.1, 0.9], 1.0), ([0.5, -0.2], 0.0), ([-0.3, 0.3], 1.0)];
        let mut network = small_network(1, None);

        let mut expected = vec![0.0; network.edges().len()];
        for (input, target) in &samples {
            let mut single = network.clone();
            single.forward(input).unwrap();
            single.back_prop(*target, &Square);
            for (sum, acc) in expected.iter_mut().zip(accumulators(&single)) {
                *sum += acc;
            }
        }

        for (input, target) in &samples {
            network.forward(input).unwrap();
            network.back_prop(*target, &Square);
        }
        assert_eq!(network.num_accumulated(), 3);
        for (acc, sum) in accumulators(&network).iter().zip(&expected) {
            assert!((acc - sum).abs() < 1e-12);
        }

        network.update_weights(0.1, 0.0);
        assert_eq!(network.num_accumulated(), 0);
        assert!(accumulators(&network).iter().all(|&acc| acc == 0.0));
    }

    #[test]
    fn test_update_averages_over_samples() {
        let mut network = small_network(1, None);
        let before: Vec<f64> = network.edges().iter().map(Edge::weight).collect();

        network.forward(&[0.2, 0.4]).unwrap();
        network.back_prop(1.0, &Square);
        network.forward(&[0.2, 0.4]).unwrap();
        network.back_prop(1.0, &Square);
        let acc = accumulators(&network);

        network.update_weights(0.5, 0.0);
        for (id, edge) in network.edges().iter().enumerate() {
            // SGD delta is -lr * acc, divided by the two samples
            let expected = before[id] - 0.5 * acc[id] / 2.0;
            assert!((edge.weight() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_iteration_advances_without_samples() {
        let mut network = small_network(1, None);
        let before: Vec<f64> = network.edges().iter().map(Edge::weight).collect();

        network.update_weights(0.1, 0.1);
        network.update_weights(0.1, 0.1);

        assert_eq!(network.iteration(), 2);
        let after: Vec<f64> = network.edges().iter().map(Edge::weight).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_l2_shrinks_weights() {
        let shape = NetworkShape::default().with_layer(1, Activation::Identity);
        let mut network = Network::new(1, &shape, OptimizerKind::SGD, Some(Regularization::L2), WeightInit::Zero);
        network.set_weight(1, 1.0);
        network.forward(&[0.0]).unwrap();
        network.back_prop(network.outputs()[0], &Square); // zero error

        network.update_weights(0.1, 0.5);
        assert!((network.edge(1).weight() - (1.0 - 0.05)).abs() < 1e-12);
        // bias shrinks too
        assert!((network.edge(0).weight() - BIAS_INIT * (1.0 - 0.05)).abs() < 1e-12);
    }

    #[test]
    fn test_l2_penalty_uses_weight_before_step() {
        let shape = NetworkShape::default().with_layer(1, Activation::Identity);
        let mut network = Network::new(1, &shape, OptimizerKind::SGD, Some(Regularization::L2), WeightInit::Zero);
        network.set_weight(0, 0.0);
        network.set_weight(1, 1.0);

        // output 1 against target 0 gives a unit gradient on both edges
        network.forward(&[1.0]).unwrap();
        network.back_prop(0.0, &Square);
        network.update_weights(0.1, 0.5);

        // 1.0 - 0.1 (step) - 0.05 * 1.0 (penalty at the old weight)
        assert!((network.edge(1).weight() - 0.85).abs() < 1e-12);
        assert!((network.edge(0).weight() + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_l1_prunes_edge_crossing_zero() {
        let shape = NetworkShape::default().with_layer(1, Activation::Identity);
        let mut network = Network::new(2, &shape, OptimizerKind::SGD, Some(Regularization::L1), WeightInit::Zero);
        network.set_weight(1, 0.01);
        network.set_weight(2, 5.0);

        // zero input on the first feature keeps its gradient at 0
        network.forward(&[0.0, 1.0]).unwrap();
        network.back_prop(network.outputs()[0], &Square);
        network.update_weights(0.1, 1.0);

        let pruned = network.edge(1);
        assert!(pruned.is_dead());
        assert_eq!(pruned.weight(), 0.0);
        assert!(!network.edge(2).is_dead());
        // the bias is penalized across zero but stays alive
        assert!(!network.edge(0).is_dead());
        assert!((network.edge(0).weight() - (BIAS_INIT - 0.1)).abs() < 1e-12);

        // dead edges ignore any stored weight and never accumulate again
        network.set_weight(1, 100.0);
        let output = network.forward(&[1.0, 0.0]).unwrap()[0];
        assert!((output - network.edge(0).weight()).abs() < 1e-12);
        network.back_prop(10.0, &Square);
        assert_eq!(network.edge(1).accumulated_error_der(), 0.0);
        network.update_weights(0.1, 1.0);
        assert_eq!(network.edge(1).weight(), 100.0);
        assert!(network.edge(1).is_dead());
    }

    #[test]
    fn test_multi_output_matches_manual_seeding() {
        let targets = [1.0, 0.0];
        let input = [0.25, -0.5];

        let mut multi = small_network(2, None);
        let mut manual = multi.clone();

        multi.forward(&input).unwrap();
        multi.back_prop_multi(&targets, &Square).unwrap();

        manual.forward(&input).unwrap();
        let last = manual.num_layers() - 1;
        let second = &mut manual.layers[last][1];
        second.output_der = Square.derivative(second.output, targets[1]);
        manual.back_prop(targets[0], &Square);

        assert_eq!(accumulators(&multi), accumulators(&manual));
        assert_eq!(multi.num_accumulated(), 1);
    }

    #[test]
    fn test_multi_output_target_length_checked() {
        let mut network = small_network(2, None);
        network.forward(&[0.0, 0.0]).unwrap();
        assert!(network.back_prop_multi(&[1.0], &Square).is_err());
        assert_eq!(network.num_accumulated(), 0);
    }
}
