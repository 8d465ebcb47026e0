use crate::Activation;
use crate::optimizer::Optimizer;

/// Position of a node: layer index (0 = input) and index within the layer
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub layer: usize,
    pub index: usize,
}

impl NodeId {
    pub fn new(layer: usize, index: usize) -> Self {
        NodeId { layer, index }
    }
}

/// Index of an edge in the network's edge arena
pub type EdgeId = usize;

/// A computation unit. The scalar fields are refreshed on every
/// forward/backward pass.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) activation: Activation,
    pub(crate) total_input: f64,
    pub(crate) output: f64,
    pub(crate) output_der: f64,
    pub(crate) input_der: f64,
    /// Incoming edges; the first one of a non-input node is the bias edge
    pub(crate) input_edges: Vec<EdgeId>,
    pub(crate) output_edges: Vec<EdgeId>,
}

impl Node {
    pub(crate) fn new(activation: Activation) -> Self {
        Node {
            activation,
            total_input: 0.0,
            output: 0.0,
            output_der: 0.0,
            input_der: 0.0,
            input_edges: Vec::new(),
            output_edges: Vec::new(),
        }
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn total_input(&self) -> f64 {
        self.total_input
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    /// ∂C/∂O from the last backward pass
    pub fn output_der(&self) -> f64 {
        self.output_der
    }

    /// ∂C/∂I from the last backward pass
    pub fn input_der(&self) -> f64 {
        self.input_der
    }

    pub fn input_edges(&self) -> &[EdgeId] {
        &self.input_edges
    }

    pub fn output_edges(&self) -> &[EdgeId] {
        &self.output_edges
    }
}

/// Weighted connection between adjacent layers
#[derive(Clone, Debug)]
pub struct Edge {
    /// `None` for a bias edge, whose source output is the constant 1
    pub(crate) source: Option<NodeId>,
    pub(crate) destination: NodeId,
    pub(crate) weight: f64,
    pub(crate) acc_error_der: f64,
    pub(crate) dead: bool,
    pub(crate) optimizer: Box<dyn Optimizer>,
}

impl Edge {
    pub(crate) fn new(source: Option<NodeId>, destination: NodeId, weight: f64, optimizer: Box<dyn Optimizer>) -> Self {
        Edge {
            source,
            destination,
            weight,
            acc_error_der: 0.0,
            dead: false,
            optimizer,
        }
    }

    pub fn source(&self) -> Option<NodeId> {
        self.source
    }

    pub fn destination(&self) -> NodeId {
        self.destination
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Sum of ∂C/∂w over the samples accumulated since the last update
    pub fn accumulated_error_der(&self) -> f64 {
        self.acc_error_der
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_bias(&self) -> bool {
        self.source.is_none()
    }
}
