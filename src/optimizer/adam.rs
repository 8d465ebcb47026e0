use super::Optimizer;

/// Adam optimizer
///
/// Bias correction uses the network's update counter, so the timestep is
/// `iteration + 1` rather than a private count of calls.
#[derive(Clone, Debug)]
pub struct Adam {
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    m: f64, // First moment
    v: f64, // Second moment
}

impl Adam {
    /// Create a new Adam optimizer with the specified parameters
    pub fn new(beta1: f64, beta2: f64, epsilon: f64) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            m: 0.0,
            v: 0.0,
        }
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.9, 0.999, 1e-8)
    }
}

impl Optimizer for Adam {
    fn optimize(&mut self, error_der: f64, learning_rate: f64, iteration: usize) -> f64 {
        let t = (iteration + 1) as i32;

        self.m = self.beta1 * self.m + (1.0 - self.beta1) * error_der;
        self.v = self.beta2 * self.v + (1.0 - self.beta2) * error_der * error_der;

        let m_hat = self.m / (1.0 - self.beta1.powi(t));
        let v_hat = self.v / (1.0 - self.beta2.powi(t));

        -learning_rate * m_hat / (v_hat.sqrt() + self.epsilon)
    }

    fn box_clone(&self) -> Box<dyn Optimizer> {
        Box::new(self.clone())
    }
}
