use super::Optimizer;

const MOMENTUM: f64 = 0.9;

/// Basic Stochastic Gradient Descent
#[derive(Clone, Debug, Default)]
pub struct SGD;

impl Optimizer for SGD {
    fn optimize(&mut self, error_der: f64, learning_rate: f64, _iteration: usize) -> f64 {
        -learning_rate * error_der
    }

    fn box_clone(&self) -> Box<dyn Optimizer> {
        Box::new(self.clone())
    }
}

/// SGD with classical momentum
#[derive(Clone, Debug)]
pub struct Momentum {
    mu: f64,
    velocity: f64,
}

impl Momentum {
    pub fn new(mu: f64) -> Self {
        Momentum { mu, velocity: 0.0 }
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Self::new(MOMENTUM)
    }
}

impl Optimizer for Momentum {
    fn optimize(&mut self, error_der: f64, learning_rate: f64, _iteration: usize) -> f64 {
        self.velocity = self.mu * self.velocity - learning_rate * error_der;
        self.velocity
    }

    fn box_clone(&self) -> Box<dyn Optimizer> {
        Box::new(self.clone())
    }
}

/// Nesterov accelerated gradient
#[derive(Clone, Debug)]
pub struct Nesterov {
    mu: f64,
    velocity: f64,
}

impl Nesterov {
    pub fn new(mu: f64) -> Self {
        Nesterov { mu, velocity: 0.0 }
    }
}

impl Default for Nesterov {
    fn default() -> Self {
        Self::new(MOMENTUM)
    }
}

impl Optimizer for Nesterov {
    fn optimize(&mut self, error_der: f64, learning_rate: f64, _iteration: usize) -> f64 {
        let previous = self.velocity;
        self.velocity = self.mu * self.velocity - learning_rate * error_der;
        -self.mu * previous + (1.0 + self.mu) * self.velocity
    }

    fn box_clone(&self) -> Box<dyn Optimizer> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sgd_step() {
        let mut sgd = SGD;
        assert!((sgd.optimize(2.0, 0.1, 0) + 0.2).abs() < 1e-12);
        assert!((sgd.optimize(-1.0, 0.5, 7) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_momentum_accumulates() {
        let mut momentum = Momentum::new(0.5);
        let first = momentum.optimize(1.0, 0.1, 0);
        let second = momentum.optimize(1.0, 0.1, 1);
        assert!((first + 0.1).abs() < 1e-12);
        // v = 0.5 * -0.1 - 0.1
        assert!((second + 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_nesterov_first_step() {
        let mut nesterov = Nesterov::new(0.5);
        // previous velocity is 0, so delta = 1.5 * -0.1
        assert!((nesterov.optimize(1.0, 0.1, 0) + 0.15).abs() < 1e-12);
    }
}
