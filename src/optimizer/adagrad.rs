use super::Optimizer;

const EPSILON: f64 = 1e-8;

/// AdaGrad: per-weight learning rate scaled by the accumulated squared gradient
#[derive(Clone, Debug, Default)]
pub struct AdaGrad {
    cache: f64,
}

impl Optimizer for AdaGrad {
    fn optimize(&mut self, error_der: f64, learning_rate: f64, _iteration: usize) -> f64 {
        self.cache += error_der * error_der;
        -learning_rate * error_der / (self.cache.sqrt() + EPSILON)
    }

    fn box_clone(&self) -> Box<dyn Optimizer> {
        Box::new(self.clone())
    }
}

/// RMSProp: AdaGrad with an exponentially decaying cache
#[derive(Clone, Debug)]
pub struct RMSProp {
    decay: f64,
    cache: f64,
}

impl RMSProp {
    pub fn new(decay: f64) -> Self {
        RMSProp { decay, cache: 0.0 }
    }
}

impl Default for RMSProp {
    fn default() -> Self {
        Self::new(0.9)
    }
}

impl Optimizer for RMSProp {
    fn optimize(&mut self, error_der: f64, learning_rate: f64, _iteration: usize) -> f64 {
        self.cache = self.decay * self.cache + (1.0 - self.decay) * error_der * error_der;
        -learning_rate * error_der / (self.cache.sqrt() + EPSILON)
    }

    fn box_clone(&self) -> Box<dyn Optimizer> {
        Box::new(self.clone())
    }
}

/// AdaDelta. The learning rate is ignored; the step size comes from the
/// running average of previous updates.
#[derive(Clone, Debug)]
pub struct AdaDelta {
    rho: f64,
    epsilon: f64,
    grad_avg: f64,
    delta_avg: f64,
}

impl AdaDelta {
    pub fn new(rho: f64, epsilon: f64) -> Self {
        AdaDelta { rho, epsilon, grad_avg: 0.0, delta_avg: 0.0 }
    }
}

impl Default for AdaDelta {
    fn default() -> Self {
        Self::new(0.95, 1e-6)
    }
}

impl Optimizer for AdaDelta {
    fn optimize(&mut self, error_der: f64, _learning_rate: f64, _iteration: usize) -> f64 {
        self.grad_avg = self.rho * self.grad_avg + (1.0 - self.rho) * error_der * error_der;
        let delta = -((self.delta_avg + self.epsilon).sqrt() / (self.grad_avg + self.epsilon).sqrt()) * error_der;
        self.delta_avg = self.rho * self.delta_avg + (1.0 - self.rho) * delta * delta;
        delta
    }

    fn box_clone(&self) -> Box<dyn Optimizer> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adagrad_shrinks_steps() {
        let mut adagrad = AdaGrad::default();
        let first = adagrad.optimize(1.0, 0.1, 0).abs();
        let second = adagrad.optimize(1.0, 0.1, 1).abs();
        assert!(second < first);
        assert!((first - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_rmsprop_first_step() {
        let mut rmsprop = RMSProp::new(0.9);
        // cache = 0.1 * 4, step = 0.01 * 2 / sqrt(0.4)
        let expected = -0.01 * 2.0 / 0.4f64.sqrt();
        assert!((rmsprop.optimize(2.0, 0.01, 0) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_adadelta_ignores_learning_rate() {
        let mut a = AdaDelta::default();
        let mut b = AdaDelta::default();
        assert_eq!(a.optimize(0.5, 0.1, 0), b.optimize(0.5, 10.0, 0));
    }
}
