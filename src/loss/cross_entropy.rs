use super::ErrorFunction;

const CLAMP: f64 = 1e-7;

/// Binary cross entropy for outputs in (0, 1)
#[derive(Copy, Clone, Debug, Default)]
pub struct CrossEntropy;

impl ErrorFunction for CrossEntropy {
    /// `-t*log(p) - (1-t)*log(1-p)`
    fn error(&self, output: f64, target: f64) -> f64 {
        let p = output.clamp(CLAMP, 1.0 - CLAMP); // Avoid log(0)
        -target * p.ln() - (1.0 - target) * (1.0 - p).ln()
    }

    /// `-t/p + (1-t)/(1-p)`
    fn derivative(&self, output: f64, target: f64) -> f64 {
        let p = output.clamp(CLAMP, 1.0 - CLAMP);
        -target / p + (1.0 - target) / (1.0 - p)
    }
}
