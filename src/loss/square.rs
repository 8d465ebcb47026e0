use super::ErrorFunction;

/// Squared error, `0.5 * (output - target)^2`
#[derive(Copy, Clone, Debug, Default)]
pub struct Square;

impl ErrorFunction for Square {
    fn error(&self, output: f64, target: f64) -> f64 {
        let diff = output - target;
        0.5 * diff * diff
    }

    fn derivative(&self, output: f64, target: f64) -> f64 {
        output - target
    }
}
