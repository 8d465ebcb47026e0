use serde::{Deserialize, Serialize};

/// Weight penalty applied after every optimizer step
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regularization {
    /// `|w|`; weights that would cross zero are pruned
    #[serde(alias = "l1")]
    L1,
    /// `0.5 * w^2`
    #[serde(alias = "l2")]
    L2,
}

impl Regularization {
    /// Derivative of the penalty at `weight`
    pub fn derivative(self, weight: f64) -> f64 {
        match self {
            Regularization::L1 => {
                if weight > 0.0 {
                    1.0
                } else if weight < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            Regularization::L2 => weight,
        }
    }

    /// Whether a zero crossing kills the edge
    pub fn prunes(self) -> bool {
        matches!(self, Regularization::L1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivatives() {
        assert_eq!(Regularization::L1.derivative(0.3), 1.0);
        assert_eq!(Regularization::L1.derivative(-2.0), -1.0);
        assert_eq!(Regularization::L1.derivative(0.0), 0.0);
        assert_eq!(Regularization::L2.derivative(-0.25), -0.25);
    }

    #[test]
    fn test_only_l1_prunes() {
        assert!(Regularization::L1.prunes());
        assert!(!Regularization::L2.prunes());
    }
}
