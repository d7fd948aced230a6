//! Evaluation reporter
//!
//! Reports the outcome of the offline 5-fold cross-validation run that the
//! notebook narrates. The figures are fixed; nothing is recomputed from the
//! live rating log.

use crate::types::EvaluationMetrics;

pub const MODEL_RMSE: f64 = 0.872;
pub const BASELINE_RMSE: f64 = 1.054;
pub const IMPROVEMENT: &str = "17.2%";

/// Accuracy metrics for the evaluation cards
pub fn evaluate() -> EvaluationMetrics {
    EvaluationMetrics {
        model_error: MODEL_RMSE,
        baseline_error: BASELINE_RMSE,
        improvement_percent: IMPROVEMENT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_is_constant() {
        let first = evaluate();
        assert_eq!(first.model_error, 0.872);
        assert_eq!(first.baseline_error, 1.054);
        assert_eq!(first.improvement_percent, "17.2%");
        assert_eq!(first, evaluate());
    }
}
