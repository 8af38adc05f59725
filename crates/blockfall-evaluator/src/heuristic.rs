//! Linear heuristic scoring of board states.

use std::{fmt, iter};

use blockfall_engine::Board;
use serde::{Deserialize, Serialize};

use crate::{
    board_analysis::BoardAnalysis,
    board_feature::{BoardFeature, BoxedBoardFeature, default_board_features},
};

/// Score of a board with all features at zero.
pub const BASE_SCORE: f64 = 1000.0;

/// Hand-tuned weights for the default feature list.
pub const BASELINE_WEIGHTS: [f64; 7] = [20.0, 1.0, 1.0, 0.1, 4.0, 100.0, 1.0];

/// Scores a board state (higher is better).
pub trait BoardEvaluator: fmt::Debug + Send + Sync {
    fn evaluate(&self, board: &Board) -> f64;
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EvaluatorError {
    #[display("weight count mismatch: {features} features but {weights} weights")]
    WeightCountMismatch { features: usize, weights: usize },
}

/// Ordered coefficients, one per feature of an evaluator's feature list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    #[must_use]
    pub fn new(weights: Vec<f64>) -> Self {
        Self(weights)
    }

    /// The hand-tuned [`BASELINE_WEIGHTS`].
    #[must_use]
    pub fn baseline() -> Self {
        Self(BASELINE_WEIGHTS.to_vec())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for WeightVector {
    fn from(weights: Vec<f64>) -> Self {
        Self(weights)
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, w) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{w:.3}")?;
        }
        f.write_str("]")
    }
}

/// Weighted sum of board features.
///
/// ```text
/// score = 1000 + Σ signalᵢ · wᵢ · featureᵢ
/// ```
///
/// With the default features this is
/// `1000 − w₀·holes − w₁·filled − w₂·height − w₃·bumpiness + w₄·lines − w₅·well + w₆·tetris`.
///
/// # Example
///
/// ```
/// use blockfall_engine::Board;
/// use blockfall_evaluator::heuristic::{BoardEvaluator, HeuristicEvaluator};
///
/// let evaluator = HeuristicEvaluator::baseline();
/// let board = Board::new(10, 24).unwrap();
/// assert_eq!(evaluator.evaluate(&board), 1000.0);
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicEvaluator {
    features: Vec<BoxedBoardFeature>,
    weights: WeightVector,
}

impl HeuristicEvaluator {
    /// Creates an evaluator; `weights[i]` applies to `features[i]`.
    pub fn new(
        features: Vec<BoxedBoardFeature>,
        weights: WeightVector,
    ) -> Result<Self, EvaluatorError> {
        if features.len() != weights.len() {
            return Err(EvaluatorError::WeightCountMismatch {
                features: features.len(),
                weights: weights.len(),
            });
        }
        Ok(Self { features, weights })
    }

    /// Evaluator over the default features.
    pub fn with_default_features(weights: WeightVector) -> Result<Self, EvaluatorError> {
        Self::new(default_board_features(), weights)
    }

    /// Default features with [`BASELINE_WEIGHTS`].
    #[must_use]
    pub fn baseline() -> Self {
        Self {
            features: default_board_features(),
            weights: WeightVector::baseline(),
        }
    }

    #[must_use]
    pub fn features(&self) -> &[BoxedBoardFeature] {
        &self.features
    }

    #[must_use]
    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    #[must_use]
    pub fn evaluate_analysis(&self, analysis: &BoardAnalysis) -> f64 {
        BASE_SCORE
            + iter::zip(&self.features, self.weights.as_slice())
                .map(|(f, w)| f.signal().sign() * w * f.extract(analysis))
                .sum::<f64>()
    }
}

impl BoardEvaluator for HeuristicEvaluator {
    #[inline]
    fn evaluate(&self, board: &Board) -> f64 {
        self.evaluate_analysis(&BoardAnalysis::from_board(board))
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Direction, PieceKind};

    use super::*;
    use crate::board_feature::all_board_features;

    #[test]
    fn test_rejects_mismatched_weights() {
        let err = HeuristicEvaluator::with_default_features(WeightVector::new(vec![1.0; 6]))
            .unwrap_err();
        assert_eq!(
            err,
            EvaluatorError::WeightCountMismatch {
                features: 7,
                weights: 6
            }
        );
        assert!(HeuristicEvaluator::new(all_board_features(), vec![0.0; 9].into()).is_ok());
    }

    #[test]
    fn test_baseline_score_of_dropped_o_piece() {
        let mut board = Board::new(10, 24).unwrap();
        board.spawn_piece(PieceKind::O).unwrap();
        board.move_piece(Direction::Right);
        board.move_piece(Direction::Drop);
        // 1000 - 4 filled - 2 height - 0.1 * 4 bumpiness
        let score = HeuristicEvaluator::baseline().evaluate(&board);
        assert!((score - 993.6).abs() < 1e-9, "score = {score}");
    }

    #[test]
    fn test_evaluation_does_not_touch_board() {
        let mut board = Board::from_ascii(
            "
            ....
            #...
            ..#.
            ###.
            ",
        )
        .unwrap();
        board.spawn_piece(PieceKind::T).unwrap();
        let before = board.to_string();
        let evaluator = HeuristicEvaluator::baseline();
        let first = evaluator.evaluate(&board);
        assert_eq!(board.to_string(), before);
        assert_eq!(evaluator.evaluate(&board).to_bits(), first.to_bits());
    }

    #[test]
    fn test_weight_vector_serializes_as_array() {
        let weights = WeightVector::new(vec![1.5, -2.0]);
        assert_eq!(serde_json::to_string(&weights).unwrap(), "[1.5,-2.0]");
        assert_eq!(weights.to_string(), "[1.500, -2.000]");
    }
}
