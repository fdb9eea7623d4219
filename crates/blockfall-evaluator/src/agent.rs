use blockfall_engine::{Board, Placement, Shape};

use crate::{
    move_search::select_best_placement, placement_analysis::PlacementAnalysis,
    placement_evaluator::PlacementEvaluator, weights::Weights,
};

/// Scripted player that places each shape with the best-scoring legal move.
///
/// The agent owns its [`Weights`]; [`Agent::set_weights`] is the only way to change them.
/// Loading and saving are left to [`WeightStore`](crate::weight_store::WeightStore).
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, ShapeKind};
/// use blockfall_evaluator::{agent::Agent, weights::Weights};
///
/// let agent = Agent::new(Weights::DEFAULT);
/// let placement = agent
///     .choose_best_move(&Board::standard(), &ShapeKind::T.shape())
///     .expect("an empty board always has room");
/// assert!(placement.rotation < 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Agent {
    weights: Weights,
}

impl Agent {
    #[must_use]
    pub const fn new(weights: Weights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub const fn weights(&self) -> Weights {
        self.weights
    }

    pub const fn set_weights(&mut self, weights: Weights) {
        self.weights = weights;
    }

    /// Returns the best `(rotation, column)` for `shape`, or `None` when no legal move exists.
    #[must_use]
    pub fn choose_best_move(&self, board: &Board, shape: &Shape) -> Option<Placement> {
        select_best_placement(self, board, shape).map(|(placement, _analysis)| placement)
    }
}

impl PlacementEvaluator for Agent {
    #[inline]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32 {
        self.weights.evaluate_placement(analysis)
    }
}
