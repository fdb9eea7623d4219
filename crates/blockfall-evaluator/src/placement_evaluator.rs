//! Scoring of individual placements.
//!
//! [`PlacementEvaluator`] is the seam between the move search and the scoring function. The
//! linear [`Weights`] evaluation implements it directly; anything else that can rank a
//! [`PlacementAnalysis`] (for example a test double) can be plugged into
//! [`select_best_placement`](crate::move_search::select_best_placement) the same way.

use std::fmt;

use crate::{placement_analysis::PlacementAnalysis, weights::Weights};

/// Evaluates placements by assigning scores.
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    /// Evaluates a placement and returns a score (higher is better).
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32;
}

impl PlacementEvaluator for Weights {
    #[inline]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32 {
        self.evaluate_board(analysis.board_analysis(), analysis.cleared_lines())
    }
}

impl<E> PlacementEvaluator for &E
where
    E: PlacementEvaluator + ?Sized,
{
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32 {
        (**self).evaluate_placement(analysis)
    }
}
