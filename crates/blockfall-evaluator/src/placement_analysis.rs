//! Result of dropping a shape at one candidate placement.
//!
//! A [`PlacementAnalysis`] combines how many lines the drop cleared with a lazily evaluated
//! [`BoardAnalysis`] of the resulting board, which is what placement evaluators score.

use blockfall_engine::{Board, Placement, Shape};

use crate::board_analysis::BoardAnalysis;

#[derive(Debug)]
pub struct PlacementAnalysis {
    placement: Placement,
    cleared_lines: usize,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    /// Drops `rotated` (the shape already turned `placement.rotation` times) at
    /// `placement.column`.
    ///
    /// Returns `None` when the drop is illegal.
    #[must_use]
    pub fn simulate(board: &Board, rotated: &Shape, placement: Placement) -> Option<Self> {
        let outcome = board.simulate_drop(rotated, placement.column)?;
        let cleared_lines = outcome.cleared_lines();
        Some(Self {
            placement,
            cleared_lines,
            board_analysis: BoardAnalysis::new(outcome.into_board()),
        })
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }
}
