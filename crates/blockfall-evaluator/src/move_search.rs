//! Exhaustive search for the best placement of one shape.
//!
//! The search is greedy: it looks at the current shape only, never at upcoming ones.
//!
//! # Enumeration
//!
//! For each rotation `0..=3` (repeated clockwise quarter turns of the given shape) and each
//! column `0..=board_width - rotated_width`, the shape is dropped with
//! [`Board::simulate_drop`]. Illegal drops are skipped. Every legal result is scored by a
//! [`PlacementEvaluator`].
//!
//! # Selection
//!
//! The first legal placement becomes the running best and is replaced only by a strictly
//! greater score, so ties go to the earliest placement in enumeration order (rotation
//! ascending, then column ascending).

use std::iter;

use arrayvec::ArrayVec;
use blockfall_engine::{Board, Placement, Shape};

use crate::{placement_analysis::PlacementAnalysis, placement_evaluator::PlacementEvaluator};

/// Number of distinct quarter-turn rotations tried per shape.
pub const ROTATION_COUNT: usize = 4;

/// Returns the shape rotated clockwise 0, 1, 2 and 3 times.
#[must_use]
pub fn rotations(shape: &Shape) -> ArrayVec<Shape, ROTATION_COUNT> {
    iter::successors(Some(*shape), |s| Some(s.rotated_clockwise()))
        .take(ROTATION_COUNT)
        .collect()
}

/// Enumerates every legal placement of `shape` on `board` in search order.
pub fn legal_placements<'a>(
    board: &'a Board,
    shape: &Shape,
) -> impl Iterator<Item = PlacementAnalysis> + use<'a> {
    rotations(shape)
        .into_iter()
        .enumerate()
        .flat_map(move |(rotation, rotated)| {
            let max_column = board.width().checked_sub(rotated.width());
            max_column
                .into_iter()
                .flat_map(|max| 0..=max)
                .filter_map(move |column| {
                    PlacementAnalysis::simulate(board, &rotated, Placement::new(rotation, column))
                })
        })
}

/// Selects the highest-scoring legal placement of `shape` on `board`.
///
/// Returns `None` when no rotation fits at any column.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Placement, ShapeKind};
/// use blockfall_evaluator::{move_search::select_best_placement, weights::Weights};
///
/// let board = Board::new(4, 6).unwrap();
/// let (placement, analysis) =
///     select_best_placement(&Weights::DEFAULT, &board, &ShapeKind::I.shape()).unwrap();
///
/// assert_eq!(placement, Placement::new(0, 0));
/// assert_eq!(analysis.cleared_lines(), 1);
/// ```
#[must_use]
pub fn select_best_placement<E>(
    evaluator: &E,
    board: &Board,
    shape: &Shape,
) -> Option<(Placement, PlacementAnalysis)>
where
    E: PlacementEvaluator + ?Sized,
{
    let mut best: Option<(f32, PlacementAnalysis)> = None;
    for analysis in legal_placements(board, shape) {
        let score = evaluator.evaluate_placement(&analysis);
        match &best {
            Some((best_score, _)) if score <= *best_score || score.is_nan() => {}
            _ => best = Some((score, analysis)),
        }
    }
    best.map(|(_score, analysis)| (analysis.placement(), analysis))
}
