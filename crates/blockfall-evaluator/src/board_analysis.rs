//! Lazily computed heuristics over a binary board snapshot.
//!
//! Each metric is computed on first access and cached, so evaluators that only need a subset
//! of the metrics don't pay for the rest.
//!
//! ```
//! use blockfall_engine::Board;
//! use blockfall_evaluator::board_analysis::BoardAnalysis;
//!
//! let board = Board::from_ascii(
//!     r"
//!     ....
//!     .#..
//!     .#.#
//!     ###.#
//!     ",
//! );
//! let analysis = BoardAnalysis::from_board(&board);
//! assert_eq!(analysis.column_heights(), &[1, 3, 0, 2]);
//! assert_eq!(analysis.aggregate_height(), 6);
//! assert_eq!(analysis.num_holes(), 0);
//! assert_eq!(analysis.bumpiness(), 2 + 3 + 2);
//! ```

use std::{cell::OnceCell, iter};

use blockfall_engine::Board;

#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    column_heights: OnceCell<Vec<usize>>,
    column_occupied_cells: OnceCell<Vec<usize>>,
    aggregate_height: OnceCell<usize>,
    num_holes: OnceCell<usize>,
    bumpiness: OnceCell<usize>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        Self::new(board.clone())
    }

    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
            aggregate_height: OnceCell::new(),
            num_holes: OnceCell::new(),
            bumpiness: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Stack height of each column: rows from the floor up to and including the topmost
    /// occupied cell, or 0 for an empty column.
    #[must_use]
    pub fn column_heights(&self) -> &[usize] {
        self.column_heights.get_or_init(|| {
            let height = self.board.height();
            (0..self.board.width())
                .map(|x| {
                    self.board
                        .rows()
                        .position(|row| row.is_cell_occupied(x))
                        .map_or(0, |min_y| height - min_y)
                })
                .collect()
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[usize] {
        self.column_occupied_cells.get_or_init(|| {
            (0..self.board.width())
                .map(|x| {
                    self.board
                        .rows()
                        .filter(|row| row.is_cell_occupied(x))
                        .count()
                })
                .collect()
        })
    }

    /// Sum of all column heights.
    #[must_use]
    pub fn aggregate_height(&self) -> usize {
        *self
            .aggregate_height
            .get_or_init(|| self.column_heights().iter().sum())
    }

    /// Empty cells lying below the topmost occupied cell of their column.
    #[must_use]
    pub fn num_holes(&self) -> usize {
        *self.num_holes.get_or_init(|| {
            // every cell within a column's height is either occupied or a hole
            iter::zip(self.column_heights(), self.column_occupied_cells())
                .map(|(h, occ)| h - occ)
                .sum()
        })
    }

    /// Sum of absolute height differences between horizontally adjacent columns.
    #[must_use]
    pub fn bumpiness(&self) -> usize {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| w[0].abs_diff(w[1]))
                .sum()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board() {
        let analysis = BoardAnalysis::from_board(&Board::standard());
        assert!(analysis.column_heights().iter().all(|h| *h == 0));
        assert_eq!(analysis.aggregate_height(), 0);
        assert_eq!(analysis.num_holes(), 0);
        assert_eq!(analysis.bumpiness(), 0);
    }

    #[test]
    fn test_column_height_counts_rows_from_floor() {
        let board = Board::from_ascii(
            r"
            #..
            ...
            ..#
            ...
            ",
        );
        let analysis = BoardAnalysis::from_board(&board);
        assert_eq!(analysis.column_heights(), [4, 0, 2]);
    }

    #[test]
    fn test_single_bottom_block_has_no_hole() {
        let board = Board::from_ascii(
            r"
            ...
            ...
            .#.
            ",
        );
        let analysis = BoardAnalysis::from_board(&board);
        assert_eq!(analysis.column_heights(), &[0, 1, 0]);
        assert_eq!(analysis.num_holes(), 0);
        assert_eq!(analysis.bumpiness(), 2);
    }

    #[test]
    fn test_holes_below_topmost_cell() {
        let board = Board::from_ascii(
            r"
            ....
            #...
            ..#.
            #.#.
            #...
            ",
        );
        let analysis = BoardAnalysis::from_board(&board);
        assert_eq!(analysis.column_heights(), &[4, 0, 3, 0]);
        // column 0: one gap, column 2: one gap at the bottom
        assert_eq!(analysis.num_holes(), 2);
    }

    #[test]
    fn test_flat_board_has_no_bumpiness() {
        let board = Board::from_ascii(
            r"
            .....
            #####
            #.#.#
            ",
        );
        let analysis = BoardAnalysis::from_board(&board);
        assert_eq!(analysis.column_heights(), &[2, 2, 2, 2, 2]);
        assert_eq!(analysis.bumpiness(), 0);
        assert_eq!(analysis.num_holes(), 2);
        assert_eq!(analysis.aggregate_height(), 10);
    }
}
