use std::fmt;

use crate::{GridError, core::shape::Shape};

/// Single row of the board as a bitmask.
///
/// Bit `x` is set when column `x` is occupied. Bits at or above the board width are
/// always clear.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BitRow {
    bits: u64,
}

impl BitRow {
    pub const EMPTY: Self = Self { bits: 0 };

    /// Checks if the cell at column `x` is occupied.
    #[inline]
    #[must_use]
    pub fn is_cell_occupied(self, x: usize) -> bool {
        x < Board::MAX_WIDTH && (self.bits & (1 << x)) != 0
    }

    /// Checks if every column of a board of the given width is occupied.
    #[inline]
    #[must_use]
    pub fn is_filled(self, width: usize) -> bool {
        self.bits == full_row_mask(width)
    }

    #[must_use]
    pub fn occupied_count(self) -> usize {
        self.bits.count_ones() as usize
    }

    #[inline]
    fn is_any_cell_occupied(self, mask: u64) -> bool {
        (self.bits & mask) != 0
    }

    #[inline]
    fn occupy_cells(&mut self, mask: u64) {
        self.bits |= mask;
    }

    /// Iterates over the first `width` cells of the row, returning their occupied status.
    pub fn iter_cells(self, width: usize) -> impl Iterator<Item = bool> {
        (0..width).map(move |x| self.is_cell_occupied(x))
    }
}

const fn full_row_mask(width: usize) -> u64 {
    if width >= Board::MAX_WIDTH {
        u64::MAX
    } else {
        (1 << width) - 1
    }
}

/// Moves a shape row to column `x`.
///
/// Returns `None` when an occupied cell of the row would land at or beyond `width`.
fn shift_shape_row(mask: u8, x: usize, width: usize) -> Option<u64> {
    let Some(rightmost) = (0..8).rev().find(|b| mask & (1 << b) != 0) else {
        return Some(0);
    };
    if x + rightmost >= width {
        return None;
    }
    Some(u64::from(mask) << x)
}

/// Fixed-size binary board.
///
/// Row 0 is the top of the board, column 0 the left edge. Dimensions never change after
/// construction: drops and line clears only rewrite row contents.
///
/// # Example
///
/// ```
/// use blockfall_engine::Board;
///
/// let board = Board::from_ascii(
///     r"
///     ....
///     #..#
///     ",
/// );
/// assert_eq!(board.width(), 4);
/// assert_eq!(board.height(), 2);
/// assert!(board.is_occupied(3, 1));
/// assert_eq!(board.occupied_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    rows: Vec<BitRow>,
}

impl Board {
    pub const MAX_WIDTH: usize = 64;
    pub const STANDARD_WIDTH: usize = 12;
    pub const STANDARD_HEIGHT: usize = 22;

    /// Creates an empty board.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        if width > Self::MAX_WIDTH {
            return Err(GridError::TooLarge {
                width,
                height,
                max_width: Self::MAX_WIDTH,
                max_height: usize::MAX,
            });
        }
        Ok(Self {
            width,
            rows: vec![BitRow::EMPTY; height],
        })
    }

    /// Creates an empty board of the standard 12×22 size.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            width: Self::STANDARD_WIDTH,
            rows: vec![BitRow::EMPTY; Self::STANDARD_HEIGHT],
        }
    }

    /// Builds a board from a row-major cell matrix, top row first.
    ///
    /// Any non-zero cell is occupied, so colored boards can be passed as-is.
    pub fn from_matrix<R>(cells: &[R]) -> Result<Self, GridError>
    where
        R: AsRef<[u8]>,
    {
        let width = cells.first().map_or(0, |row| row.as_ref().len());
        let mut board = Self::new(width, cells.len())?;
        for (y, row) in cells.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: y,
                    expected: width,
                    actual: row.len(),
                });
            }
            for (x, &cell) in row.iter().enumerate() {
                if cell != 0 {
                    board.occupy(x, y);
                }
            }
        }
        Ok(board)
    }

    /// Creates a board from ASCII art for testing.
    ///
    /// `#` is an occupied cell and `.` an empty one. Rows are listed top to bottom and
    /// blank lines are ignored; every row must have the same width.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let cells: Vec<Vec<u8>> = art
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.chars()
                    .filter(|c| *c == '#' || *c == '.')
                    .map(|c| u8::from(c == '#'))
                    .collect()
            })
            .collect();
        Self::from_matrix(&cells).unwrap_or_else(|e| panic!("invalid board art: {e}"))
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn row(&self, y: usize) -> BitRow {
        self.rows[y]
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = BitRow> + '_ {
        self.rows.iter().copied()
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.rows.get(y).is_some_and(|row| row.is_cell_occupied(x))
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows.iter().map(|row| row.occupied_count()).sum()
    }

    /// Returns the board as a row-major `0`/`1` matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| row.iter_cells(self.width).map(u8::from).collect())
            .collect()
    }

    fn occupy(&mut self, x: usize, y: usize) {
        assert!(x < self.width && y < self.rows.len());
        self.rows[y].occupy_cells(1 << x);
    }

    /// Checks if the shape, with its top-left corner at `(x, y)`, collides.
    ///
    /// An occupied shape cell collides when it lies outside the board or on an occupied
    /// board cell. Empty cells of the shape's bounding box never collide.
    #[must_use]
    pub fn is_colliding(&self, shape: &Shape, x: usize, y: usize) -> bool {
        for (dy, mask) in shape.row_masks().enumerate() {
            if mask == 0 {
                continue;
            }
            let Some(row) = self.rows.get(y + dy) else {
                return true;
            };
            let Some(bits) = shift_shape_row(mask, x, self.width) else {
                return true;
            };
            if row.is_any_cell_occupied(bits) {
                return true;
            }
        }
        false
    }

    /// Returns the row where the shape comes to rest when dropped from row 0 at column `x`.
    ///
    /// The shape falls one row at a time while the next row neither collides nor pushes its
    /// bounding box below the floor. Returns `None` when the shape cannot even be placed at
    /// row 0.
    #[must_use]
    pub fn landing_row(&self, shape: &Shape, x: usize) -> Option<usize> {
        let fits = |y: usize| y + shape.height() <= self.height() && !self.is_colliding(shape, x, y);
        if !fits(0) {
            return None;
        }
        let mut y = 0;
        while fits(y + 1) {
            y += 1;
        }
        Some(y)
    }

    /// Locks a shape onto the board by setting its occupied cells.
    ///
    /// # Panics
    ///
    /// Panics if an occupied cell of the shape lies outside the board.
    pub fn fill_shape(&mut self, shape: &Shape, x: usize, y: usize) {
        for (dy, mask) in shape.row_masks().enumerate() {
            if mask == 0 {
                continue;
            }
            let bits = shift_shape_row(mask, x, self.width)
                .unwrap_or_else(|| panic!("shape cell out of board at column {x}"));
            self.rows[y + dy].occupy_cells(bits);
        }
    }

    /// Clears filled rows and returns the number of rows cleared.
    ///
    /// Remaining rows keep their relative order and move down; empty rows are inserted at
    /// the top.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..self.rows.len()).rev() {
            if self.rows[y].is_filled(self.width) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BitRow::EMPTY);
        count
    }

    /// Drops a shape at column `x` onto a copy of the board, then clears completed rows.
    ///
    /// Returns `None` when the shape cannot be placed at column `x` at all; callers treat
    /// that as an illegal placement. `self` is never modified.
    #[must_use]
    pub fn simulate_drop(&self, shape: &Shape, x: usize) -> Option<DropOutcome> {
        let landing_row = self.landing_row(shape, x)?;
        let mut board = self.clone();
        board.fill_shape(shape, x, landing_row);
        let cleared_lines = board.clear_lines();
        Some(DropOutcome {
            board,
            landing_row,
            cleared_lines,
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for occupied in row.iter_cells(self.width) {
                f.write_str(if occupied { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

/// Result of a successful [`Board::simulate_drop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropOutcome {
    board: Board,
    landing_row: usize,
    cleared_lines: usize,
}

impl DropOutcome {
    /// Board after locking the shape and clearing rows.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }

    /// Row of the shape's top edge when it locked, before rows were cleared.
    #[must_use]
    pub fn landing_row(&self) -> usize {
        self.landing_row
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }
}

#[cfg(test)]
mod tests {
    use crate::ShapeKind;

    use super::*;

    fn filled_row(board: &mut Board, y: usize) {
        for x in 0..board.width() {
            board.occupy(x, y);
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(10, 20).unwrap();
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 20);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_new_board_rejects_bad_dimensions() {
        assert_eq!(Board::new(0, 5), Err(GridError::Empty));
        assert_eq!(Board::new(5, 0), Err(GridError::Empty));
        assert!(matches!(
            Board::new(Board::MAX_WIDTH + 1, 5),
            Err(GridError::TooLarge { .. })
        ));
        assert!(Board::new(Board::MAX_WIDTH, 1).is_ok());
    }

    #[test]
    fn test_from_matrix_treats_non_zero_as_occupied() {
        let board = Board::from_matrix(&[vec![0_u8, 3, 0], vec![7, 0, 1]]).unwrap();
        assert!(!board.is_occupied(0, 0));
        assert!(board.is_occupied(1, 0));
        assert!(board.is_occupied(0, 1));
        assert!(board.is_occupied(2, 1));
        assert_eq!(board.to_matrix(), vec![vec![0, 1, 0], vec![1, 0, 1]]);
    }

    #[test]
    fn test_from_matrix_rejects_ragged_rows() {
        let result = Board::from_matrix(&[vec![0_u8, 0, 0], vec![0, 0]]);
        assert_eq!(
            result,
            Err(GridError::Ragged {
                row: 1,
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(Board::from_matrix::<Vec<u8>>(&[]), Err(GridError::Empty));
    }

    #[test]
    fn test_display_matches_ascii() {
        let art = "#..\n.#.\n..#";
        let board = Board::from_ascii(art);
        assert_eq!(board.to_string(), art);
    }

    #[test]
    fn test_bit_row_is_filled() {
        let mut board = Board::new(4, 1).unwrap();
        assert!(!board.row(0).is_filled(4));
        filled_row(&mut board, 0);
        assert!(board.row(0).is_filled(4));

        let mut wide = Board::new(Board::MAX_WIDTH, 1).unwrap();
        filled_row(&mut wide, 0);
        assert!(wide.row(0).is_filled(Board::MAX_WIDTH));
    }

    #[test]
    fn test_collision_with_walls_and_floor() {
        let board = Board::new(4, 3).unwrap();
        let square = ShapeKind::O.shape();
        assert!(!board.is_colliding(&square, 0, 0));
        assert!(!board.is_colliding(&square, 2, 1));
        assert!(board.is_colliding(&square, 3, 0));
        assert!(board.is_colliding(&square, 0, 2));
    }

    #[test]
    fn test_collision_ignores_empty_shape_cells() {
        let board = Board::from_ascii(
            r"
            #..
            ...
            ",
        );
        // T spawn orientation: the empty top-left cell may overlap the block.
        let t = ShapeKind::T.shape();
        assert!(!board.is_colliding(&t, 0, 0));
        assert!(board.is_colliding(&t, 0, 1));
    }

    #[test]
    fn test_landing_row_rests_on_stack() {
        let board = Board::from_ascii(
            r"
            ....
            ....
            ....
            .#..
            ",
        );
        let square = ShapeKind::O.shape();
        assert_eq!(board.landing_row(&square, 0), Some(1));
        assert_eq!(board.landing_row(&square, 2), Some(2));
    }

    #[test]
    fn test_simulate_drop_does_not_mutate_input() {
        let board = Board::new(4, 4).unwrap();
        let outcome = board.simulate_drop(&ShapeKind::O.shape(), 1).unwrap();
        assert_eq!(board.occupied_count(), 0);
        assert_eq!(outcome.board().occupied_count(), 4);
        assert_eq!(outcome.landing_row(), 2);
        assert!(outcome.board().is_occupied(1, 3));
        assert!(outcome.board().is_occupied(2, 2));
    }

    #[test]
    fn test_simulate_drop_fails_on_full_column() {
        let board = Board::from_ascii(
            r"
            #...
            #...
            #...
            ",
        );
        let bar = ShapeKind::I.shape().rotated_clockwise();
        assert_eq!(board.simulate_drop(&bar, 0), None);
        assert!(board.simulate_drop(&bar, 1).is_none(), "bar is taller than the board");

        let square = ShapeKind::O.shape();
        assert_eq!(board.simulate_drop(&square, 0), None);
        assert!(board.simulate_drop(&square, 1).is_some());
    }

    #[test]
    fn test_simulate_drop_fails_outside_board() {
        let board = Board::new(4, 4).unwrap();
        assert!(board.simulate_drop(&ShapeKind::I.shape(), 1).is_none());
        assert!(board.simulate_drop(&ShapeKind::I.shape(), 0).is_some());
    }

    #[test]
    fn test_simulate_drop_clears_completed_row() {
        let board = Board::from_ascii(
            r"
            ....
            ....
            ....
            ##..
            ",
        );
        let outcome = board.simulate_drop(&ShapeKind::O.shape(), 2).unwrap();
        assert_eq!(outcome.cleared_lines(), 1);
        assert_eq!(
            outcome.board().to_string(),
            "....\n....\n....\n..##",
            "upper half of the square moves down into the cleared row"
        );
    }

    #[test]
    fn test_clear_lines_keeps_relative_order() {
        let mut board = Board::from_ascii(
            r"
            #...
            ####
            .#..
            ####
            ..#.
            ",
        );
        assert_eq!(board.clear_lines(), 2);
        assert_eq!(board.to_string(), "....\n....\n#...\n.#..\n..#.");
    }

    #[test]
    fn test_clear_lines_all_filled() {
        let mut board = Board::new(3, 4).unwrap();
        for y in 0..4 {
            filled_row(&mut board, y);
        }
        assert_eq!(board.clear_lines(), 4);
        assert_eq!(board.occupied_count(), 0);
        assert_eq!(board.height(), 4);
    }

    #[test]
    fn test_clear_lines_partial_row_is_kept() {
        let mut board = Board::from_ascii("###.");
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board.occupied_count(), 3);
    }

    #[test]
    fn test_occupied_count_after_drop() {
        let board = Board::from_ascii(
            r"
            ............
            ............
            ............
            ............
            ##.#########
            #..#########
            ",
        );
        for kind in ShapeKind::ALL {
            let mut shape = kind.shape();
            for _ in 0..4 {
                for x in 0..=board.width() - shape.width() {
                    let Some(outcome) = board.simulate_drop(&shape, x) else {
                        continue;
                    };
                    assert_eq!(
                        outcome.board().occupied_count(),
                        board.occupied_count() + shape.occupied_count()
                            - board.width() * outcome.cleared_lines(),
                        "{kind:?} at column {x}:\n{shape}"
                    );
                }
                shape = shape.rotated_clockwise();
            }
        }
    }
}
