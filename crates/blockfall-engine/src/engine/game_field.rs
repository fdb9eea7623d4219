use crate::{
    PlacementError,
    core::{Board, Placement, Shape, ShapeKind},
};

use super::{
    game_stats::GameStats,
    shape_supply::{ShapeSeed, ShapeSupply},
};

/// Headless game state: the board, the falling shape and the running statistics.
///
/// Shapes spawn at row 0, horizontally centered (`width / 2 - shape_width / 2`). The game is
/// over once a freshly spawned shape collides, or once a placement cannot be dropped.
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_kind: ShapeKind,
    falling_shape: Shape,
    falling_x: usize,
    supply: ShapeSupply,
    stats: GameStats,
    is_game_over: bool,
}

impl GameField {
    /// Starts a game on `board` with a shape sequence drawn from `seed`.
    #[must_use]
    pub fn new(board: Board, seed: ShapeSeed) -> Self {
        let mut supply = ShapeSupply::with_seed(seed);
        let falling_kind = supply.pop_next();
        let mut this = Self {
            board,
            falling_kind,
            falling_shape: falling_kind.shape(),
            falling_x: 0,
            supply,
            stats: GameStats::new(),
            is_game_over: false,
        };
        this.is_game_over = this.spawn(falling_kind).is_err();
        this
    }

    /// Starts a game on an empty [`Board::standard`] board.
    #[must_use]
    pub fn standard(seed: ShapeSeed) -> Self {
        Self::new(Board::standard(), seed)
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_kind(&self) -> ShapeKind {
        self.falling_kind
    }

    /// Returns the falling shape in its spawn orientation.
    #[must_use]
    pub fn falling_shape(&self) -> &Shape {
        &self.falling_shape
    }

    #[must_use]
    pub fn falling_x(&self) -> usize {
        self.falling_x
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    fn spawn(&mut self, kind: ShapeKind) -> Result<(), PlacementError> {
        let shape = kind.shape();
        let x = (self.board.width() / 2).saturating_sub(shape.width() / 2);
        self.falling_kind = kind;
        self.falling_shape = shape;
        self.falling_x = x;
        if self.board.is_colliding(&shape, x, 0) {
            return Err(PlacementError::NewShapeCollision);
        }
        Ok(())
    }

    /// Moves the falling shape toward `placement` and locks it.
    ///
    /// The shape is rotated clockwise `placement.rotation` times, then slid one column at a
    /// time toward `placement.column` at the spawn row, stopping early at the first column
    /// that collides. It is then dropped from that column, completed rows are cleared and the
    /// next shape is spawned.
    ///
    /// Returns the number of cleared lines together with the outcome. Any error ends the game.
    pub fn apply_placement(&mut self, placement: Placement) -> (usize, Result<(), PlacementError>) {
        if self.is_game_over {
            return (0, Err(PlacementError::GameOver));
        }

        let shape = self.falling_shape.rotated(placement.rotation);
        let mut x = self.falling_x;
        while x < placement.column && !self.board.is_colliding(&shape, x + 1, 0) {
            x += 1;
        }
        while x > placement.column && !self.board.is_colliding(&shape, x - 1, 0) {
            x -= 1;
        }

        let Some(outcome) = self.board.simulate_drop(&shape, x) else {
            self.is_game_over = true;
            return (0, Err(PlacementError::Blocked));
        };
        let cleared_lines = outcome.cleared_lines();
        self.board = outcome.into_board();
        self.stats.complete_shape_drop(cleared_lines);

        let next = self.supply.pop_next();
        if let Err(e) = self.spawn(next) {
            self.is_game_over = true;
            return (cleared_lines, Err(e));
        }
        (cleared_lines, Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_starting_with(kind: ShapeKind) -> ShapeSeed {
        (0..=u8::MAX)
            .map(|b| ShapeSeed::from_bytes([b; 16]))
            .find(|seed| ShapeSupply::with_seed(*seed).pop_next() == kind)
            .unwrap()
    }

    #[test]
    fn test_spawn_is_centered() {
        let field = GameField::standard(seed_starting_with(ShapeKind::I));
        assert_eq!(field.falling_kind(), ShapeKind::I);
        assert_eq!(field.falling_x(), 4);
        assert!(!field.is_game_over());

        let field = GameField::standard(seed_starting_with(ShapeKind::T));
        assert_eq!(field.falling_x(), 5);
    }

    #[test]
    fn test_placement_clears_line_and_scores() {
        let board = Board::new(4, 4).unwrap();
        let mut field = GameField::new(board, seed_starting_with(ShapeKind::I));

        let (cleared, result) = field.apply_placement(Placement::new(0, 0));
        assert_eq!(cleared, 1);
        assert!(result.is_ok());
        assert_eq!(field.board().occupied_count(), 0);
        assert_eq!(field.stats().score(), 100);
        assert_eq!(field.stats().completed_shapes(), 1);
    }

    #[test]
    fn test_slide_stops_at_obstacle() {
        let board = Board::from_ascii(
            r"
            #.....
            #.....
            #.....
            ",
        );
        let mut field = GameField::new(board, seed_starting_with(ShapeKind::I));
        assert_eq!(field.falling_x(), 1);

        let (cleared, _) = field.apply_placement(Placement::new(0, 0));
        assert_eq!(cleared, 0);
        assert!((1..5).all(|x| field.board().is_occupied(x, 2)));
        assert!(!field.board().is_occupied(5, 2));
    }

    #[test]
    fn test_undroppable_placement_ends_game() {
        let board = Board::new(4, 2).unwrap();
        let mut field = GameField::new(board, seed_starting_with(ShapeKind::I));

        let (cleared, result) = field.apply_placement(Placement::new(1, 0));
        assert_eq!(cleared, 0);
        assert_eq!(result, Err(PlacementError::Blocked));
        assert!(field.is_game_over());
        assert_eq!(
            field.apply_placement(Placement::new(0, 0)).1,
            Err(PlacementError::GameOver)
        );
    }

    #[test]
    fn test_spawn_collision_is_game_over() {
        let board = Board::from_ascii(
            r"
            ####.
            .....
            ",
        );
        let mut field = GameField::new(board, seed_starting_with(ShapeKind::O));
        assert!(field.is_game_over());
        assert_eq!(
            field.apply_placement(Placement::default()).1,
            Err(PlacementError::GameOver)
        );
    }

    #[test]
    fn test_same_seed_same_game() {
        let seed = ShapeSeed::from_bytes([42; 16]);
        let mut a = GameField::standard(seed);
        let mut b = GameField::standard(seed);
        for column in [0, 3, 6, 2, 8, 5, 1, 4] {
            let placement = Placement::new(column % 4, column);
            assert_eq!(a.apply_placement(placement), b.apply_placement(placement));
            assert_eq!(a.board(), b.board());
            assert_eq!(a.falling_kind(), b.falling_kind());
        }
    }
}
