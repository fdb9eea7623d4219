//! Falling-block game model: boards, shapes, the drop simulator and a headless game field.
//!
//! - [`core`] holds the data model ([`Board`], [`Shape`], [`ShapeKind`], [`Placement`]) and the
//!   drop simulator ([`Board::simulate_drop`]).
//! - [`engine`] drives whole games without any rendering: [`GameField`] spawns shapes from a
//!   seeded [`ShapeSupply`], applies placements under gravity and tracks [`GameStats`].
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Board, ShapeKind};
//!
//! let board = Board::standard();
//! let bar = ShapeKind::I.shape();
//!
//! let outcome = board.simulate_drop(&bar, 0).unwrap();
//! assert_eq!(outcome.landing_row(), Board::STANDARD_HEIGHT - 1);
//! assert_eq!(outcome.cleared_lines(), 0);
//! assert_eq!(outcome.board().occupied_count(), 4);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Invalid dimensions or contents of a board or shape matrix.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    #[display("grid has no cells")]
    Empty,
    #[display("row {row} has {actual} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("grid of {width}x{height} cells exceeds the {max_width}x{max_height} limit")]
    TooLarge {
        width: usize,
        height: usize,
        max_width: usize,
        max_height: usize,
    },
    #[display("shape has no occupied cell")]
    NoOccupiedCell,
}

/// Reason a placement could not be completed on a [`GameField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum PlacementError {
    #[display("game is already over")]
    GameOver,
    #[display("shape cannot be dropped at the requested placement")]
    Blocked,
    #[display("new shape collides at spawn")]
    NewShapeCollision,
}
