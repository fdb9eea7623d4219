//! Headless game logic built on the core data model.
//!
//! - [`GameField`] - board, falling shape and statistics of one game
//! - [`GameStats`] / [`GameSummary`] - score, lines and level
//! - [`ShapeSupply`] / [`ShapeSeed`] - reproducible shape sequences
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{GameField, Placement, ShapeSeed};
//!
//! let mut field = GameField::standard(ShapeSeed::from_bytes([7; 16]));
//!
//! while !field.is_game_over() {
//!     let (_lines, result) = field.apply_placement(Placement::new(0, 0));
//!     if result.is_err() {
//!         break;
//!     }
//! }
//!
//! let summary = field.stats().summary(false);
//! assert_eq!(summary.level, 1);
//! ```

pub use self::{game_field::*, game_stats::*, shape_supply::*};

mod game_field;
mod game_stats;
mod shape_supply;
