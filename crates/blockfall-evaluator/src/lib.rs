//! Scripted player for the falling-block game: board heuristics, move search and weights.
//!
//! The evaluator is layered the same way a decision is made:
//!
//! ```text
//! Session evaluation   (score whole episodes, used for calibration)
//!     ↓ uses
//! Agent / move search  (pick the best placement for one shape)
//!     ↓ uses
//! Placement evaluation (score one simulated drop)
//!     ↓ uses
//! Board analysis       (aggregate height, holes, bumpiness)
//! ```
//!
//! - [`board_analysis`] - lazily computed heuristics of a board snapshot
//! - [`weights`] - the four coefficients of the linear scoring function
//! - [`placement_analysis`] / [`placement_evaluator`] - one candidate drop and its score
//! - [`move_search`] - exhaustive search over rotations and columns
//! - [`agent`] - an owned weight vector plus the move search
//! - [`weight_store`] - loading and saving calibrated weights
//! - [`session_evaluator`] - playing and scoring whole episodes
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Board, Placement, ShapeKind};
//! use blockfall_evaluator::{agent::Agent, weights::Weights};
//!
//! let agent = Agent::new(Weights::new(1.0, 0.0, 0.0, 0.0));
//! let board = Board::new(4, 8).unwrap();
//!
//! // nothing clears a line, so the first enumerated placement wins the tie
//! let placement = agent.choose_best_move(&board, &ShapeKind::O.shape());
//! assert_eq!(placement, Some(Placement::new(0, 0)));
//! ```

pub mod agent;
pub mod board_analysis;
pub mod move_search;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod session_evaluator;
pub mod weight_store;
pub mod weights;
