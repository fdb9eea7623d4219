//! Episode evaluation: how well an agent plays whole games.
//!
//! An episode starts from an empty board with a seeded shape sequence, lets the [`Agent`]
//! place shapes until the game tops out, no legal move exists or the step budget runs out,
//! and then scores the result. The step budget guarantees termination for agents good enough
//! to never top out.
//!
//! ```
//! use blockfall_engine::ShapeSeed;
//! use blockfall_evaluator::{
//!     agent::Agent,
//!     session_evaluator::{ScoreSessionEvaluator, SessionEvaluator},
//!     weights::Weights,
//! };
//!
//! let evaluator = ScoreSessionEvaluator::new();
//! let agent = Agent::new(Weights::DEFAULT);
//! let seeds = [ShapeSeed::from_bytes([1; 16]), ShapeSeed::from_bytes([2; 16])];
//!
//! let mean = evaluator.play_and_evaluate_sessions(&agent, &seeds, 50);
//! assert!(mean >= 0.0);
//! ```

use std::fmt;

use blockfall_engine::{Board, GameField, ShapeSeed};

use crate::agent::Agent;

/// Why an episode stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionEnd {
    /// A shape could not spawn or could not be dropped.
    TopOut,
    /// The agent found no legal placement for the falling shape.
    NoLegalMove,
    /// The step budget was used up.
    StepBudget,
}

/// Plays `field` with `agent` for at most `step_budget` placements.
pub fn play_session(field: &mut GameField, agent: &Agent, step_budget: usize) -> SessionEnd {
    for _ in 0..step_budget {
        if field.is_game_over() {
            return SessionEnd::TopOut;
        }
        let Some(placement) = agent.choose_best_move(field.board(), field.falling_shape()) else {
            return SessionEnd::NoLegalMove;
        };
        let (_cleared_lines, result) = field.apply_placement(placement);
        if result.is_err() {
            return SessionEnd::TopOut;
        }
    }
    SessionEnd::StepBudget
}

/// Scores episodes played by an agent.
///
/// Implementations must be deterministic for a given agent, seed and step budget, so that
/// calibration runs are reproducible.
pub trait SessionEvaluator: fmt::Debug + Send + Sync {
    /// Plays one episode from `seed` and returns its score (higher is better).
    fn play_and_evaluate_session(&self, agent: &Agent, seed: ShapeSeed, step_budget: usize)
    -> f32;

    /// Plays one episode per seed, sequentially, and returns the mean score.
    ///
    /// Returns 0 when `seeds` is empty.
    #[expect(clippy::cast_precision_loss)]
    fn play_and_evaluate_sessions(
        &self,
        agent: &Agent,
        seeds: &[ShapeSeed],
        step_budget: usize,
    ) -> f32 {
        if seeds.is_empty() {
            return 0.0;
        }
        let total: f32 = seeds
            .iter()
            .map(|seed| self.play_and_evaluate_session(agent, *seed, step_budget))
            .sum();
        total / seeds.len() as f32
    }
}

/// Scores an episode by its game score.
#[derive(Debug, Clone)]
pub struct ScoreSessionEvaluator {
    board: Board,
}

impl Default for ScoreSessionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreSessionEvaluator {
    /// Plays on an empty [`Board::standard`] board.
    #[must_use]
    pub fn new() -> Self {
        Self::with_board(Board::standard())
    }

    /// Plays every episode starting from a copy of `board`.
    #[must_use]
    pub fn with_board(board: Board) -> Self {
        Self { board }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }
}

impl SessionEvaluator for ScoreSessionEvaluator {
    #[expect(clippy::cast_precision_loss)]
    fn play_and_evaluate_session(
        &self,
        agent: &Agent,
        seed: ShapeSeed,
        step_budget: usize,
    ) -> f32 {
        let mut field = GameField::new(self.board.clone(), seed);
        let end = play_session(&mut field, agent, step_budget);
        log::trace!(
            "episode {seed} ended by {end:?} after {} shapes, score {}",
            field.stats().completed_shapes(),
            field.stats().score()
        );
        field.stats().score() as f32
    }
}
