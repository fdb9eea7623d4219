//! Offline calibration of the agent's scoring weights.
//!
//! Finding good weights by direct optimization is impractical: the only way to measure a
//! weight vector is to play noisy, expensive games with it. Calibration instead samples a
//! few vectors, fits a cheap linear surrogate of score as a function of the weights, lets
//! the surrogate pick from a larger candidate pool and verifies the pick by playing again.
//!
//! ```text
//! perturbed weights ──▶ episodes (SessionEvaluator) ──▶ mean scores
//!                                                          │
//!        candidate pool ──▶ surrogate (LinearModel) ◀──────┘
//!                                │
//!                                ▼
//!                 best candidate ──▶ verification episodes ──▶ WeightStore
//! ```
//!
//! - [`weights`] - random perturbation of weight vectors
//! - [`calibration`] - the calibration stages and persistence of the result
//!
//! # Example
//!
//! ```
//! use blockfall_engine::Board;
//! use blockfall_evaluator::session_evaluator::ScoreSessionEvaluator;
//! use blockfall_training::calibration::{CalibrationParams, calibrate};
//!
//! let params = CalibrationParams {
//!     trials: 6,
//!     episodes_per_trial: 1,
//!     trial_step_budget: 10,
//!     candidates: 10,
//!     verification_episodes: 1,
//!     verification_step_budget: 10,
//!     ..CalibrationParams::default()
//! };
//! let evaluator = ScoreSessionEvaluator::with_board(Board::new(6, 10).unwrap());
//!
//! let report = calibrate(&params, &evaluator, &mut rand::rng()).unwrap();
//! assert_eq!(report.samples.len(), 6);
//! assert_eq!(report.candidates.len(), 10);
//! ```

pub mod calibration;
pub mod weights;
