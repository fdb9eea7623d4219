//! Surrogate-guided calibration of the agent's weights.
//!
//! Calibration runs in three stages:
//!
//! 1. **Sampling** - draw `trials` weight vectors around the base vector, play
//!    `episodes_per_trial` episodes with each and record the mean score.
//! 2. **Surrogate** - fit a linear regression of mean score on weights, draw a larger pool
//!    of candidates with a wider amplitude and pick the one with the highest predicted score.
//! 3. **Verification** - play fresh episodes with the chosen candidate to measure its actual
//!    mean score.
//!
//! Every random draw (sample weights, episode seeds, candidate pool and verification seeds)
//! is taken from the caller's RNG before any episode is played, in that order. Trials are
//! then played in parallel, one thread per trial, while the episodes of each trial run
//! sequentially. A fixed RNG seed therefore yields the same [`CalibrationReport`].
//!
//! [`calibrate_and_persist`] writes the verified candidate to a [`WeightStore`] without
//! comparing it to what the store held before, so a worse vector may replace a better one.

use std::thread;

use blockfall_engine::ShapeSeed;
use blockfall_evaluator::{
    agent::Agent,
    session_evaluator::SessionEvaluator,
    weight_store::{WeightStore, WeightStoreError},
    weights::Weights,
};
use blockfall_stats::{
    descriptive::DescriptiveStats,
    regression::{LinearModel, RegressionError},
};
use rand::Rng;
use serde::Serialize;

use crate::weights::{self, InvalidAmplitude};

/// Parameters of one calibration run.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationParams {
    /// Vector that samples and candidates are drawn around.
    pub base: Weights,
    pub trials: usize,
    pub episodes_per_trial: usize,
    pub sample_amplitude: f32,
    /// Maximum placements per sampling episode.
    pub trial_step_budget: usize,
    pub candidates: usize,
    pub candidate_amplitude: f32,
    pub verification_episodes: usize,
    /// Maximum placements per verification episode.
    pub verification_step_budget: usize,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            base: Weights::DEFAULT,
            trials: 40,
            episodes_per_trial: 2,
            sample_amplitude: 1.0,
            trial_step_budget: 400,
            candidates: 50,
            candidate_amplitude: 1.5,
            verification_episodes: 3,
            verification_step_budget: 500,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CalibrationError {
    #[display("{_0}")]
    InvalidAmplitude(InvalidAmplitude),
    #[display("{field} must be at least 1")]
    #[from(ignore)]
    ZeroCount { field: &'static str },
    #[display("failed to fit surrogate model: {_0}")]
    Regression(RegressionError),
    #[display("failed to persist calibrated weights: {_0}")]
    Store(WeightStoreError),
}

/// One sampled weight vector and the mean score it achieved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingSample {
    pub weights: Weights,
    pub mean_score: f32,
}

/// A candidate from the surrogate stage with its predicted score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub weights: Weights,
    pub predicted_score: f64,
}

/// Everything a calibration run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationReport {
    pub samples: Vec<TrainingSample>,
    pub surrogate: LinearModel,
    pub candidates: Vec<Candidate>,
    /// Candidate with the highest predicted score (first one on ties).
    pub best: Candidate,
    pub verification_scores: Vec<f32>,
    pub verified_score: f32,
}

impl CalibrationReport {
    /// Distribution of the trial mean scores.
    #[must_use]
    pub fn sample_score_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.samples.iter().map(|s| s.mean_score))
    }
}

#[derive(Debug)]
struct Trial {
    weights: Weights,
    seeds: Vec<ShapeSeed>,
    mean_score: f32,
}

/// Runs the sampling, surrogate and verification stages.
#[expect(clippy::cast_precision_loss)]
pub fn calibrate<E, R>(
    params: &CalibrationParams,
    evaluator: &E,
    rng: &mut R,
) -> Result<CalibrationReport, CalibrationError>
where
    E: SessionEvaluator + ?Sized,
    R: Rng + ?Sized,
{
    validate(params)?;

    let mut trials = (0..params.trials)
        .map(|_| {
            let sampled = weights::perturb(params.base, params.sample_amplitude, rng)?;
            let seeds = (0..params.episodes_per_trial).map(|_| rng.random()).collect();
            Ok(Trial {
                weights: sampled,
                seeds,
                mean_score: 0.0,
            })
        })
        .collect::<Result<Vec<_>, InvalidAmplitude>>()?;
    let candidate_weights = (0..params.candidates)
        .map(|_| weights::perturb(params.base, params.candidate_amplitude, rng))
        .collect::<Result<Vec<_>, _>>()?;
    let verification_seeds: Vec<ShapeSeed> = (0..params.verification_episodes)
        .map(|_| rng.random())
        .collect();

    log::info!(
        "sampling {} weight vectors, {} episodes each",
        params.trials,
        params.episodes_per_trial
    );
    let trial_count = trials.len();
    thread::scope(|s| {
        for (i, trial) in trials.iter_mut().enumerate() {
            s.spawn(move || {
                let agent = Agent::new(trial.weights);
                trial.mean_score = evaluator.play_and_evaluate_sessions(
                    &agent,
                    &trial.seeds,
                    params.trial_step_budget,
                );
                log::info!(
                    "[trial {}/{trial_count}] weights={:.3?}, mean score={}",
                    i + 1,
                    trial.weights.to_array(),
                    trial.mean_score
                );
            });
        }
    });
    let samples: Vec<TrainingSample> = trials
        .into_iter()
        .map(|t| TrainingSample {
            weights: t.weights,
            mean_score: t.mean_score,
        })
        .collect();

    let features: Vec<_> = samples
        .iter()
        .map(|s| weights::to_features(s.weights))
        .collect();
    let targets: Vec<f64> = samples.iter().map(|s| f64::from(s.mean_score)).collect();
    let surrogate = LinearModel::fit(&features, &targets)?;
    log::info!(
        "surrogate coefficients={:.3?}, intercept={:.3}",
        surrogate.coefficients(),
        surrogate.intercept()
    );

    let candidates: Vec<Candidate> = candidate_weights
        .into_iter()
        .map(|w| Candidate {
            weights: w,
            predicted_score: surrogate.predict(&weights::to_features(w)),
        })
        .collect();
    let best = candidates
        .iter()
        .copied()
        .reduce(|best, c| {
            if c.predicted_score > best.predicted_score {
                c
            } else {
                best
            }
        })
        .ok_or(CalibrationError::ZeroCount {
            field: "candidates",
        })?;
    log::info!(
        "best predicted weights={:.3?}, predicted score={:.1}",
        best.weights.to_array(),
        best.predicted_score
    );

    let agent = Agent::new(best.weights);
    let verification_scores: Vec<f32> = verification_seeds
        .iter()
        .map(|seed| {
            evaluator.play_and_evaluate_session(&agent, *seed, params.verification_step_budget)
        })
        .collect();
    let verified_score =
        verification_scores.iter().sum::<f32>() / verification_scores.len() as f32;
    log::info!("verified mean score={verified_score}");

    Ok(CalibrationReport {
        samples,
        surrogate,
        candidates,
        best,
        verification_scores,
        verified_score,
    })
}

/// Runs [`calibrate`] and saves the verified candidate to `store`.
///
/// The store is overwritten even if it held a vector that scores better.
pub fn calibrate_and_persist<E, R>(
    params: &CalibrationParams,
    evaluator: &E,
    store: &WeightStore,
    rng: &mut R,
) -> Result<CalibrationReport, CalibrationError>
where
    E: SessionEvaluator + ?Sized,
    R: Rng + ?Sized,
{
    let report = calibrate(params, evaluator, rng)?;
    store.save(&report.best.weights)?;
    log::info!(
        "saved weights {:.3?} to {}",
        report.best.weights.to_array(),
        store.path().display()
    );
    Ok(report)
}

fn validate(params: &CalibrationParams) -> Result<(), CalibrationError> {
    weights::validate_amplitude(params.sample_amplitude)?;
    weights::validate_amplitude(params.candidate_amplitude)?;
    for (field, count) in [
        ("trials", params.trials),
        ("episodes_per_trial", params.episodes_per_trial),
        ("candidates", params.candidates),
        ("verification_episodes", params.verification_episodes),
    ] {
        if count == 0 {
            return Err(CalibrationError::ZeroCount { field });
        }
    }
    Ok(())
}
