use std::path::PathBuf;

use blockfall_stats::{descriptive::DescriptiveStats, regression::LinearModel};
use blockfall_training::calibration::{CalibrationReport, Candidate, TrainingSample};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// JSON record of one `train-ai` run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub trained_at: DateTime<Utc>,
    pub seed: u64,
    pub weights_file: PathBuf,
    pub samples: Vec<TrainingSample>,
    pub sample_score_stats: Option<DescriptiveStats>,
    pub surrogate: LinearModel,
    pub best: Candidate,
    pub verification_scores: Vec<f32>,
    pub verified_score: f32,
}

impl TrainingReport {
    pub fn new(seed: u64, weights_file: PathBuf, report: CalibrationReport) -> Self {
        let sample_score_stats = report.sample_score_stats();
        let CalibrationReport {
            samples,
            surrogate,
            candidates: _,
            best,
            verification_scores,
            verified_score,
        } = report;
        Self {
            trained_at: Utc::now(),
            seed,
            weights_file,
            samples,
            sample_score_stats,
            surrogate,
            best,
            verification_scores,
            verified_score,
        }
    }
}
