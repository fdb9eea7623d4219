use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_evaluator::{
    session_evaluator::ScoreSessionEvaluator,
    weight_store::{DEFAULT_WEIGHTS_FILE, WeightStore},
};
use blockfall_training::calibration::{self, CalibrationParams, CalibrationReport};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use crate::{
    model::training_report::TrainingReport,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainAiArg {
    /// Weight file to overwrite with the calibrated weights
    #[arg(long, default_value = DEFAULT_WEIGHTS_FILE)]
    weights_file: PathBuf,
    /// Number of sampled weight vectors [default: 40]
    #[arg(long)]
    trials: Option<usize>,
    /// Episodes played with each sampled weight vector [default: 2]
    #[arg(long)]
    episodes: Option<usize>,
    /// Seed for every random draw of the run (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Training report output file (stdout when omitted)
    #[arg(long)]
    report: Option<PathBuf>,
}

impl TrainAiArg {
    fn calibration_params(&self) -> CalibrationParams {
        let defaults = CalibrationParams::default();
        CalibrationParams {
            trials: self.trials.unwrap_or(defaults.trials),
            episodes_per_trial: self.episodes.unwrap_or(defaults.episodes_per_trial),
            ..defaults
        }
    }
}

pub(crate) fn run(arg: &TrainAiArg) -> anyhow::Result<()> {
    let params = arg.calibration_params();
    let seed = util::resolve_seed(arg.seed);
    let mut rng = Pcg32::seed_from_u64(seed);
    let evaluator = ScoreSessionEvaluator::new();
    let store = WeightStore::new(&arg.weights_file);

    eprintln!(
        "Calibrating: {} trials x {} episodes, {} candidates, {} verification episodes",
        params.trials, params.episodes_per_trial, params.candidates, params.verification_episodes
    );
    let report = calibration::calibrate_and_persist(&params, &evaluator, &store, &mut rng)
        .context("Calibration failed")?;
    print_summary(&report);

    eprintln!();
    eprintln!("Weights saved successfully");
    eprintln!("  Path: {}", store.path().display());
    eprintln!("  Weights: {:.3?}", report.best.weights.to_array());

    let training_report = TrainingReport::new(seed, arg.weights_file.clone(), report);
    Output::save_json(&training_report, arg.report.clone())?;
    if let Some(path) = &arg.report {
        eprintln!("  Report: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &CalibrationReport) {
    eprintln!("Samples:");
    for (i, sample) in report.samples.iter().enumerate() {
        eprintln!(
            "  {i:2}: {:.3?} => {:.1}",
            sample.weights.to_array(),
            sample.mean_score
        );
    }

    if let Some(stats) = report.sample_score_stats() {
        eprintln!("Sample Score Stats:");
        eprintln!("    Min:    {:.1}", stats.min);
        eprintln!("    Max:    {:.1}", stats.max);
        eprintln!("    Mean:   {:.1}", stats.mean);
        eprintln!("    Median: {:.1}", stats.median);
        eprintln!("    StdDev: {:.1}", stats.std_dev);
    }

    eprintln!("Surrogate:");
    eprintln!("    Coefficients: {:.3?}", report.surrogate.coefficients());
    eprintln!("    Intercept:    {:.3}", report.surrogate.intercept());

    eprintln!("Best Candidate:");
    eprintln!("    Weights:   {:.3?}", report.best.weights.to_array());
    eprintln!("    Predicted: {:.1}", report.best.predicted_score);
    eprintln!("    Verified:  {:.1}", report.verified_score);
    eprintln!("    Episodes:  {:.1?}", report.verification_scores);
}
