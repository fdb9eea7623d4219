use std::path::PathBuf;

use blockfall_engine::{GameField, GameSummary, ShapeSeed};
use blockfall_evaluator::{
    agent::Agent,
    session_evaluator::{self, SessionEnd},
    weight_store::DEFAULT_WEIGHTS_FILE,
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Weight file to read the agent's weights from
    #[arg(long, default_value = DEFAULT_WEIGHTS_FILE)]
    weights_file: PathBuf,
    /// Play with the default weights instead of reading the weight file
    #[arg(long)]
    no_load: bool,
    /// Seed for the shape sequence (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of placements
    #[arg(long, default_value_t = 1000)]
    step_budget: usize,
}

#[derive(Debug, Serialize)]
struct AutoPlayResult {
    shape_seed: ShapeSeed,
    end: &'static str,
    placements: usize,
    #[serde(flatten)]
    summary: GameSummary,
}

fn end_name(end: SessionEnd) -> &'static str {
    match end {
        SessionEnd::TopOut => "top-out",
        SessionEnd::NoLegalMove => "no-legal-move",
        SessionEnd::StepBudget => "step-budget",
    }
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        weights_file,
        no_load,
        seed,
        step_budget,
    } = arg;

    let agent = Agent::new(util::load_weights(weights_file, *no_load));
    let mut rng = Pcg32::seed_from_u64(util::resolve_seed(*seed));
    let shape_seed: ShapeSeed = rng.random();

    let result = play(&agent, shape_seed, *step_budget);
    eprintln!(
        "Game ended ({}) after {} placements: score {}, {} lines, level {}",
        result.end,
        result.placements,
        result.summary.score,
        result.summary.lines_cleared,
        result.summary.level
    );
    Output::save_json(&result, None)
}

fn play(agent: &Agent, shape_seed: ShapeSeed, step_budget: usize) -> AutoPlayResult {
    let mut field = GameField::standard(shape_seed);
    let end = session_evaluator::play_session(&mut field, agent, step_budget);
    AutoPlayResult {
        shape_seed,
        end: end_name(end),
        placements: field.stats().completed_shapes(),
        summary: field.stats().summary(true),
    }
}

#[cfg(test)]
mod tests {
    use blockfall_evaluator::weights::Weights;

    use super::*;

    #[test]
    fn test_same_seed_same_game() {
        let agent = Agent::new(Weights::DEFAULT);
        let seed = ShapeSeed::from_bytes([3; 16]);
        let a = play(&agent, seed, 50);
        let b = play(&agent, seed, 50);
        assert_eq!(a.summary, b.summary);
        assert_eq!(a.placements, b.placements);
        assert!(a.placements <= 50);
    }

    #[test]
    fn test_result_json_carries_seed_and_summary() {
        let agent = Agent::new(Weights::DEFAULT);
        let seed = ShapeSeed::from_bytes([0xab; 16]);
        let result = play(&agent, seed, 0);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["shape_seed"], "ab".repeat(16));
        assert_eq!(json["end"], "step-budget");
        assert_eq!(json["score"], 0);
        assert_eq!(json["level"], 1);
        assert_eq!(json["agent_controlled"], true);
    }
}
