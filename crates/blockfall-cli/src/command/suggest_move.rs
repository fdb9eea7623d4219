use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{Board, Placement, Shape};
use blockfall_evaluator::{agent::Agent, weight_store::DEFAULT_WEIGHTS_FILE, weights::Weights};
use serde::Deserialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SuggestMoveArg {
    /// Request JSON file with `board` and `shape` matrices (stdin when omitted)
    input: Option<PathBuf>,
    /// Weight file to read the agent's weights from
    #[arg(long, default_value = DEFAULT_WEIGHTS_FILE)]
    weights_file: PathBuf,
    /// Use the default weights instead of reading the weight file
    #[arg(long)]
    no_load: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct MoveRequest {
    board: Vec<Vec<u8>>,
    shape: Vec<Vec<u8>>,
}

pub(crate) fn run(arg: &SuggestMoveArg) -> anyhow::Result<()> {
    let request: MoveRequest = util::read_json_input("move request", arg.input.as_deref())?;
    let weights = util::load_weights(&arg.weights_file, arg.no_load);
    let placement = suggest(&request, weights)?;
    Output::save_json(&placement, None)
}

fn suggest(request: &MoveRequest, weights: Weights) -> anyhow::Result<Placement> {
    let board = Board::from_matrix(&request.board).context("Invalid board")?;
    let shape = Shape::from_matrix(&request.shape).context("Invalid shape")?;
    Agent::new(weights)
        .choose_best_move(&board, &shape)
        .context("No legal placement for the shape on this board")
}
