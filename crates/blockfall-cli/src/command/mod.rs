use clap::{Parser, Subcommand};

use self::{auto_play::AutoPlayArg, suggest_move::SuggestMoveArg, train_ai::TrainAiArg};

mod auto_play;
mod suggest_move;
mod train_ai;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Calibrate the agent's weights and save them to the weight file
    TrainAi(#[clap(flatten)] TrainAiArg),
    /// Play one headless game with the agent and print its summary
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Print the agent's placement for a board and a shape
    SuggestMove(#[clap(flatten)] SuggestMoveArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::TrainAi(arg) => train_ai::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::SuggestMove(arg) => suggest_move::run(&arg)?,
    }
    Ok(())
}
