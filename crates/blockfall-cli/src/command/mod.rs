use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::prelude::*;

use self::{auto_play::AutoPlayArg, train_ai::TrainAiArg};

mod auto_play;
mod train_ai;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Maximum level of log messages written to stderr
    #[arg(long, global = true, default_value = "info")]
    log_level: Level,

    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Let an agent play a single game
    #[command(name = "auto-play")]
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Evolve evaluator weights using a genetic algorithm
    TrainAi(#[clap(flatten)] TrainAiArg),
}

fn init_logging(level: Level) {
    let registry = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level));
    registry.init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.log_level);
    match args.mode {
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::TrainAi(arg) => train_ai::run(&arg)?,
    }
    Ok(())
}
