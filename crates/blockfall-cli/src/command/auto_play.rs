use blockfall_engine::PieceSeed;
use blockfall_evaluator::{LookaheadPlayer, Player, RandomPlayer, SessionConfig, play_session};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum PlayerType {
    #[default]
    Lookahead,
    Random,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Agent that plays the game (`lookahead` or `random`)
    #[arg(long, default_value = "lookahead")]
    player: PlayerType,
    /// Seed of the piece sequence (and of the random player); random if omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Board width in cells
    #[arg(long, default_value_t = SessionConfig::default().width)]
    width: usize,
    /// Board height in cells
    #[arg(long, default_value_t = SessionConfig::default().height)]
    height: usize,
    /// Stop after this many pieces have been placed
    #[arg(long, default_value_t = SessionConfig::default().max_pieces)]
    max_pieces: usize,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        player,
        seed,
        width,
        height,
        max_pieces,
    } = *arg;
    let seed = seed.unwrap_or_else(rand::random);
    let session = SessionConfig {
        width,
        height,
        max_pieces,
        ..SessionConfig::default()
    };
    let mut board = session.new_board(PieceSeed::from(seed))?;

    let mut agent: Box<dyn Player> = match player {
        PlayerType::Lookahead => Box::new(LookaheadPlayer::baseline()),
        PlayerType::Random => Box::new(RandomPlayer::new(seed)),
    };
    tracing::info!(?player, seed, width, height, max_pieces, "starting game");

    let outcome = play_session(&mut board, &mut agent, session.max_pieces);

    println!("{board}");
    tracing::info!(
        score = outcome.score,
        pieces = outcome.placed_pieces,
        lines = outcome.cleared_lines,
        clears_by_size = ?outcome.clears_by_size,
        game_over = outcome.game_over,
        "game finished"
    );
    Ok(())
}
