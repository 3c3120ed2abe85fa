use std::path::PathBuf;

use anyhow::ensure;
use diamond_engine::{
    BaseSlot, GameConfig, GameSession, PitchSeed, SessionStats, Team, TeamSnapshot,
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::util::{Output, load_config};

/// Upper bound on plate events; a game that has not ended by then is reported incomplete.
const MAX_EVENTS: usize = 100_000;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Game configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// 32-digit hex seed; overrides the configuration's seed
    #[arg(long)]
    seed: Option<PitchSeed>,
    /// Probability that a pitch is put in play
    #[arg(long, default_value_t = 0.2)]
    contact_rate: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct GameSummary {
    seed: PitchSeed,
    away: TeamSnapshot,
    home: TeamSnapshot,
    winner: Option<Team>,
    half_innings: u8,
    completed: bool,
    stats: SessionStats,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        config,
        seed,
        contact_rate,
        output,
    } = arg;
    ensure!(
        (0.0..=1.0).contains(contact_rate),
        "contact rate must be in [0, 1], got {contact_rate}"
    );

    let config = load_config(config.as_deref(), *seed)?;
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let summary = simulate(&config, seed, *contact_rate)?;
    tracing::info!(
        away = summary.away.score,
        home = summary.home.score,
        completed = summary.completed,
        "simulation finished"
    );
    Output::save_json(&summary, output.as_deref())
}

fn simulate(
    config: &GameConfig,
    seed: PitchSeed,
    contact_rate: f64,
) -> anyhow::Result<GameSummary> {
    let mut session = GameSession::with_seed(config, seed);
    let mut play_rng = Pcg32::from_rng(&mut Pcg32::from_seed(seed.to_bytes()));

    for _ in 0..MAX_EVENTS {
        if session.is_game_over() {
            break;
        }
        if play_rng.random_bool(contact_rate) {
            play_ball(&mut session, &mut play_rng)?;
        } else {
            session.throw_pitch()?;
        }
    }

    let snapshot = session.snapshot();
    Ok(GameSummary {
        seed,
        winner: snapshot
            .game_over
            .then(|| session.score_board().leader())
            .flatten(),
        half_innings: snapshot.count.half_inning() + 1,
        completed: snapshot.game_over,
        stats: *session.stats(),
        away: snapshot.away,
        home: snapshot.home,
    })
}

/// Puts the ball in play: the batter is thrown out at the plate or reaches first.
fn play_ball(session: &mut GameSession, rng: &mut Pcg32) -> anyhow::Result<()> {
    session.contact_made()?;
    if rng.random_bool(0.5) {
        session.ball_in_play_out(BaseSlot::AtBat)?;
    } else if let Some(batter) = session.batter() {
        session.runner_advance(batter, BaseSlot::First)?;
    }
    if session.state().is_ball_in_play() {
        session.end_play()?;
    }
    Ok(())
}
