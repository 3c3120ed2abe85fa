use clap::{Parser, Subcommand};

use self::{simulate::SimulateArg, zone_stats::ZoneStatsArg};

mod simulate;
mod zone_stats;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a whole game with synthetic pitches and plays
    Simulate(#[clap(flatten)] SimulateArg),
    /// Sample pitch targets and report per-cell frequencies
    ZoneStats(#[clap(flatten)] ZoneStatsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::ZoneStats(arg) => zone_stats::run(&arg)?,
    }
    Ok(())
}
