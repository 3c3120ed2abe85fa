use std::path::PathBuf;

use anyhow::ensure;
use diamond_engine::{CELL_COUNT, PitchSeed, PitchTargetSelector, ZoneCellId};
use rand::Rng as _;
use serde::Serialize;

use crate::util::{Output, load_config};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ZoneStatsArg {
    /// Game configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// 32-digit hex seed; overrides the configuration's seed
    #[arg(long)]
    seed: Option<PitchSeed>,
    /// Number of pitch targets to draw
    #[arg(long, default_value_t = 10_000)]
    samples: u32,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ZoneStats {
    seed: PitchSeed,
    samples: u32,
    /// Configured strike share as a fraction.
    strike_share: f64,
    strike_fraction: f64,
    cells: Vec<CellStats>,
}

#[derive(Debug, Serialize)]
struct CellStats {
    name: String,
    strike: bool,
    /// Normalized weight as a fraction.
    weight: f64,
    hits: u32,
    fraction: f64,
}

pub(crate) fn run(arg: &ZoneStatsArg) -> anyhow::Result<()> {
    let ZoneStatsArg {
        config,
        seed,
        samples,
        output,
    } = arg;
    ensure!(*samples > 0, "samples must be positive");

    let config = load_config(config.as_deref(), *seed)?;
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let mut grid = config.zone_grid();
    let mut selector = PitchTargetSelector::with_seed(seed, config.jitter);

    let mut hits = [0_u32; CELL_COUNT];
    for _ in 0..*samples {
        let target = selector.select_target(&mut grid);
        hits[target.cell().index()] += 1;
    }

    let total = f64::from(*samples);
    let strikes: u32 = ZoneCellId::all()
        .filter(|id| id.is_strike())
        .map(|id| hits[id.index()])
        .sum();
    let cells = grid
        .cells()
        .iter()
        .map(|cell| {
            let hits = hits[cell.id().index()];
            CellStats {
                name: cell.id().name(),
                strike: cell.is_strike(),
                weight: f64::from(cell.weight()) / 100.0,
                hits,
                fraction: f64::from(hits) / total,
            }
        })
        .collect();

    let stats = ZoneStats {
        seed,
        samples: *samples,
        strike_share: f64::from(grid.strike_weight()) / 100.0,
        strike_fraction: f64::from(strikes) / total,
        cells,
    };
    tracing::info!(
        strike_share = stats.strike_share,
        strike_fraction = stats.strike_fraction,
        "zone sampling finished"
    );
    Output::save_json(&stats, output.as_deref())
}
