use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{PitchCall, Position, TOTAL_WEIGHT, ZoneCellId, ZoneGrid};

/// Seed for deterministic pitch selection.
///
/// A 128-bit seed written as 32 hexadecimal digits (big-endian). The same
/// seed and zone configuration always produce the same pitch sequence.
///
/// # Example
///
/// ```
/// use diamond_engine::{GridGeometry, PitchSeed, PitchTargetSelector, ZoneGrid, ZoneShares};
///
/// let seed: PitchSeed = "0123456789abcdeffedcba9876543210".parse().unwrap();
/// let mut grid = ZoneGrid::new(&GridGeometry::default(), &ZoneShares::default());
///
/// let mut a = PitchTargetSelector::with_seed(seed, 0.6);
/// let mut b = PitchTargetSelector::with_seed(seed, 0.6);
/// assert_eq!(a.select_target(&mut grid), b.select_target(&mut grid));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PitchSeed([u8; 16]);

/// Returned when a string is not a 32-digit hexadecimal seed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidSeed {
    #[display("invalid hex seed: expected 32 characters, got {len}")]
    WrongLength { len: usize },
    #[display("invalid hex seed: {input}")]
    NotHex { input: String },
}

impl PitchSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PitchSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PitchSeed {
    type Err = InvalidSeed;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(InvalidSeed::WrongLength { len: s.len() });
        }
        let not_hex = || InvalidSeed::NotHex {
            input: s.to_owned(),
        };
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(not_hex());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| not_hex())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PitchSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PitchSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PitchSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PitchSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PitchSeed(seed)
    }
}

/// A selected pitch destination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchTarget {
    cell: ZoneCellId,
    call: PitchCall,
    position: Position,
}

impl PitchTarget {
    #[must_use]
    pub fn cell(&self) -> ZoneCellId {
        self.cell
    }

    /// Ruling implied by the selected cell.
    #[must_use]
    pub fn call(&self) -> PitchCall {
        self.call
    }

    /// Centroid of the selected cell plus jitter.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }
}

/// Weighted-random pitch target selection over a [`ZoneGrid`].
///
/// Each draw is a uniform value in `[0, 100)` mapped through the grid's
/// cumulative weights (inverse-CDF sampling). The selected centroid is then
/// offset by up to `jitter` times the cell's half-extent on the x and y axes,
/// so a jittered target never leaves its cell.
#[derive(Debug, Clone)]
pub struct PitchTargetSelector {
    rng: Pcg32,
    jitter: f32,
}

impl PitchTargetSelector {
    /// Creates a selector with a random seed.
    ///
    /// For deterministic selection, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new(jitter: f32) -> Self {
        Self::with_seed(rand::rng().random(), jitter)
    }

    #[must_use]
    pub fn with_seed(seed: PitchSeed, jitter: f32) -> Self {
        let jitter = if jitter.is_finite() {
            jitter.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            rng: Pcg32::from_seed(seed.0),
            jitter,
        }
    }

    #[must_use]
    pub fn jitter(&self) -> f32 {
        self.jitter
    }

    /// Draws a target cell and a jittered position inside it.
    ///
    /// The grid is normalized before every draw, so reconfigurations take
    /// effect on the next pitch.
    pub fn select_target(&mut self, grid: &mut ZoneGrid) -> PitchTarget {
        grid.normalize_weights();
        let draw = self.rng.random_range(0.0..TOTAL_WEIGHT);
        let cell = Self::cell_for_draw(grid, draw);

        let extent = grid.cell_size();
        let dx = self.rng.random_range(-1.0_f32..=1.0) * self.jitter * extent.width / 2.0;
        let dy = self.rng.random_range(-1.0_f32..=1.0) * self.jitter * extent.height / 2.0;
        let position = grid.cell(cell).centroid().translated(dx, dy, 0.0);

        let call = if cell.is_strike() {
            PitchCall::Strike
        } else {
            PitchCall::Ball
        };
        tracing::debug!(%cell, ?call, draw, "pitch target selected");
        PitchTarget {
            cell,
            call,
            position,
        }
    }

    /// Maps a draw in `[0, TOTAL_WEIGHT)` to the first cell whose cumulative weight reaches it.
    ///
    /// Zero-weight cells are never selected. A draw beyond the accumulated
    /// total (floating-point rounding) yields the last selectable cell.
    #[must_use]
    pub fn cell_for_draw(grid: &ZoneGrid, draw: f32) -> ZoneCellId {
        let mut cumulative = 0.0;
        let mut last = None;
        for cell in grid.cells().iter().filter(|c| c.weight() > 0.0) {
            cumulative += cell.weight();
            last = Some(cell.id());
            if cumulative >= draw {
                return cell.id();
            }
        }
        last.unwrap_or(ZoneCellId::CENTER)
    }

    /// Rules an externally reported landing position.
    #[must_use]
    pub fn classify(grid: &ZoneGrid, position: Position) -> PitchCall {
        if grid.is_strike_position(position) {
            PitchCall::Strike
        } else {
            PitchCall::Ball
        }
    }
}
