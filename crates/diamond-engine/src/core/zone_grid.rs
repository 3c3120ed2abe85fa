use std::fmt;

use serde::{Deserialize, Serialize};

use super::position::{BoundingBox, Extent, Position};

/// Number of rows (and columns) of the zone grid.
pub const GRID_SIZE: usize = 5;
/// Total number of cells in the zone grid.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;
/// Sum of all cell weights after normalization.
pub const TOTAL_WEIGHT: f32 = 100.0;

const STRIKE_EDGE_CELLS: f32 = 8.0;
const BALL_BAND_CELLS: f32 = 8.0;
#[expect(clippy::cast_precision_loss)]
const UNIFORM_WEIGHT: f32 = TOTAL_WEIGHT / CELL_COUNT as f32;

/// Strike/ball ruling for a pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant)]
pub enum PitchCall {
    Strike,
    Ball,
}

/// Row/column address of a zone cell.
///
/// Row 0 is the top of the grid and column 0 is the catcher's left. The
/// center 3×3 block (rows and columns 1 to 3) is the strike region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneCellId {
    row: u8,
    col: u8,
}

impl fmt::Display for ZoneCellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl ZoneCellId {
    pub const CENTER: Self = Self { row: 2, col: 2 };

    #[must_use]
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return None;
        }
        Some(Self {
            row: u8::try_from(row).ok()?,
            col: u8::try_from(col).ok()?,
        })
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::new(index / GRID_SIZE, index % GRID_SIZE)
    }

    /// All cells in row-major order, which is also the selection scan order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..CELL_COUNT).filter_map(Self::from_index)
    }

    #[must_use]
    pub const fn row(self) -> usize {
        self.row as usize
    }

    #[must_use]
    pub const fn col(self) -> usize {
        self.col as usize
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.row() * GRID_SIZE + self.col()
    }

    #[must_use]
    pub const fn is_strike(self) -> bool {
        matches!(self.row, 1..=3) && matches!(self.col, 1..=3)
    }

    #[must_use]
    pub const fn region(self) -> ZoneRegion {
        match (self.row, self.col) {
            (2, 2) => ZoneRegion::Center,
            (1..=3, 1..=3) => ZoneRegion::StrikeEdge,
            // grid corners and the cells straight above/below/beside the center
            (0 | 4, 0 | 4) | (2, _) | (_, 2) => ZoneRegion::OuterBall,
            _ => ZoneRegion::InnerBall,
        }
    }

    /// Human-readable cell name, e.g. `MiddleCenter` or `Ball_00_04`.
    #[must_use]
    pub fn name(self) -> String {
        const ROW_NAMES: [&str; 3] = ["Top", "Middle", "Bottom"];
        const COL_NAMES: [&str; 3] = ["Left", "Center", "Right"];
        if self.is_strike() {
            format!(
                "{}{}",
                ROW_NAMES[self.row() - 1],
                COL_NAMES[self.col() - 1]
            )
        } else {
            format!("Ball_{:02}_{:02}", self.row, self.col)
        }
    }
}

/// Weight class of a zone cell.
///
/// | region       | cells | share of mass                       |
/// |--------------|-------|-------------------------------------|
/// | `Center`     | 1     | `strike × center`                   |
/// | `StrikeEdge` | 8     | `strike × (1 - center)`             |
/// | `InnerBall`  | 8     | `ball × inner / (inner + outer)`    |
/// | `OuterBall`  | 8     | `ball × outer / (inner + outer)`    |
///
/// `InnerBall` cells hug the corners of the strike region; `OuterBall` cells
/// are the four grid corners and the four cells in line with the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneRegion {
    Center,
    StrikeEdge,
    InnerBall,
    OuterBall,
}

/// Probability shares used to derive the per-cell weights.
///
/// All shares are percentages in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneShares {
    /// Total mass assigned to the 9 strike cells.
    pub strike_share: f32,
    /// Part of `strike_share` given to the center cell.
    pub center_share: f32,
    /// Relative part of the ball mass given to the inner ball band.
    pub inner_ball_share: f32,
    /// Relative part of the ball mass given to the outer ball band.
    pub outer_ball_share: f32,
}

impl Default for ZoneShares {
    fn default() -> Self {
        Self {
            strike_share: 65.0,
            center_share: 30.0,
            inner_ball_share: 50.0,
            outer_ball_share: 50.0,
        }
    }
}

impl ZoneShares {
    /// Unnormalized weight of a single cell in `region`.
    #[must_use]
    pub fn cell_weight(&self, region: ZoneRegion) -> f32 {
        let strike = clamp_share(self.strike_share);
        let center = clamp_share(self.center_share) / 100.0;
        let ball = TOTAL_WEIGHT - strike;
        let inner = non_negative(self.inner_ball_share);
        let outer = non_negative(self.outer_ball_share);
        let inner_fraction = if inner + outer > 0.0 {
            inner / (inner + outer)
        } else {
            0.5
        };
        match region {
            ZoneRegion::Center => strike * center,
            ZoneRegion::StrikeEdge => strike * (1.0 - center) / STRIKE_EDGE_CELLS,
            ZoneRegion::InnerBall => ball * inner_fraction / BALL_BAND_CELLS,
            ZoneRegion::OuterBall => ball * (1.0 - inner_fraction) / BALL_BAND_CELLS,
        }
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

fn clamp_share(value: f32) -> f32 {
    non_negative(value).min(100.0)
}

/// Physical layout used to place cell centroids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridGeometry {
    /// Centroid of the center cell.
    pub center: Position,
    /// Box extent of every cell.
    pub cell_size: Extent,
    /// Distance between neighbouring centroids.
    pub spacing: f32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            center: Position::new(0.0, 0.5, -14.0),
            cell_size: Extent::cube(0.3),
            spacing: 0.3,
        }
    }
}

impl GridGeometry {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn centroid(&self, id: ZoneCellId) -> Position {
        let dx = (id.col() as f32 - 2.0) * self.spacing;
        let dy = (2.0 - id.row() as f32) * self.spacing;
        self.center.translated(dx, dy, 0.0)
    }
}

/// A single cell of the zone grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneCell {
    id: ZoneCellId,
    centroid: Position,
    weight: f32,
}

impl ZoneCell {
    #[must_use]
    pub fn id(&self) -> ZoneCellId {
        self.id
    }

    #[must_use]
    pub fn is_strike(&self) -> bool {
        self.id.is_strike()
    }

    #[must_use]
    pub fn centroid(&self) -> Position {
        self.centroid
    }

    #[must_use]
    pub fn weight(&self) -> f32 {
        self.weight
    }
}

/// Result of [`ZoneGrid::normalize_weights`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum WeightNormalization {
    /// Weights were rescaled to sum to [`TOTAL_WEIGHT`].
    Rescaled,
    /// Weights summed to zero; every cell now holds the uniform weight.
    UniformFallback,
}

/// The 5×5 probability model of the pitch target area.
///
/// # Example
///
/// ```
/// use diamond_engine::{GridGeometry, ZoneCellId, ZoneGrid, ZoneShares};
///
/// let shares = ZoneShares {
///     strike_share: 65.0,
///     center_share: 20.0,
///     ..ZoneShares::default()
/// };
/// let grid = ZoneGrid::new(&GridGeometry::default(), &shares);
///
/// assert!((grid.cell(ZoneCellId::CENTER).weight() - 13.0).abs() < 1e-4);
/// assert!((grid.strike_weight() - 65.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct ZoneGrid {
    cells: [ZoneCell; CELL_COUNT],
    cell_size: Extent,
}

impl ZoneGrid {
    /// Builds a grid whose centroids follow `geometry`.
    #[must_use]
    pub fn new(geometry: &GridGeometry, shares: &ZoneShares) -> Self {
        let centroids = std::array::from_fn(|i| {
            ZoneCellId::from_index(i).map_or(geometry.center, |id| geometry.centroid(id))
        });
        Self::from_centroids(centroids, geometry.cell_size, shares)
    }

    /// Builds a grid from externally supplied centroids, in row-major order.
    #[must_use]
    pub fn from_centroids(
        centroids: [Position; CELL_COUNT],
        cell_size: Extent,
        shares: &ZoneShares,
    ) -> Self {
        let cells = std::array::from_fn(|i| {
            let id = ZoneCellId::from_index(i).unwrap_or(ZoneCellId::CENTER);
            ZoneCell {
                id,
                centroid: centroids[i],
                weight: shares.cell_weight(id.region()),
            }
        });
        Self { cells, cell_size }
    }

    #[must_use]
    pub fn cells(&self) -> &[ZoneCell; CELL_COUNT] {
        &self.cells
    }

    #[must_use]
    pub fn cell(&self, id: ZoneCellId) -> &ZoneCell {
        &self.cells[id.index()]
    }

    #[must_use]
    pub fn cell_size(&self) -> Extent {
        self.cell_size
    }

    #[must_use]
    pub fn cell_bounds(&self, id: ZoneCellId) -> BoundingBox {
        BoundingBox::from_center(self.cell(id).centroid, self.cell_size)
    }

    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.cells.iter().map(|c| c.weight).sum()
    }

    #[must_use]
    pub fn strike_weight(&self) -> f32 {
        self.cells
            .iter()
            .filter(|c| c.is_strike())
            .map(|c| c.weight)
            .sum()
    }

    /// Re-derives every weight from `shares`.
    ///
    /// Callers must normalize before the next selection; the pitch target
    /// selector does so on every draw.
    pub fn reconfigure(&mut self, shares: &ZoneShares) {
        for cell in &mut self.cells {
            cell.weight = shares.cell_weight(cell.id.region());
        }
    }

    /// Overrides the weight of a single cell. Negative and non-finite values are stored as zero.
    pub fn set_weight(&mut self, id: ZoneCellId, weight: f32) {
        self.cells[id.index()].weight = non_negative(weight);
    }

    /// Rescales all weights so that they sum to [`TOTAL_WEIGHT`].
    ///
    /// A zero (or non-finite) sum is recovered by assigning every cell the
    /// uniform weight of `100 / 25`.
    pub fn normalize_weights(&mut self) -> WeightNormalization {
        let total = self.total_weight();
        if !total.is_finite() || total <= 0.0 {
            tracing::warn!(total, "zone weights sum to zero; using uniform weights");
            for cell in &mut self.cells {
                cell.weight = UNIFORM_WEIGHT;
            }
            return WeightNormalization::UniformFallback;
        }
        let factor = TOTAL_WEIGHT / total;
        for cell in &mut self.cells {
            cell.weight *= factor;
        }
        WeightNormalization::Rescaled
    }

    /// First cell (in scan order) whose box contains `position`.
    #[must_use]
    pub fn cell_at(&self, position: Position) -> Option<ZoneCellId> {
        ZoneCellId::all().find(|id| self.cell_bounds(*id).contains(position))
    }

    /// Whether `position` lies inside any strike cell.
    #[must_use]
    pub fn is_strike_position(&self, position: Position) -> bool {
        ZoneCellId::all()
            .filter(|id| id.is_strike())
            .any(|id| self.cell_bounds(id).contains(position))
    }
}
