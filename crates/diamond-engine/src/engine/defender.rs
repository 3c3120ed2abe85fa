use serde::{Deserialize, Serialize};

use crate::{NoCandidatesAvailable, core::Position};

/// Fielding capability of a defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant)]
pub enum DefenderRole {
    Catcher,
    Infielder,
    Outfielder,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Defender {
    pub role: DefenderRole,
    pub position: Position,
}

impl Defender {
    #[must_use]
    pub const fn new(role: DefenderRole, position: Position) -> Self {
        Self { role, position }
    }
}

/// Index and distance of the candidate closest to `ball`.
///
/// Ties go to the lowest index.
///
/// # Example
///
/// ```
/// use diamond_engine::{Position, find_nearest};
///
/// let ball = Position::ORIGIN;
/// let candidates = [
///     Position::new(5.0, 0.0, 0.0),
///     Position::new(0.0, 2.0, 0.0),
///     Position::new(0.0, 0.0, 8.0),
/// ];
/// assert_eq!(find_nearest(ball, &candidates), Ok((1, 2.0)));
/// ```
pub fn find_nearest(
    ball: Position,
    candidates: &[Position],
) -> Result<(usize, f32), NoCandidatesAvailable> {
    nearest_of(ball, candidates.iter().copied().enumerate())
}

/// Like [`find_nearest`], restricted to defenders with `role` when given.
///
/// The returned index points into the full `defenders` slice.
pub fn find_nearest_defender(
    ball: Position,
    defenders: &[Defender],
    role: Option<DefenderRole>,
) -> Result<(usize, f32), NoCandidatesAvailable> {
    let candidates = defenders
        .iter()
        .enumerate()
        .filter(|(_, d)| role.is_none_or(|role| d.role == role))
        .map(|(i, d)| (i, d.position));
    nearest_of(ball, candidates)
}

fn nearest_of<I>(ball: Position, candidates: I) -> Result<(usize, f32), NoCandidatesAvailable>
where
    I: IntoIterator<Item = (usize, Position)>,
{
    let mut best: Option<(usize, f32)> = None;
    for (index, position) in candidates {
        let distance = ball.distance(position);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }
    let (index, distance) = best.ok_or(NoCandidatesAvailable)?;
    tracing::trace!(index, distance, "nearest defender");
    Ok((index, distance))
}
