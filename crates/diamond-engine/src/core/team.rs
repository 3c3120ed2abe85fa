use serde::{Deserialize, Serialize};

use crate::InvalidTeamIndex;

/// One side of the game.
///
/// The away team bats in even half-innings (the top of each inning) and the
/// home team in odd ones, so `Team::batting(half_inning)` is `half_inning % 2`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum Team {
    #[display("away")]
    Away = 0,
    #[display("home")]
    Home = 1,
}

impl Team {
    pub const ALL: [Self; 2] = [Self::Away, Self::Home];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Team at bat during `half_inning`.
    #[must_use]
    pub const fn batting(half_inning: u8) -> Self {
        if half_inning % 2 == 0 {
            Self::Away
        } else {
            Self::Home
        }
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Away => Self::Home,
            Self::Home => Self::Away,
        }
    }
}

impl TryFrom<usize> for Team {
    type Error = InvalidTeamIndex;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Self::Away),
            1 => Ok(Self::Home),
            _ => Err(InvalidTeamIndex { index }),
        }
    }
}
