use serde::Serialize;

use crate::core::Team;

/// Number of batters in a batting order.
pub const BATTING_ORDER_LEN: u8 = 9;

/// Running total and batting-order cursor of one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamScore {
    score: u32,
    batting_order: u8,
}

impl TeamScore {
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Zero-based index of the team's current batter, in `0..BATTING_ORDER_LEN`.
    #[must_use]
    pub const fn batting_order(&self) -> u8 {
        self.batting_order
    }
}

/// Scores and batting orders of both teams.
///
/// Scores only increase and persist for the whole game.
///
/// # Example
///
/// ```
/// use diamond_engine::{ScoreBoard, Team};
///
/// let mut board = ScoreBoard::new();
/// board.on_run_scored(Team::Home);
///
/// assert_eq!(board.score(Team::Home), 1);
/// assert_eq!(board.score(Team::Away), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    teams: [TeamScore; 2],
}

impl ScoreBoard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            teams: [TeamScore {
                score: 0,
                batting_order: 0,
            }; 2],
        }
    }

    /// Credits one run to `team`. Returns the new score.
    pub fn on_run_scored(&mut self, team: Team) -> u32 {
        let entry = &mut self.teams[team.index()];
        entry.score += 1;
        entry.score
    }

    #[must_use]
    pub const fn score(&self, team: Team) -> u32 {
        self.teams[team.index()].score
    }

    #[must_use]
    pub const fn batting_order(&self, team: Team) -> u8 {
        self.teams[team.index()].batting_order
    }

    #[must_use]
    pub const fn team(&self, team: Team) -> &TeamScore {
        &self.teams[team.index()]
    }

    /// Moves `team` to its next batter, wrapping after the ninth. Returns the new index.
    pub fn advance_batting_order(&mut self, team: Team) -> u8 {
        let entry = &mut self.teams[team.index()];
        entry.batting_order = (entry.batting_order + 1) % BATTING_ORDER_LEN;
        entry.batting_order
    }

    /// Team with more runs, or `None` when tied.
    #[must_use]
    pub fn leader(&self) -> Option<Team> {
        let away = self.score(Team::Away);
        let home = self.score(Team::Home);
        match away.cmp(&home) {
            std::cmp::Ordering::Greater => Some(Team::Away),
            std::cmp::Ordering::Less => Some(Team::Home),
            std::cmp::Ordering::Equal => None,
        }
    }
}
