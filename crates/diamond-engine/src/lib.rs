pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Returned by count mutations once the final half-inning has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("game is over; count can no longer change")]
pub struct GameOverError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no defender candidates available")]
pub struct NoCandidatesAvailable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("team index must be 0 (away) or 1 (home), got {index}")]
pub struct InvalidTeamIndex {
    pub index: usize,
}

/// Precondition failures reported by [`BaseRunnerLedger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LedgerError {
    #[display("{slot} is already occupied")]
    SlotOccupied { slot: BaseSlot },
    #[display("no runner at {slot}")]
    SlotEmpty { slot: BaseSlot },
    #[display("runner {runner} is already on the bases")]
    DuplicateRunner { runner: RunnerId },
    #[display("runner {runner} is not on the bases")]
    RunnerNotFound { runner: RunnerId },
    #[display("runner {runner} cannot move from {from} to {target}")]
    NotForward {
        runner: RunnerId,
        from: BaseSlot,
        target: BaseSlot,
    },
}

/// Errors reported by [`GameSession`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlayError {
    #[display("game is over")]
    GameOver,
    #[display("a ball is in play; pitching is suspended")]
    PlayInProgress,
    #[display("no ball is in play")]
    NoPlayInProgress,
    #[display("base runner ledger rejected the play")]
    Ledger(LedgerError),
}

impl From<LedgerError> for PlayError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

impl From<GameOverError> for PlayError {
    fn from(_: GameOverError) -> Self {
        Self::GameOver
    }
}
