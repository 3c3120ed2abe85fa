//! Game engine logic and state management.
//!
//! This module wires the core bookkeeping into a playable game:
//!
//! - [`GameSession`] - Owns one of each core component and routes external events
//! - [`PitchTargetSelector`] - Weighted-random pitch cell selection with in-cell jitter
//! - [`PitchSeed`] - Seed for deterministic pitch selection
//! - [`ScoreBoard`] - Per-team runs and batting-order cursors
//! - [`GameConfig`] - Setup-time configuration surface
//! - [`find_nearest`] / [`find_nearest_defender`] - Reactive defender selection
//!
//! # Game Flow
//!
//! 1. Build a [`GameSession`] from a [`GameConfig`]; the first batter steps in
//! 2. Throw pitches, or report landing positions from an external physics layer
//! 3. On contact, report the play's result (outs and runner advances)
//! 4. End the play and resume pitching
//! 5. Repeat until the final half-inning ends
//!
//! # Example
//!
//! ```
//! use diamond_engine::{GameConfig, GameSession, PitchCall, PitchOutcome};
//!
//! let mut session = GameSession::new(&GameConfig::default());
//!
//! while !session.is_game_over() {
//!     let (target, outcome) = session.throw_pitch().unwrap();
//!     let expected = match outcome {
//!         PitchOutcome::Ball | PitchOutcome::Walk { .. } => PitchCall::Ball,
//!         PitchOutcome::Strike | PitchOutcome::Strikeout { .. } => PitchCall::Strike,
//!     };
//!     assert_eq!(target.call(), expected);
//! }
//!
//! assert!(session.snapshot().game_over);
//! ```

pub use self::{config::*, defender::*, game_session::*, pitch_target::*, score_board::*};

mod config;
mod defender;
mod game_session;
mod pitch_target;
mod score_board;
