use serde::Serialize;

use crate::{
    PlayError,
    core::{
        AdvanceReport, BaseRunnerLedger, BaseSlot, BallOutcome, Count, CountTracker, EventBus,
        ExternalEvent, GameEvent, OutOutcome, PitchCall, Position, PutOutOutcome, Runner, RunnerId,
        StandingRunnerRule, StrikeOutcome, Team, ZoneGrid, ZoneShares,
    },
};

use super::{
    config::GameConfig,
    pitch_target::{PitchSeed, PitchTarget, PitchTargetSelector},
    score_board::ScoreBoard,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum SessionState {
    /// Waiting for the next pitch.
    Pitching,
    /// A ball was put in play; counting is suspended until the play ends.
    BallInPlay,
    GameOver,
}

/// What a single pitch did to the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PitchOutcome {
    Ball,
    Walk { runs_scored: usize },
    Strike,
    Strikeout { out: OutOutcome },
}

/// Result of a fielder returning the ball to a base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum FieldingOutcome {
    Safe,
    Out { runner: RunnerId, out: OutOutcome },
}

/// Running totals of a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub pitches: u32,
    pub strikes: u32,
    pub balls: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub balls_in_play: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamSnapshot {
    pub name: String,
    pub score: u32,
    pub batting_order: u8,
}

/// Serializable view of a session for display or persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub count: Count,
    pub inning: u8,
    pub batting_team: Team,
    /// Occupant of the at-bat slot, first, second and third base.
    pub occupancy: [Option<RunnerId>; 4],
    pub away: TeamSnapshot,
    pub home: TeamSnapshot,
    pub state: SessionState,
    pub game_over: bool,
}

/// One game in progress.
///
/// The session owns every core component and is the only thing that
/// mutates them. External layers report what happened through the methods
/// below (or [`Self::handle`]) and observe the result through
/// [`Self::events_mut`].
///
/// A plate appearance ends on a walk, a strikeout, or when a play ends with
/// the batter no longer in the batter's box. The batting team's order then
/// advances and the next batter steps in.
#[derive(Debug)]
pub struct GameSession {
    tracker: CountTracker,
    ledger: BaseRunnerLedger,
    score_board: ScoreBoard,
    grid: ZoneGrid,
    selector: PitchTargetSelector,
    events: EventBus,
    state: SessionState,
    standing_runner_rule: StandingRunnerRule,
    teams: [String; 2],
    next_runner_id: u32,
    stats: SessionStats,
}

impl GameSession {
    /// Creates a session from `config`.
    ///
    /// Uses `config.seed` when present and a random seed otherwise. The
    /// configuration is not validated here; see [`GameConfig::validate`].
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let selector = match config.seed {
            Some(seed) => PitchTargetSelector::with_seed(seed, config.jitter),
            None => PitchTargetSelector::new(config.jitter),
        };
        Self::with_selector(config, selector)
    }

    /// Like [`Self::new`], but with a specific seed for deterministic pitch selection.
    #[must_use]
    pub fn with_seed(config: &GameConfig, seed: PitchSeed) -> Self {
        Self::with_selector(config, PitchTargetSelector::with_seed(seed, config.jitter))
    }

    fn with_selector(config: &GameConfig, selector: PitchTargetSelector) -> Self {
        let mut this = Self {
            tracker: CountTracker::new(config.limits),
            ledger: BaseRunnerLedger::new(),
            score_board: ScoreBoard::new(),
            grid: config.zone_grid(),
            selector,
            events: EventBus::new(),
            state: SessionState::Pitching,
            standing_runner_rule: config.standing_runner_rule,
            teams: config.teams.clone(),
            next_runner_id: 0,
            stats: SessionStats::default(),
        };
        this.seat_batter();
        this
    }

    #[must_use]
    pub fn count(&self) -> Count {
        self.tracker.count()
    }

    #[must_use]
    pub fn ledger(&self) -> &BaseRunnerLedger {
        &self.ledger
    }

    #[must_use]
    pub fn score_board(&self) -> &ScoreBoard {
        &self.score_board
    }

    #[must_use]
    pub fn zone_grid(&self) -> &ZoneGrid {
        &self.grid
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[must_use]
    pub fn team_name(&self, team: Team) -> &str {
        &self.teams[team.index()]
    }

    #[must_use]
    pub fn standing_runner_rule(&self) -> StandingRunnerRule {
        self.standing_runner_rule
    }

    /// Registry to subscribe presentation handlers on.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// The runner currently in the batter's box.
    #[must_use]
    pub fn batter(&self) -> Option<RunnerId> {
        self.ledger.occupant(BaseSlot::AtBat).map(Runner::id)
    }

    /// Replaces the zone weights. Not allowed while a ball is in play.
    pub fn reconfigure_zone(&mut self, shares: &ZoneShares) -> Result<(), PlayError> {
        self.ensure_pitching()?;
        self.grid.reconfigure(shares);
        self.grid.normalize_weights();
        Ok(())
    }

    /// Picks a target with the pitch target selector and rules on it.
    pub fn throw_pitch(&mut self) -> Result<(PitchTarget, PitchOutcome), PlayError> {
        self.ensure_pitching()?;
        let target = self.selector.select_target(&mut self.grid);
        let outcome = self.apply_call(target.call())?;
        Ok((target, outcome))
    }

    /// Rules on a landing position reported by an external physics layer.
    pub fn pitch_landed(&mut self, position: Position) -> Result<PitchOutcome, PlayError> {
        self.ensure_pitching()?;
        let call = PitchTargetSelector::classify(&self.grid, position);
        self.apply_call(call)
    }

    fn apply_call(&mut self, call: PitchCall) -> Result<PitchOutcome, PlayError> {
        let team = self.count().batting_team();
        self.stats.pitches += 1;
        match call {
            PitchCall::Ball => {
                self.stats.balls += 1;
                match self.tracker.increment_ball(&mut self.events)? {
                    BallOutcome::Ball => Ok(PitchOutcome::Ball),
                    BallOutcome::Walk => {
                        self.stats.walks += 1;
                        let report = self.ledger.force_advance(BaseSlot::AtBat)?;
                        self.ledger.clear_movement_intents();
                        self.credit_runs(team, &report);
                        self.finish_plate_appearance(team);
                        Ok(PitchOutcome::Walk {
                            runs_scored: report.runs_scored(),
                        })
                    }
                }
            }
            PitchCall::Strike => {
                self.stats.strikes += 1;
                match self.tracker.increment_strike(&mut self.events)? {
                    StrikeOutcome::Strike => Ok(PitchOutcome::Strike),
                    StrikeOutcome::Strikeout(out) => {
                        self.stats.strikeouts += 1;
                        self.ledger.remove_batter();
                        self.resolve_out(out);
                        self.finish_plate_appearance(team);
                        Ok(PitchOutcome::Strikeout { out })
                    }
                }
            }
        }
    }

    /// The batter hit the ball. Counting is suspended until [`Self::end_play`].
    pub fn contact_made(&mut self) -> Result<(), PlayError> {
        self.ensure_pitching()?;
        self.ledger.set_movement_intent(BaseSlot::AtBat, true)?;
        self.stats.balls_in_play += 1;
        self.state = SessionState::BallInPlay;
        tracing::debug!(batter = ?self.batter(), "ball in play");
        Ok(())
    }

    /// A fielder returned the ball to `slot` during a play.
    ///
    /// Whether a runner standing on `slot` can be put out is decided by the
    /// configured [`StandingRunnerRule`]. An out that retires the side (or
    /// ends the game) also ends the play.
    pub fn ball_in_play_out(&mut self, slot: BaseSlot) -> Result<FieldingOutcome, PlayError> {
        self.ensure_in_play()?;
        let team = self.count().batting_team();
        let runner = match self.ledger.put_out(slot, self.standing_runner_rule)? {
            PutOutOutcome::Safe => return Ok(FieldingOutcome::Safe),
            PutOutOutcome::Out(runner) => runner.id(),
        };
        let out = self.tracker.increment_out(&mut self.events)?;
        tracing::debug!(%runner, %slot, "runner put out");
        if !out.is_out() {
            self.resolve_out(out);
            self.finish_plate_appearance(team);
        }
        Ok(FieldingOutcome::Out { runner, out })
    }

    /// Moves `runner` to `target` during a play, forcing runners ahead of it.
    ///
    /// Every runner that moves can be put out until the play ends.
    pub fn runner_advance(
        &mut self,
        runner: RunnerId,
        target: BaseSlot,
    ) -> Result<AdvanceReport, PlayError> {
        self.ensure_in_play()?;
        let team = self.count().batting_team();
        let report = self.ledger.advance_runner(runner, target)?;
        self.credit_runs(team, &report);
        Ok(report)
    }

    /// A runner on `slot` starts (`advancing`) or stops trying for the next base.
    pub fn runner_intent(&mut self, slot: BaseSlot, advancing: bool) -> Result<(), PlayError> {
        self.ensure_in_play()?;
        self.ledger.set_movement_intent(slot, advancing)?;
        tracing::debug!(%slot, advancing, "runner intent changed");
        Ok(())
    }

    /// Force-advances the runner at `slot` at an operator's request.
    ///
    /// Advancing the batter outside a play completes the plate appearance.
    pub fn manual_advance_request(&mut self, slot: BaseSlot) -> Result<AdvanceReport, PlayError> {
        self.ensure_live()?;
        let team = self.count().batting_team();
        let report = self.ledger.force_advance(slot)?;
        self.credit_runs(team, &report);
        if self.state.is_pitching() {
            self.ledger.clear_movement_intents();
            if !self.ledger.is_occupied(BaseSlot::AtBat) {
                self.finish_plate_appearance(team);
            }
        }
        Ok(report)
    }

    /// Ends the current play and resumes pitching.
    pub fn end_play(&mut self) -> Result<(), PlayError> {
        self.ensure_in_play()?;
        let team = self.count().batting_team();
        self.ledger.clear_movement_intents();
        self.state = SessionState::Pitching;
        if !self.ledger.is_occupied(BaseSlot::AtBat) {
            self.finish_plate_appearance(team);
        }
        Ok(())
    }

    /// Dispatches an inbound event to the matching operation.
    pub fn handle(&mut self, event: ExternalEvent) -> Result<(), PlayError> {
        match event {
            ExternalEvent::PitchLanded(position) => self.pitch_landed(position).map(drop),
            ExternalEvent::ContactMade => self.contact_made(),
            ExternalEvent::BallInPlayOut(slot) => self.ball_in_play_out(slot).map(drop),
            ExternalEvent::RunnerAdvance { runner, target } => {
                self.runner_advance(runner, target).map(drop)
            }
            ExternalEvent::RunnerIntent { slot, advancing } => self.runner_intent(slot, advancing),
            ExternalEvent::ManualAdvanceRequest(slot) => {
                self.manual_advance_request(slot).map(drop)
            }
            ExternalEvent::PlayEnded => self.end_play(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let count = self.count();
        let team_snapshot = |team: Team| TeamSnapshot {
            name: self.team_name(team).to_owned(),
            score: self.score_board.score(team),
            batting_order: self.score_board.batting_order(team),
        };
        GameSnapshot {
            count,
            inning: count.inning(),
            batting_team: count.batting_team(),
            occupancy: self.ledger.occupancy(),
            away: team_snapshot(Team::Away),
            home: team_snapshot(Team::Home),
            state: self.state,
            game_over: self.is_game_over(),
        }
    }

    fn ensure_live(&self) -> Result<(), PlayError> {
        if self.state.is_game_over() {
            return Err(PlayError::GameOver);
        }
        Ok(())
    }

    fn ensure_pitching(&self) -> Result<(), PlayError> {
        match self.state {
            SessionState::Pitching => Ok(()),
            SessionState::BallInPlay => Err(PlayError::PlayInProgress),
            SessionState::GameOver => Err(PlayError::GameOver),
        }
    }

    fn ensure_in_play(&self) -> Result<(), PlayError> {
        match self.state {
            SessionState::BallInPlay => Ok(()),
            SessionState::Pitching => Err(PlayError::NoPlayInProgress),
            SessionState::GameOver => Err(PlayError::GameOver),
        }
    }

    fn credit_runs(&mut self, team: Team, report: &AdvanceReport) {
        for runner in report.scored() {
            let new_score = self.score_board.on_run_scored(team);
            tracing::debug!(%team, runner = %runner.id(), new_score, "run scored");
            self.events.publish(GameEvent::RunScored { team, new_score });
        }
    }

    /// Clears the bases after the side is retired or the game ends.
    fn resolve_out(&mut self, out: OutOutcome) {
        match out {
            OutOutcome::Out => {}
            OutOutcome::SideRetired => {
                let discarded = self.ledger.clear_all();
                tracing::debug!(discarded, "bases cleared");
                self.state = SessionState::Pitching;
            }
            OutOutcome::GameOver => {
                self.ledger.clear_all();
                self.state = SessionState::GameOver;
            }
        }
    }

    fn finish_plate_appearance(&mut self, team: Team) {
        if self.state.is_game_over() {
            return;
        }
        let index = self.score_board.advance_batting_order(team);
        self.events
            .publish(GameEvent::BattingOrderChanged { team, index });
        if self.tracker.reset_plate_appearance(&mut self.events).is_ok() {
            self.seat_batter();
        }
    }

    fn seat_batter(&mut self) {
        if self.ledger.is_occupied(BaseSlot::AtBat) {
            return;
        }
        let id = RunnerId(self.next_runner_id);
        self.next_runner_id += 1;
        if let Err(err) = self.ledger.add_runner(Runner::new(id)) {
            tracing::warn!(%err, "could not seat the next batter");
        }
    }
}
