use serde::{Deserialize, Serialize};

use crate::GameOverError;

use super::{
    event::{EventBus, GameEvent},
    team::Team,
};

/// Rollover thresholds of the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountLimits {
    pub max_balls: u8,
    pub max_strikes: u8,
    pub max_outs: u8,
    pub max_half_innings: u8,
}

impl Default for CountLimits {
    fn default() -> Self {
        Self {
            max_balls: 4,
            max_strikes: 3,
            max_outs: 3,
            max_half_innings: 18,
        }
    }
}

/// Balls, strikes, outs, and the current half-inning.
///
/// Every field stays strictly below its limit: reaching a limit rolls the
/// field back to zero within the same operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Count {
    balls: u8,
    strikes: u8,
    outs: u8,
    half_inning: u8,
}

impl Count {
    #[must_use]
    pub const fn balls(&self) -> u8 {
        self.balls
    }

    #[must_use]
    pub const fn strikes(&self) -> u8 {
        self.strikes
    }

    #[must_use]
    pub const fn outs(&self) -> u8 {
        self.outs
    }

    #[must_use]
    pub const fn half_inning(&self) -> u8 {
        self.half_inning
    }

    /// One-based inning number (both halves of the first inning are inning 1).
    #[must_use]
    pub const fn inning(&self) -> u8 {
        self.half_inning / 2 + 1
    }

    #[must_use]
    pub const fn batting_team(&self) -> Team {
        Team::batting(self.half_inning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BallOutcome {
    Ball,
    /// Fourth ball: the batter is awarded first base.
    Walk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum StrikeOutcome {
    Strike,
    /// Third strike: the batter is out.
    Strikeout(OutOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum OutOutcome {
    Out,
    /// Third out: the next half-inning has begun and the bases must be cleared.
    SideRetired,
    /// Third out of the final half-inning.
    GameOver,
}

/// State machine for the count.
///
/// All changes are published on the [`EventBus`] passed to each operation.
/// The tracker never touches base runners; callers react to
/// [`BallOutcome::Walk`] and [`OutOutcome::SideRetired`].
///
/// # Example
///
/// ```
/// use diamond_engine::{BallOutcome, CountLimits, CountTracker, EventBus};
///
/// let mut events = EventBus::new();
/// let mut tracker = CountTracker::new(CountLimits::default());
///
/// for _ in 0..3 {
///     assert_eq!(tracker.increment_ball(&mut events), Ok(BallOutcome::Ball));
/// }
/// assert_eq!(tracker.increment_ball(&mut events), Ok(BallOutcome::Walk));
/// assert_eq!(tracker.count().balls(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct CountTracker {
    count: Count,
    limits: CountLimits,
    game_over: bool,
}

impl CountTracker {
    #[must_use]
    pub fn new(limits: CountLimits) -> Self {
        Self {
            count: Count::default(),
            limits,
            game_over: false,
        }
    }

    #[must_use]
    pub fn count(&self) -> Count {
        self.count
    }

    #[must_use]
    pub fn limits(&self) -> &CountLimits {
        &self.limits
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn ensure_live(&self) -> Result<(), GameOverError> {
        if self.game_over {
            Err(GameOverError)
        } else {
            Ok(())
        }
    }

    pub fn increment_ball(&mut self, events: &mut EventBus) -> Result<BallOutcome, GameOverError> {
        self.ensure_live()?;
        self.count.balls += 1;
        let outcome = if self.count.balls >= self.limits.max_balls {
            self.count.balls = 0;
            tracing::debug!(half_inning = self.count.half_inning, "walk");
            BallOutcome::Walk
        } else {
            BallOutcome::Ball
        };
        events.publish(GameEvent::BallCountChanged(self.count.balls));
        Ok(outcome)
    }

    pub fn increment_strike(
        &mut self,
        events: &mut EventBus,
    ) -> Result<StrikeOutcome, GameOverError> {
        self.ensure_live()?;
        self.count.strikes += 1;
        if self.count.strikes < self.limits.max_strikes {
            events.publish(GameEvent::StrikeCountChanged(self.count.strikes));
            return Ok(StrikeOutcome::Strike);
        }
        self.count.strikes = 0;
        tracing::debug!(half_inning = self.count.half_inning, "strikeout");
        events.publish(GameEvent::StrikeCountChanged(0));
        let out = self.increment_out(events)?;
        Ok(StrikeOutcome::Strikeout(out))
    }

    pub fn increment_out(&mut self, events: &mut EventBus) -> Result<OutOutcome, GameOverError> {
        self.ensure_live()?;
        self.count.outs += 1;
        if self.count.outs < self.limits.max_outs {
            events.publish(GameEvent::OutCountChanged(self.count.outs));
            return Ok(OutOutcome::Out);
        }

        self.count.outs = 0;
        events.publish(GameEvent::OutCountChanged(0));
        self.reset_balls_and_strikes(events);

        let next = self.count.half_inning + 1;
        if next >= self.limits.max_half_innings {
            self.game_over = true;
            tracing::debug!(half_inning = self.count.half_inning, "game over");
            events.publish(GameEvent::GameOver);
            return Ok(OutOutcome::GameOver);
        }
        self.count.half_inning = next;
        tracing::debug!(half_inning = next, "side retired");
        events.publish(GameEvent::InningChanged(next));
        Ok(OutOutcome::SideRetired)
    }

    /// Clears balls and strikes for a new batter.
    pub fn reset_plate_appearance(&mut self, events: &mut EventBus) -> Result<(), GameOverError> {
        self.ensure_live()?;
        self.reset_balls_and_strikes(events);
        Ok(())
    }

    fn reset_balls_and_strikes(&mut self, events: &mut EventBus) {
        if self.count.balls != 0 {
            self.count.balls = 0;
            events.publish(GameEvent::BallCountChanged(0));
        }
        if self.count.strikes != 0 {
            self.count.strikes = 0;
            events.publish(GameEvent::StrikeCountChanged(0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::tests::record;

    fn tracker() -> (CountTracker, EventBus) {
        (CountTracker::new(CountLimits::default()), EventBus::new())
    }

    #[test]
    fn test_fourth_ball_is_a_single_walk() {
        let (mut tracker, mut events) = tracker();
        let outcomes: Vec<_> = (0..4)
            .map(|_| tracker.increment_ball(&mut events).unwrap())
            .collect();
        assert_eq!(
            outcomes,
            [
                BallOutcome::Ball,
                BallOutcome::Ball,
                BallOutcome::Ball,
                BallOutcome::Walk
            ]
        );
        assert_eq!(tracker.count().balls(), 0);
        assert_eq!(tracker.count().strikes(), 0);
    }

    #[test]
    fn test_ball_events_report_new_count() {
        let (mut tracker, mut events) = tracker();
        let log = record(&mut events);
        for _ in 0..4 {
            tracker.increment_ball(&mut events).unwrap();
        }
        assert_eq!(
            *log.lock().unwrap(),
            [1, 2, 3, 0].map(GameEvent::BallCountChanged)
        );
    }

    #[test]
    fn test_third_strike_adds_exactly_one_out() {
        let (mut tracker, mut events) = tracker();
        assert!(tracker.increment_strike(&mut events).unwrap().is_strike());
        assert!(tracker.increment_strike(&mut events).unwrap().is_strike());
        assert_eq!(
            tracker.increment_strike(&mut events),
            Ok(StrikeOutcome::Strikeout(OutOutcome::Out))
        );
        assert_eq!(tracker.count().strikes(), 0);
        assert_eq!(tracker.count().outs(), 1);
    }

    #[test]
    fn test_third_out_starts_next_half_inning() {
        let (mut tracker, mut events) = tracker();
        tracker.increment_ball(&mut events).unwrap();
        tracker.increment_strike(&mut events).unwrap();
        assert_eq!(tracker.increment_out(&mut events), Ok(OutOutcome::Out));
        assert_eq!(tracker.increment_out(&mut events), Ok(OutOutcome::Out));
        let log = record(&mut events);
        assert_eq!(tracker.increment_out(&mut events), Ok(OutOutcome::SideRetired));

        let count = tracker.count();
        assert_eq!(count.outs(), 0);
        assert_eq!(count.balls(), 0);
        assert_eq!(count.strikes(), 0);
        assert_eq!(count.half_inning(), 1);
        assert_eq!(count.batting_team(), Team::Home);
        assert_eq!(
            *log.lock().unwrap(),
            [
                GameEvent::OutCountChanged(0),
                GameEvent::BallCountChanged(0),
                GameEvent::StrikeCountChanged(0),
                GameEvent::InningChanged(1),
            ]
        );
    }

    #[test]
    fn test_strikeout_can_retire_the_side() {
        let (mut tracker, mut events) = tracker();
        tracker.increment_out(&mut events).unwrap();
        tracker.increment_out(&mut events).unwrap();
        tracker.increment_strike(&mut events).unwrap();
        tracker.increment_strike(&mut events).unwrap();
        assert_eq!(
            tracker.increment_strike(&mut events),
            Ok(StrikeOutcome::Strikeout(OutOutcome::SideRetired))
        );
        assert_eq!(tracker.count().half_inning(), 1);
    }

    #[test]
    fn test_final_out_freezes_the_game() {
        let limits = CountLimits {
            max_half_innings: 2,
            ..CountLimits::default()
        };
        let mut tracker = CountTracker::new(limits);
        let mut events = EventBus::new();
        for _ in 0..3 {
            tracker.increment_out(&mut events).unwrap();
        }
        assert_eq!(tracker.count().half_inning(), 1);

        let log = record(&mut events);
        tracker.increment_out(&mut events).unwrap();
        tracker.increment_out(&mut events).unwrap();
        assert_eq!(tracker.increment_out(&mut events), Ok(OutOutcome::GameOver));
        assert!(tracker.is_game_over());
        assert_eq!(tracker.count().half_inning(), 1);
        assert_eq!(log.lock().unwrap().last(), Some(&GameEvent::GameOver));

        assert_eq!(tracker.increment_ball(&mut events), Err(GameOverError));
        assert_eq!(tracker.increment_strike(&mut events), Err(GameOverError));
        assert_eq!(tracker.increment_out(&mut events), Err(GameOverError));
        assert_eq!(tracker.count().balls(), 0);
    }

    #[test]
    fn test_full_game_has_eighteen_half_innings() {
        let (mut tracker, mut events) = tracker();
        let mut half_innings = 1;
        loop {
            match tracker.increment_out(&mut events).unwrap() {
                OutOutcome::Out => {}
                OutOutcome::SideRetired => half_innings += 1,
                OutOutcome::GameOver => break,
            }
        }
        assert_eq!(half_innings, 18);
        assert_eq!(tracker.count().half_inning(), 17);
        assert_eq!(tracker.count().inning(), 9);
    }

    #[test]
    fn test_reset_plate_appearance_is_silent_when_clean() {
        let (mut tracker, mut events) = tracker();
        let log = record(&mut events);
        tracker.reset_plate_appearance(&mut events).unwrap();
        assert!(log.lock().unwrap().is_empty());

        tracker.increment_strike(&mut events).unwrap();
        tracker.reset_plate_appearance(&mut events).unwrap();
        assert_eq!(tracker.count().strikes(), 0);
        assert_eq!(
            log.lock().unwrap().last(),
            Some(&GameEvent::StrikeCountChanged(0))
        );
    }
}
