use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Position of a runner along the base path.
///
/// `AtBat` is the batter's box; `Home` is transient, a runner entering it
/// scores and leaves the ledger in the same operation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum BaseSlot {
    #[display("at bat")]
    AtBat = 0,
    #[display("first base")]
    First = 1,
    #[display("second base")]
    Second = 2,
    #[display("third base")]
    Third = 3,
    #[display("home")]
    Home = 4,
}

const SLOT_COUNT: usize = 4;

impl BaseSlot {
    /// Slots a runner can stand on, from the batter's box outward.
    pub const OCCUPIABLE: [Self; SLOT_COUNT] =
        [Self::AtBat, Self::First, Self::Second, Self::Third];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::AtBat),
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            4 => Some(Self::Home),
            _ => None,
        }
    }

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunnerId(pub u32);

impl fmt::Display for RunnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A batter or base runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Runner {
    id: RunnerId,
    base: BaseSlot,
    movement_intent: bool,
}

impl Runner {
    /// A new batter in the batter's box, not yet running.
    #[must_use]
    pub const fn new(id: RunnerId) -> Self {
        Self {
            id,
            base: BaseSlot::AtBat,
            movement_intent: false,
        }
    }

    #[must_use]
    pub const fn id(&self) -> RunnerId {
        self.id
    }

    #[must_use]
    pub const fn base(&self) -> BaseSlot {
        self.base
    }

    #[must_use]
    pub const fn movement_intent(&self) -> bool {
        self.movement_intent
    }
}

/// Whether a runner who is not trying to advance can be put out by [`BaseRunnerLedger::put_out`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StandingRunnerRule {
    /// Only runners with movement intent can be put out; standing runners are safe.
    #[default]
    RequireMovement,
    /// Any runner at the slot can be put out.
    AllowStanding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PutOutOutcome {
    Out(Runner),
    Safe,
}

/// Runners that reached home during a single ledger operation, furthest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    scored: ArrayVec<Runner, SLOT_COUNT>,
}

impl AdvanceReport {
    #[must_use]
    pub fn scored(&self) -> &[Runner] {
        &self.scored
    }

    #[must_use]
    pub fn runs_scored(&self) -> usize {
        self.scored.len()
    }

    fn merge(&mut self, other: Self) {
        self.scored.extend(other.scored);
    }
}

/// Which runner occupies which base.
///
/// Every operation leaves at most one runner per slot. Forced advancement
/// cascades outward so that a base is always vacated before it is entered.
///
/// # Example
///
/// ```
/// use diamond_engine::{BaseRunnerLedger, BaseSlot, Runner, RunnerId};
///
/// let mut ledger = BaseRunnerLedger::new();
/// for id in 0..4 {
///     ledger.add_runner(Runner::new(RunnerId(id))).unwrap();
///     if id < 3 {
///         ledger.force_advance(BaseSlot::AtBat).unwrap();
///     }
/// }
///
/// // bases loaded, batter walks
/// let report = ledger.force_advance(BaseSlot::AtBat).unwrap();
/// assert_eq!(report.runs_scored(), 1);
/// assert_eq!(report.scored()[0].id(), RunnerId(0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BaseRunnerLedger {
    slots: [Option<Runner>; SLOT_COUNT],
}

impl BaseRunnerLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn occupant(&self, slot: BaseSlot) -> Option<&Runner> {
        self.slots.get(slot.index())?.as_ref()
    }

    #[must_use]
    pub fn is_occupied(&self, slot: BaseSlot) -> bool {
        self.occupant(slot).is_some()
    }

    /// Runners from the batter's box outward.
    pub fn runners(&self) -> impl Iterator<Item = &Runner> + '_ {
        self.slots.iter().flatten()
    }

    #[must_use]
    pub fn runner_count(&self) -> usize {
        self.runners().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    #[must_use]
    pub fn find(&self, runner: RunnerId) -> Option<BaseSlot> {
        self.runners().find(|r| r.id == runner).map(|r| r.base)
    }

    /// Occupant of each of [`BaseSlot::OCCUPIABLE`].
    #[must_use]
    pub fn occupancy(&self) -> [Option<RunnerId>; SLOT_COUNT] {
        self.slots.map(|slot| slot.map(|r| r.id))
    }

    /// Places a new batter in the batter's box.
    pub fn add_runner(&mut self, runner: Runner) -> Result<(), LedgerError> {
        if self.find(runner.id).is_some() {
            return Err(LedgerError::DuplicateRunner { runner: runner.id });
        }
        let slot = &mut self.slots[BaseSlot::AtBat.index()];
        if slot.is_some() {
            return Err(LedgerError::SlotOccupied {
                slot: BaseSlot::AtBat,
            });
        }
        *slot = Some(Runner {
            base: BaseSlot::AtBat,
            ..runner
        });
        Ok(())
    }

    /// Moves the runner at `from` up one base, pushing any occupant ahead first.
    ///
    /// Every runner that moves is marked as moving until
    /// [`Self::clear_movement_intents`].
    pub fn force_advance(&mut self, from: BaseSlot) -> Result<AdvanceReport, LedgerError> {
        if !self.is_occupied(from) {
            return Err(LedgerError::SlotEmpty { slot: from });
        }
        let mut report = AdvanceReport::default();
        self.advance_one(from, &mut report);
        Ok(report)
    }

    fn advance_one(&mut self, from: BaseSlot, report: &mut AdvanceReport) {
        let Some(dest) = from.next() else {
            return;
        };
        let Some(mut runner) = self.slots[from.index()].take() else {
            return;
        };
        runner.base = dest;
        runner.movement_intent = true;
        if dest == BaseSlot::Home {
            tracing::debug!(runner = %runner.id, "runner scored");
            report.scored.push(runner);
            return;
        }
        if self.is_occupied(dest) {
            self.advance_one(dest, report);
        }
        self.slots[dest.index()] = Some(runner);
    }

    /// Moves `runner` forward to `target`, forcing every runner in the way.
    ///
    /// Moved runners are marked as moving, as with [`Self::force_advance`].
    pub fn advance_runner(
        &mut self,
        runner: RunnerId,
        target: BaseSlot,
    ) -> Result<AdvanceReport, LedgerError> {
        let from = self
            .find(runner)
            .ok_or(LedgerError::RunnerNotFound { runner })?;
        if target <= from {
            return Err(LedgerError::NotForward {
                runner,
                from,
                target,
            });
        }
        let mut report = AdvanceReport::default();
        let mut current = from;
        while current < target {
            let mut step = AdvanceReport::default();
            self.advance_one(current, &mut step);
            report.merge(step);
            match current.next() {
                Some(next) => current = next,
                None => break,
            }
        }
        Ok(report)
    }

    /// Removes the runner at `slot` if the rule allows it.
    ///
    /// Under [`StandingRunnerRule::RequireMovement`] a runner without
    /// movement intent is [`PutOutOutcome::Safe`] and stays put.
    pub fn put_out(
        &mut self,
        slot: BaseSlot,
        rule: StandingRunnerRule,
    ) -> Result<PutOutOutcome, LedgerError> {
        let runner = *self
            .occupant(slot)
            .ok_or(LedgerError::SlotEmpty { slot })?;
        if !runner.movement_intent && rule == StandingRunnerRule::RequireMovement {
            return Ok(PutOutOutcome::Safe);
        }
        self.slots[slot.index()] = None;
        Ok(PutOutOutcome::Out(runner))
    }

    /// Removes the batter after a strikeout.
    pub fn remove_batter(&mut self) -> Option<Runner> {
        self.slots[BaseSlot::AtBat.index()].take()
    }

    pub fn set_movement_intent(&mut self, slot: BaseSlot, intent: bool) -> Result<(), LedgerError> {
        let runner = self
            .slots
            .get_mut(slot.index())
            .and_then(Option::as_mut)
            .ok_or(LedgerError::SlotEmpty { slot })?;
        runner.movement_intent = intent;
        Ok(())
    }

    pub fn clear_movement_intents(&mut self) {
        for runner in self.slots.iter_mut().flatten() {
            runner.movement_intent = false;
        }
    }

    /// Removes every runner without scoring. Returns how many were discarded.
    pub fn clear_all(&mut self) -> usize {
        let discarded = self.runner_count();
        self.slots = [None; SLOT_COUNT];
        discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(bases: &[BaseSlot]) -> BaseRunnerLedger {
        let mut ledger = BaseRunnerLedger::new();
        for (i, base) in bases.iter().enumerate() {
            ledger.slots[base.index()] = Some(Runner {
                id: RunnerId(u32::try_from(i).unwrap()),
                base: *base,
                movement_intent: false,
            });
        }
        ledger
    }

    fn assert_consistent(ledger: &BaseRunnerLedger) {
        for slot in BaseSlot::OCCUPIABLE {
            if let Some(r) = ledger.occupant(slot) {
                assert_eq!(r.base(), slot);
            }
        }
        let mut ids: Vec<_> = ledger.runners().map(Runner::id).collect();
        let len = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), len, "runner appears twice");
    }

    mod add_runner {
        use super::*;

        #[test]
        fn test_new_runner_goes_to_the_batters_box() {
            let mut ledger = BaseRunnerLedger::new();
            ledger.add_runner(Runner::new(RunnerId(7))).unwrap();
            assert_eq!(ledger.find(RunnerId(7)), Some(BaseSlot::AtBat));
        }

        #[test]
        fn test_occupied_batters_box_is_rejected() {
            let mut ledger = ledger_with(&[BaseSlot::AtBat]);
            assert_eq!(
                ledger.add_runner(Runner::new(RunnerId(9))),
                Err(LedgerError::SlotOccupied {
                    slot: BaseSlot::AtBat
                })
            );
            assert_eq!(ledger.occupant(BaseSlot::AtBat).unwrap().id(), RunnerId(0));
        }

        #[test]
        fn test_duplicate_runner_is_rejected() {
            let mut ledger = ledger_with(&[BaseSlot::Second]);
            assert_eq!(
                ledger.add_runner(Runner::new(RunnerId(0))),
                Err(LedgerError::DuplicateRunner {
                    runner: RunnerId(0)
                })
            );
        }
    }

    mod force_advance {
        use super::*;

        #[test]
        fn test_walk_puts_batter_on_first() {
            let mut ledger = ledger_with(&[BaseSlot::AtBat]);
            let report = ledger.force_advance(BaseSlot::AtBat).unwrap();
            assert_eq!(report.runs_scored(), 0);
            assert_eq!(ledger.occupant(BaseSlot::First).unwrap().id(), RunnerId(0));
            assert!(!ledger.is_occupied(BaseSlot::AtBat));
        }

        #[test]
        fn test_bases_loaded_walk_scores_runner_from_third() {
            let mut ledger = ledger_with(&[
                BaseSlot::Third,
                BaseSlot::Second,
                BaseSlot::First,
                BaseSlot::AtBat,
            ]);
            let report = ledger.force_advance(BaseSlot::AtBat).unwrap();
            assert_eq!(report.runs_scored(), 1);
            assert_eq!(report.scored()[0].id(), RunnerId(0));
            assert_eq!(report.scored()[0].base(), BaseSlot::Home);
            assert_eq!(
                ledger.occupancy(),
                [None, Some(RunnerId(3)), Some(RunnerId(2)), Some(RunnerId(1))]
            );
            assert_consistent(&ledger);
        }

        #[test]
        fn test_cascade_stops_at_first_open_base() {
            let mut ledger = ledger_with(&[BaseSlot::AtBat, BaseSlot::First, BaseSlot::Third]);
            let report = ledger.force_advance(BaseSlot::AtBat).unwrap();
            assert_eq!(report.runs_scored(), 0);
            assert_eq!(
                ledger.occupancy(),
                [None, Some(RunnerId(0)), Some(RunnerId(1)), Some(RunnerId(2))]
            );
        }

        #[test]
        fn test_runner_on_third_scores() {
            let mut ledger = ledger_with(&[BaseSlot::Third]);
            let report = ledger.force_advance(BaseSlot::Third).unwrap();
            assert_eq!(report.runs_scored(), 1);
            assert!(ledger.is_empty());
        }

        #[test]
        fn test_empty_slot_is_an_error() {
            let mut ledger = BaseRunnerLedger::new();
            assert_eq!(
                ledger.force_advance(BaseSlot::First),
                Err(LedgerError::SlotEmpty {
                    slot: BaseSlot::First
                })
            );
            assert_eq!(
                ledger.force_advance(BaseSlot::Home),
                Err(LedgerError::SlotEmpty {
                    slot: BaseSlot::Home
                })
            );
        }

        #[test]
        fn test_random_sequences_never_double_occupy() {
            use rand::{Rng as _, SeedableRng as _};
            let mut rng = rand_pcg::Pcg32::seed_from_u64(0x5eed);
            let mut ledger = BaseRunnerLedger::new();
            let mut next_id = 0;
            let mut scored = 0;
            for _ in 0..2000 {
                if !ledger.is_occupied(BaseSlot::AtBat) {
                    ledger.add_runner(Runner::new(RunnerId(next_id))).unwrap();
                    next_id += 1;
                }
                let from = BaseSlot::OCCUPIABLE[rng.random_range(0..4)];
                if ledger.is_occupied(from) {
                    let before = ledger.runner_count();
                    let report = ledger.force_advance(from).unwrap();
                    scored += report.runs_scored();
                    assert_eq!(ledger.runner_count() + report.runs_scored(), before);
                }
                assert_consistent(&ledger);
            }
            assert!(scored > 0);
        }
    }

    mod advance_runner {
        use super::*;

        #[test]
        fn test_batter_to_second_forces_runner_on_first() {
            let mut ledger = ledger_with(&[BaseSlot::AtBat, BaseSlot::First]);
            let report = ledger.advance_runner(RunnerId(0), BaseSlot::Second).unwrap();
            assert_eq!(report.runs_scored(), 0);
            assert_eq!(
                ledger.occupancy(),
                [None, None, Some(RunnerId(0)), Some(RunnerId(1))]
            );
        }

        #[test]
        fn test_home_run_clears_the_bases() {
            let mut ledger = ledger_with(&[
                BaseSlot::AtBat,
                BaseSlot::First,
                BaseSlot::Second,
                BaseSlot::Third,
            ]);
            let report = ledger.advance_runner(RunnerId(0), BaseSlot::Home).unwrap();
            assert_eq!(report.runs_scored(), 4);
            assert_eq!(report.scored().last().unwrap().id(), RunnerId(0));
            assert!(ledger.is_empty());
        }

        #[test]
        fn test_backwards_move_is_rejected() {
            let mut ledger = ledger_with(&[BaseSlot::Second]);
            assert_eq!(
                ledger.advance_runner(RunnerId(0), BaseSlot::First),
                Err(LedgerError::NotForward {
                    runner: RunnerId(0),
                    from: BaseSlot::Second,
                    target: BaseSlot::First,
                })
            );
            assert_eq!(
                ledger.advance_runner(RunnerId(5), BaseSlot::Home),
                Err(LedgerError::RunnerNotFound {
                    runner: RunnerId(5)
                })
            );
        }
    }

    mod put_out {
        use super::*;

        #[test]
        fn test_forced_runner_can_be_put_out() {
            let mut ledger = ledger_with(&[BaseSlot::AtBat, BaseSlot::First, BaseSlot::Third]);
            ledger.force_advance(BaseSlot::AtBat).unwrap();
            for slot in [BaseSlot::First, BaseSlot::Second] {
                assert!(ledger.occupant(slot).unwrap().movement_intent());
            }
            assert!(!ledger.occupant(BaseSlot::Third).unwrap().movement_intent());
            assert_eq!(
                ledger.put_out(BaseSlot::Second, StandingRunnerRule::RequireMovement),
                Ok(PutOutOutcome::Out(Runner {
                    id: RunnerId(1),
                    base: BaseSlot::Second,
                    movement_intent: true,
                }))
            );
        }

        #[test]
        fn test_runner_driven_past_a_base_can_be_put_out() {
            let mut ledger = ledger_with(&[BaseSlot::AtBat, BaseSlot::First]);
            ledger.advance_runner(RunnerId(1), BaseSlot::Third).unwrap();
            assert!(!ledger.occupant(BaseSlot::AtBat).unwrap().movement_intent());
            assert!(
                ledger
                    .put_out(BaseSlot::Third, StandingRunnerRule::RequireMovement)
                    .unwrap()
                    .is_out()
            );
        }

        #[test]
        fn test_standing_runner_is_safe_by_default() {
            let mut ledger = ledger_with(&[BaseSlot::First]);
            assert_eq!(
                ledger.put_out(BaseSlot::First, StandingRunnerRule::RequireMovement),
                Ok(PutOutOutcome::Safe)
            );
            assert!(ledger.is_occupied(BaseSlot::First));
        }

        #[test]
        fn test_moving_runner_is_out() {
            let mut ledger = ledger_with(&[BaseSlot::First]);
            ledger.set_movement_intent(BaseSlot::First, true).unwrap();
            let outcome = ledger
                .put_out(BaseSlot::First, StandingRunnerRule::RequireMovement)
                .unwrap();
            assert!(outcome.is_out());
            assert!(ledger.is_empty());
        }

        #[test]
        fn test_standing_runner_out_when_rule_allows() {
            let mut ledger = ledger_with(&[BaseSlot::Second]);
            let outcome = ledger
                .put_out(BaseSlot::Second, StandingRunnerRule::AllowStanding)
                .unwrap();
            assert!(outcome.is_out());
        }

        #[test]
        fn test_clearing_intents_protects_runners_again() {
            let mut ledger = ledger_with(&[BaseSlot::First]);
            ledger.set_movement_intent(BaseSlot::First, true).unwrap();
            ledger.clear_movement_intents();
            assert!(
                ledger
                    .put_out(BaseSlot::First, StandingRunnerRule::RequireMovement)
                    .unwrap()
                    .is_safe()
            );
        }
    }

    #[test]
    fn test_clear_all_discards_without_scoring() {
        let mut ledger = ledger_with(&[BaseSlot::First, BaseSlot::Third]);
        assert_eq!(ledger.clear_all(), 2);
        assert!(ledger.is_empty());
    }
}
