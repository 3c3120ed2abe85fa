use std::fmt;

use serde::Serialize;

use super::{
    bases::{BaseSlot, RunnerId},
    position::Position,
    team::Team,
};

/// Notifications for display, audio, and other presentation collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum GameEvent {
    BallCountChanged(u8),
    StrikeCountChanged(u8),
    OutCountChanged(u8),
    InningChanged(u8),
    RunScored { team: Team, new_score: u32 },
    BattingOrderChanged { team: Team, index: u8 },
    GameOver,
}

/// Events delivered to a [`GameSession`](crate::GameSession) by physics, input, or UI layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExternalEvent {
    PitchLanded(Position),
    ContactMade,
    BallInPlayOut(BaseSlot),
    RunnerAdvance { runner: RunnerId, target: BaseSlot },
    /// A runner starts or stops trying for the next base.
    RunnerIntent { slot: BaseSlot, advancing: bool },
    ManualAdvanceRequest(BaseSlot),
    PlayEnded,
}

type Handler = Box<dyn FnMut(&GameEvent) + Send>;

/// Typed observer registry.
///
/// Handlers run synchronously in registration order each time an event is
/// published. They are `Send` so that a whole game can be moved behind a
/// single lock.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use diamond_engine::{EventBus, GameEvent};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let mut bus = EventBus::new();
/// let sink = Arc::clone(&seen);
/// bus.on_ball_count_changed(move |n| sink.lock().unwrap().push(n));
///
/// bus.publish(GameEvent::BallCountChanged(1));
/// bus.publish(GameEvent::StrikeCountChanged(1));
///
/// assert_eq!(*seen.lock().unwrap(), [1]);
/// ```
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<Handler>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler that receives every event.
    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: FnMut(&GameEvent) + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn on_ball_count_changed<F>(&mut self, mut handler: F)
    where
        F: FnMut(u8) + Send + 'static,
    {
        self.subscribe(move |event| {
            if let GameEvent::BallCountChanged(n) = event {
                handler(*n);
            }
        });
    }

    pub fn on_strike_count_changed<F>(&mut self, mut handler: F)
    where
        F: FnMut(u8) + Send + 'static,
    {
        self.subscribe(move |event| {
            if let GameEvent::StrikeCountChanged(n) = event {
                handler(*n);
            }
        });
    }

    pub fn on_out_count_changed<F>(&mut self, mut handler: F)
    where
        F: FnMut(u8) + Send + 'static,
    {
        self.subscribe(move |event| {
            if let GameEvent::OutCountChanged(n) = event {
                handler(*n);
            }
        });
    }

    pub fn on_inning_changed<F>(&mut self, mut handler: F)
    where
        F: FnMut(u8) + Send + 'static,
    {
        self.subscribe(move |event| {
            if let GameEvent::InningChanged(n) = event {
                handler(*n);
            }
        });
    }

    pub fn on_run_scored<F>(&mut self, mut handler: F)
    where
        F: FnMut(Team, u32) + Send + 'static,
    {
        self.subscribe(move |event| {
            if let GameEvent::RunScored { team, new_score } = event {
                handler(*team, *new_score);
            }
        });
    }

    pub fn on_game_over<F>(&mut self, mut handler: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.subscribe(move |event| {
            if event.is_game_over() {
                handler();
            }
        });
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn publish(&mut self, event: GameEvent) {
        tracing::trace!(?event, "publish");
        for handler in &mut self.handlers {
            handler(&event);
        }
    }
}
