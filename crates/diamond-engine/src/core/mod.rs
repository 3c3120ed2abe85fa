//! Rule-bound bookkeeping of a half-inning and the pitch zone model.
//!
//! - [`ZoneGrid`] - 5×5 probability-weighted pitch target grid
//! - [`CountTracker`] - balls, strikes, outs, and the half-inning index
//! - [`BaseRunnerLedger`] - base occupancy and forced advancement
//! - [`EventBus`] - typed observer registry for display collaborators

pub use self::{bases::*, count::*, event::*, position::*, team::*, zone_grid::*};

pub(crate) mod bases;
pub(crate) mod count;
pub(crate) mod event;
pub(crate) mod position;
pub(crate) mod team;
pub(crate) mod zone_grid;
